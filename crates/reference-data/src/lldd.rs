//! Learning difficulty or disability (LLDD) code sets.

use crate::ReferenceCode;

// ============================================================================
// Declaration
// ============================================================================

/// Whether the customer considers themselves to have a learning difficulty, disability
/// or health problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LearningDifficultyOrDisabilityDeclaration {
    /// Customer considers themselves to have a learning difficulty and/or health problem.
    ConsidersSelfAffected,
    /// Customer does not consider themselves to have a learning difficulty and/or health problem.
    DoesNotConsiderSelfAffected,
    /// The customer did not provide the information.
    NotProvidedByTheCustomer,
}

impl ReferenceCode for LearningDifficultyOrDisabilityDeclaration {
    const ALL: &'static [Self] = &[
        Self::ConsidersSelfAffected,
        Self::DoesNotConsiderSelfAffected,
        Self::NotProvidedByTheCustomer,
    ];

    const SET_NAME: &'static str = "LearningDifficultyOrDisabilityDeclaration";

    fn code(self) -> i64 {
        match self {
            Self::ConsidersSelfAffected => 1,
            Self::DoesNotConsiderSelfAffected => 2,
            Self::NotProvidedByTheCustomer => 9,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::ConsidersSelfAffected => {
                "Customer considers themselves to have a learning difficulty and/or health problem"
            }
            Self::DoesNotConsiderSelfAffected => {
                "Customer does not consider themselves to have a learning difficulty and/or health problem"
            }
            Self::NotProvidedByTheCustomer => "Not provided by the customer",
        }
    }
}

// ============================================================================
// Primary / secondary category
// ============================================================================

/// Category of learning difficulty or disability.
///
/// Shared by the primary and secondary classification fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LearningDifficultyOrDisability {
    VisualImpairment,
    HearingImpairment,
    DisabilityAffectingMobility,
    ProfoundComplexDisabilities,
    SocialAndEmotionalDifficulties,
    MentalHealthDifficulty,
    ModerateLearningDifficulty,
    SevereLearningDifficulty,
    Dyslexia,
    Dyscalculia,
    AutismSpectrumDisorder,
    AspergersSyndrome,
    TemporaryDisabilityAfterIllnessOrAccident,
    SpeechLanguageAndCommunicationNeeds,
    OtherPhysicalDisability,
    OtherSpecificLearningDifficulty,
    OtherMedicalCondition,
    OtherLearningDifficulty,
    OtherDisability,
    PreferNotToSay,
    NotProvided,
}

impl LearningDifficultyOrDisability {
    /// True for the two values that carry no collected detail.
    pub fn is_withheld(self) -> bool {
        matches!(self, Self::PreferNotToSay | Self::NotProvided)
    }
}

impl ReferenceCode for LearningDifficultyOrDisability {
    const ALL: &'static [Self] = &[
        Self::VisualImpairment,
        Self::HearingImpairment,
        Self::DisabilityAffectingMobility,
        Self::ProfoundComplexDisabilities,
        Self::SocialAndEmotionalDifficulties,
        Self::MentalHealthDifficulty,
        Self::ModerateLearningDifficulty,
        Self::SevereLearningDifficulty,
        Self::Dyslexia,
        Self::Dyscalculia,
        Self::AutismSpectrumDisorder,
        Self::AspergersSyndrome,
        Self::TemporaryDisabilityAfterIllnessOrAccident,
        Self::SpeechLanguageAndCommunicationNeeds,
        Self::OtherPhysicalDisability,
        Self::OtherSpecificLearningDifficulty,
        Self::OtherMedicalCondition,
        Self::OtherLearningDifficulty,
        Self::OtherDisability,
        Self::PreferNotToSay,
        Self::NotProvided,
    ];

    const SET_NAME: &'static str = "LearningDifficultyOrDisability";

    fn code(self) -> i64 {
        match self {
            Self::VisualImpairment => 4,
            Self::HearingImpairment => 5,
            Self::DisabilityAffectingMobility => 6,
            Self::ProfoundComplexDisabilities => 7,
            Self::SocialAndEmotionalDifficulties => 8,
            Self::MentalHealthDifficulty => 9,
            Self::ModerateLearningDifficulty => 10,
            Self::SevereLearningDifficulty => 11,
            Self::Dyslexia => 12,
            Self::Dyscalculia => 13,
            Self::AutismSpectrumDisorder => 14,
            Self::AspergersSyndrome => 15,
            Self::TemporaryDisabilityAfterIllnessOrAccident => 16,
            Self::SpeechLanguageAndCommunicationNeeds => 17,
            Self::OtherPhysicalDisability => 93,
            Self::OtherSpecificLearningDifficulty => 94,
            Self::OtherMedicalCondition => 95,
            Self::OtherLearningDifficulty => 96,
            Self::OtherDisability => 97,
            Self::PreferNotToSay => 98,
            Self::NotProvided => 99,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::VisualImpairment => "Visual impairment",
            Self::HearingImpairment => "Hearing impairment",
            Self::DisabilityAffectingMobility => "Disability affecting mobility",
            Self::ProfoundComplexDisabilities => "Profound complex disabilities",
            Self::SocialAndEmotionalDifficulties => {
                "Social and emotional and behavioural difficulties"
            }
            Self::MentalHealthDifficulty => "Mental health difficulty",
            Self::ModerateLearningDifficulty => "Moderate learning difficulty",
            Self::SevereLearningDifficulty => "Severe learning difficulty",
            Self::Dyslexia => "Dyslexia",
            Self::Dyscalculia => "Dyscalculia",
            Self::AutismSpectrumDisorder => "Autism spectrum disorder",
            Self::AspergersSyndrome => "Asperger's syndrome",
            Self::TemporaryDisabilityAfterIllnessOrAccident => {
                "Temporary disability after illness (for example post-viral) or accident"
            }
            Self::SpeechLanguageAndCommunicationNeeds => "Speech, language and communication needs",
            Self::OtherPhysicalDisability => "Other physical disability",
            Self::OtherSpecificLearningDifficulty => {
                "Other specific learning difficulty (e.g. Dyspraxia)"
            }
            Self::OtherMedicalCondition => {
                "Other medical condition (for example epilepsy, asthma, diabetes)"
            }
            Self::OtherLearningDifficulty => "Other learning difficulty",
            Self::OtherDisability => "Other disability",
            Self::PreferNotToSay => "Prefer not to say",
            Self::NotProvided => "Not provided",
        }
    }
}
