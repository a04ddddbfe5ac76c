//! Diversity resource model.
//!
//! [`Diversity`] is the stored record. [`DiversityPatch`] is its sparse counterpart used by
//! the PATCH verb. Every field is an `Option` so that an absent field can be told apart
//! from an explicit value; JSON field names are PascalCase as stored.

use chrono::{DateTime, Utc};
use diversity_uuid::ResourceId;
use reference_data::{
    Coded, Ethnicity, LearningDifficultyOrDisability, LearningDifficultyOrDisabilityDeclaration,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coded learning difficulty or disability declaration.
pub type DeclarationCode = Coded<LearningDifficultyOrDisabilityDeclaration>;

/// Coded primary or secondary learning difficulty or disability.
pub type DisabilityCode = Coded<LearningDifficultyOrDisability>;

/// Coded ethnic group.
pub type EthnicityCode = Coded<Ethnicity>;

/// A customer's diversity record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Diversity {
    /// Server-assigned on create, immutable afterwards.
    #[serde(rename = "DiversityId")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub diversity_id: Option<ResourceId>,

    /// Owning customer, immutable.
    #[serde(rename = "CustomerId")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub customer_id: Option<ResourceId>,

    #[serde(rename = "ConsentToCollectLLDDHealth")]
    pub consent_to_collect_lldd_health: Option<bool>,

    /// Declaration code: 1, 2 or 9.
    #[serde(rename = "LearningDifficultyOrDisabilityDeclaration")]
    #[schema(value_type = Option<i64>, example = 9)]
    pub learning_difficulty_or_disability_declaration: Option<DeclarationCode>,

    #[serde(rename = "PrimaryLearningDifficultyOrDisability")]
    #[schema(value_type = Option<i64>, example = 99)]
    pub primary_learning_difficulty_or_disability: Option<DisabilityCode>,

    #[serde(rename = "SecondaryLearningDifficultyOrDisability")]
    #[schema(value_type = Option<i64>, example = 99)]
    pub secondary_learning_difficulty_or_disability: Option<DisabilityCode>,

    #[serde(rename = "DateAndTimeLLDDHealthConsentCollected")]
    pub date_and_time_lldd_health_consent_collected: Option<DateTime<Utc>>,

    #[serde(rename = "ConsentToCollectEthnicity")]
    pub consent_to_collect_ethnicity: Option<bool>,

    /// Ethnicity code: 31 to 47, 98 or 99.
    #[serde(rename = "Ethnicity")]
    #[schema(value_type = Option<i64>, example = 99)]
    pub ethnicity: Option<EthnicityCode>,

    #[serde(rename = "DateAndTimeEthnicityCollected")]
    pub date_and_time_ethnicity_collected: Option<DateTime<Utc>>,

    #[serde(rename = "LastModifiedDate")]
    pub last_modified_date: Option<DateTime<Utc>>,

    /// Touchpoint that last changed the record.
    #[serde(rename = "LastModifiedBy")]
    #[schema(max_length = 10)]
    pub last_modified_by: Option<String>,
}

/// Sparse overlay for a [`Diversity`].
///
/// Absent and `null` fields both mean "leave unchanged". Serialisation skips absent
/// fields, so the serialised form holds exactly the fields to write.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiversityPatch {
    #[serde(
        rename = "ConsentToCollectLLDDHealth",
        skip_serializing_if = "Option::is_none"
    )]
    pub consent_to_collect_lldd_health: Option<bool>,

    #[serde(
        rename = "LearningDifficultyOrDisabilityDeclaration",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub learning_difficulty_or_disability_declaration: Option<DeclarationCode>,

    #[serde(
        rename = "PrimaryLearningDifficultyOrDisability",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub primary_learning_difficulty_or_disability: Option<DisabilityCode>,

    #[serde(
        rename = "SecondaryLearningDifficultyOrDisability",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<i64>)]
    pub secondary_learning_difficulty_or_disability: Option<DisabilityCode>,

    #[serde(
        rename = "DateAndTimeLLDDHealthConsentCollected",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_and_time_lldd_health_consent_collected: Option<DateTime<Utc>>,

    #[serde(
        rename = "ConsentToCollectEthnicity",
        skip_serializing_if = "Option::is_none"
    )]
    pub consent_to_collect_ethnicity: Option<bool>,

    #[serde(rename = "Ethnicity", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub ethnicity: Option<EthnicityCode>,

    #[serde(
        rename = "DateAndTimeEthnicityCollected",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_and_time_ethnicity_collected: Option<DateTime<Utc>>,

    #[serde(rename = "LastModifiedDate", skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,

    #[serde(rename = "LastModifiedBy", skip_serializing_if = "Option::is_none")]
    #[schema(max_length = 10)]
    pub last_modified_by: Option<String>,
}

impl DiversityPatch {
    /// True when the overlay carries no fields at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `base` with every present overlay field written over it.
    ///
    /// Identifiers are never touched. This is the typed view of what the JSON merge will
    /// store, used to validate a patch before it is written.
    pub fn apply_to(&self, base: &Diversity) -> Diversity {
        fn overlay<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        let mut out = base.clone();
        overlay(
            &mut out.consent_to_collect_lldd_health,
            &self.consent_to_collect_lldd_health,
        );
        overlay(
            &mut out.learning_difficulty_or_disability_declaration,
            &self.learning_difficulty_or_disability_declaration,
        );
        overlay(
            &mut out.primary_learning_difficulty_or_disability,
            &self.primary_learning_difficulty_or_disability,
        );
        overlay(
            &mut out.secondary_learning_difficulty_or_disability,
            &self.secondary_learning_difficulty_or_disability,
        );
        overlay(
            &mut out.date_and_time_lldd_health_consent_collected,
            &self.date_and_time_lldd_health_consent_collected,
        );
        overlay(
            &mut out.consent_to_collect_ethnicity,
            &self.consent_to_collect_ethnicity,
        );
        overlay(&mut out.ethnicity, &self.ethnicity);
        overlay(
            &mut out.date_and_time_ethnicity_collected,
            &self.date_and_time_ethnicity_collected,
        );
        overlay(&mut out.last_modified_date, &self.last_modified_date);
        overlay(&mut out.last_modified_by, &self.last_modified_by);
        out
    }
}
