//! Diversity record validation.
//!
//! [`validate_resource`] runs every rule and returns the full list of failures; an empty
//! list means the record is valid. Rules are evaluated in a fixed order:
//!
//! 1. required fields
//! 2. timestamps not in the future
//! 3. coded fields hold declared codes
//! 4. consent consistency
//! 5. `LastModifiedBy` length
//!
//! A consent rule only fires for a classification that is present and substantive. An
//! absent classification is compliant whatever the consent flag says.

use crate::constants::LAST_MODIFIED_BY_MAX_LEN;
use crate::model::Diversity;
use chrono::{DateTime, Utc};
use reference_data::{
    Coded, Ethnicity, LearningDifficultyOrDisability, LearningDifficultyOrDisabilityDeclaration,
    ReferenceCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single rule violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationFailure {
    #[serde(rename = "ErrorMessage")]
    pub message: String,
    /// JSON names of the fields the failure applies to.
    #[serde(rename = "MemberNames")]
    pub member_names: Vec<String>,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>, member: &str) -> Self {
        Self {
            message: message.into(),
            member_names: vec![member.to_string()],
        }
    }

    /// True when `member` is one of the affected fields.
    pub fn concerns(&self, member: &str) -> bool {
        self.member_names.iter().any(|m| m == member)
    }
}

// JSON member names, as they appear in failures.
const CUSTOMER_ID: &str = "CustomerId";
const CONSENT_LLDD: &str = "ConsentToCollectLLDDHealth";
const DECLARATION: &str = "LearningDifficultyOrDisabilityDeclaration";
const PRIMARY: &str = "PrimaryLearningDifficultyOrDisability";
const SECONDARY: &str = "SecondaryLearningDifficultyOrDisability";
const LLDD_COLLECTED: &str = "DateAndTimeLLDDHealthConsentCollected";
const CONSENT_ETHNICITY: &str = "ConsentToCollectEthnicity";
const ETHNICITY: &str = "Ethnicity";
const ETHNICITY_COLLECTED: &str = "DateAndTimeEthnicityCollected";
const LAST_MODIFIED_DATE: &str = "LastModifiedDate";
const LAST_MODIFIED_BY: &str = "LastModifiedBy";

/// Validates a diversity record against every rule.
///
/// # Arguments
///
/// * `resource` - Record to check
/// * `now` - Reference time for the not-in-future checks
///
/// # Returns
///
/// Every failure found, in rule order. Empty when the record is valid.
pub fn validate_resource(resource: &Diversity, now: DateTime<Utc>) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    check_required(resource, &mut failures);
    check_timestamps(resource, now, &mut failures);
    check_codes(resource, &mut failures);
    check_consent(resource, &mut failures);
    check_last_modified_by(resource, &mut failures);

    failures
}

fn check_required(r: &Diversity, failures: &mut Vec<ValidationFailure>) {
    let required = [
        (CUSTOMER_ID, r.customer_id.is_some()),
        (CONSENT_LLDD, r.consent_to_collect_lldd_health.is_some()),
        (
            DECLARATION,
            r.learning_difficulty_or_disability_declaration.is_some(),
        ),
        (CONSENT_ETHNICITY, r.consent_to_collect_ethnicity.is_some()),
    ];

    for (member, present) in required {
        if !present {
            failures.push(ValidationFailure::new(
                format!("The {member} field is required."),
                member,
            ));
        }
    }
}

fn check_timestamps(r: &Diversity, now: DateTime<Utc>, failures: &mut Vec<ValidationFailure>) {
    let stamps = [
        (LLDD_COLLECTED, r.date_and_time_lldd_health_consent_collected),
        (ETHNICITY_COLLECTED, r.date_and_time_ethnicity_collected),
        (LAST_MODIFIED_DATE, r.last_modified_date),
    ];

    for (member, stamp) in stamps {
        if stamp.is_some_and(|t| t > now) {
            failures.push(ValidationFailure::new(
                format!("{member} must be less than the current date/time"),
                member,
            ));
        }
    }
}

fn check_codes(r: &Diversity, failures: &mut Vec<ValidationFailure>) {
    check_declared(
        DECLARATION,
        r.learning_difficulty_or_disability_declaration,
        failures,
    );
    check_declared(PRIMARY, r.primary_learning_difficulty_or_disability, failures);
    check_declared(
        SECONDARY,
        r.secondary_learning_difficulty_or_disability,
        failures,
    );
    check_declared(ETHNICITY, r.ethnicity, failures);
}

fn check_declared<T: ReferenceCode>(
    member: &str,
    value: Option<Coded<T>>,
    failures: &mut Vec<ValidationFailure>,
) {
    if let Some(coded) = value {
        if !coded.is_declared() {
            failures.push(ValidationFailure::new(
                format!("Please supply a valid {member}"),
                member,
            ));
        }
    }
}

fn check_consent(r: &Diversity, failures: &mut Vec<ValidationFailure>) {
    let lldd_consent = r.consent_to_collect_lldd_health == Some(true);
    let ethnicity_consent = r.consent_to_collect_ethnicity == Some(true);

    if !lldd_consent {
        if let Some(declaration) = r.learning_difficulty_or_disability_declaration {
            if !declaration.is(LearningDifficultyOrDisabilityDeclaration::NotProvidedByTheCustomer)
            {
                failures.push(ValidationFailure::new(
                    format!(
                        "{DECLARATION} must be NotProvidedByTheCustomer when {CONSENT_LLDD} is not true"
                    ),
                    DECLARATION,
                ));
            }
        }

        for (member, value) in [
            (PRIMARY, r.primary_learning_difficulty_or_disability),
            (SECONDARY, r.secondary_learning_difficulty_or_disability),
        ] {
            let substantive = value.is_some_and(|coded| {
                !coded
                    .value()
                    .is_some_and(LearningDifficultyOrDisability::is_withheld)
            });
            if substantive {
                failures.push(ValidationFailure::new(
                    format!(
                        "{member} must be PreferNotToSay or NotProvided when {CONSENT_LLDD} is not true"
                    ),
                    member,
                ));
            }
        }
    }

    if !ethnicity_consent {
        if let Some(ethnicity) = r.ethnicity {
            if !ethnicity.is(Ethnicity::NotProvided) {
                failures.push(ValidationFailure::new(
                    format!("{ETHNICITY} must be NotProvided when {CONSENT_ETHNICITY} is not true"),
                    ETHNICITY,
                ));
            }
        }
    }
}

fn check_last_modified_by(r: &Diversity, failures: &mut Vec<ValidationFailure>) {
    if let Some(by) = &r.last_modified_by {
        if by.chars().count() > LAST_MODIFIED_BY_MAX_LEN {
            failures.push(ValidationFailure::new(
                format!(
                    "{LAST_MODIFIED_BY} must be at most {LAST_MODIFIED_BY_MAX_LEN} characters"
                ),
                LAST_MODIFIED_BY,
            ));
        }
    }
}
