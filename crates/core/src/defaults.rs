//! Server-assigned values for new and patched records.

use crate::model::{Diversity, DiversityPatch};
use chrono::{DateTime, Utc};
use diversity_types::TouchpointId;
use diversity_uuid::ResourceId;
use reference_data::{
    Ethnicity, LearningDifficultyOrDisability, LearningDifficultyOrDisabilityDeclaration,
};

/// Fills absent fields of a record about to be created.
///
/// `LastModifiedDate` becomes `now`, the declaration becomes NotProvidedByTheCustomer and
/// the three classifications become NotProvided. Present values are never overwritten, so
/// running this twice changes nothing the second time.
pub fn apply_defaults(resource: &mut Diversity, now: DateTime<Utc>) {
    resource.last_modified_date.get_or_insert(now);
    resource
        .learning_difficulty_or_disability_declaration
        .get_or_insert(LearningDifficultyOrDisabilityDeclaration::NotProvidedByTheCustomer.into());
    resource
        .primary_learning_difficulty_or_disability
        .get_or_insert(LearningDifficultyOrDisability::NotProvided.into());
    resource
        .secondary_learning_difficulty_or_disability
        .get_or_insert(LearningDifficultyOrDisability::NotProvided.into());
    resource
        .ethnicity
        .get_or_insert(Ethnicity::NotProvided.into());
}

/// Sets the identifiers and audit fields the server owns on create.
///
/// A fresh `DiversityId` is always assigned; any id sent by the caller is discarded.
pub fn assign_server_fields(
    resource: &mut Diversity,
    customer_id: ResourceId,
    touchpoint: &TouchpointId,
) {
    resource.diversity_id = Some(ResourceId::new());
    resource.customer_id = Some(customer_id);
    resource.last_modified_by = Some(touchpoint.as_str().to_string());
}

/// Stamps the audit fields of a patch.
///
/// `LastModifiedBy` always becomes the acting touchpoint; `LastModifiedDate` is filled
/// with `now` only when the caller did not supply one.
pub fn stamp_patch(patch: &mut DiversityPatch, touchpoint: &TouchpointId, now: DateTime<Utc>) {
    patch.last_modified_by = Some(touchpoint.as_str().to_string());
    patch.last_modified_date.get_or_insert(now);
}
