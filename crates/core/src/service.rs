//! Diversity service.
//!
//! Implements the four verbs on top of the store and publisher seams:
//!
//! - **list**: every record for a customer
//! - **get_by_id**: one record for a customer
//! - **create**: assign server fields, default, validate, check the customer, store, announce
//! - **patch**: stamp, check the customer, fetch, validate the effective record, merge,
//!   replace, announce
//!
//! Concurrent patches of the same record are last-write-wins; there is no version check.

use crate::config::CoreConfig;
use crate::context::RequestContext;
use crate::defaults::{apply_defaults, assign_server_fields, stamp_patch};
use crate::merge::merge_patch;
use crate::messaging::{record_url, EventPublisher};
use crate::model::{Diversity, DiversityPatch};
use crate::store::{parse_document, DiversityStore};
use crate::validation::validate_resource;
use crate::{DiversityError, DiversityResult};
use chrono::{DateTime, Utc};
use diversity_uuid::ResourceId;
use std::sync::Arc;

/// Parses a create request body.
///
/// # Errors
///
/// Returns [`DiversityError::MalformedRequest`] if the body is not a JSON diversity record.
pub fn parse_resource(body: &str) -> DiversityResult<Diversity> {
    serde_json::from_str(body).map_err(DiversityError::MalformedRequest)
}

/// Parses a patch request body.
///
/// # Errors
///
/// Returns [`DiversityError::MalformedRequest`] if the body is not a JSON diversity patch.
pub fn parse_patch(body: &str) -> DiversityResult<DiversityPatch> {
    serde_json::from_str(body).map_err(DiversityError::MalformedRequest)
}

/// Runs the server side of a create on a submitted record without touching storage.
///
/// Takes the owner from `customer_id`, stamps the caller's touchpoint, fills defaults and
/// validates the result.
///
/// # Errors
///
/// Returns [`DiversityError::Validation`] with every failure.
pub fn prepare_create(
    ctx: &RequestContext,
    customer_id: ResourceId,
    mut resource: Diversity,
    now: DateTime<Utc>,
) -> DiversityResult<Diversity> {
    assign_server_fields(&mut resource, customer_id, ctx.touchpoint());
    apply_defaults(&mut resource, now);

    let failures = validate_resource(&resource, now);
    if !failures.is_empty() {
        tracing::info!(
            customer_id = %customer_id,
            failures = failures.len(),
            "diversity record failed validation"
        );
        return Err(DiversityError::Validation(failures));
    }
    Ok(resource)
}

#[derive(Clone)]
pub struct DiversityService {
    cfg: Arc<CoreConfig>,
    store: Arc<dyn DiversityStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl DiversityService {
    pub fn new(
        cfg: Arc<CoreConfig>,
        store: Arc<dyn DiversityStore>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cfg,
            store,
            publisher,
        }
    }

    pub fn store(&self) -> &Arc<dyn DiversityStore> {
        &self.store
    }

    /// Lists a customer's diversity records.
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::CustomerNotFound`] if the customer does not exist, or any
    /// store error.
    pub fn list(&self, customer_id: &ResourceId) -> DiversityResult<Vec<Diversity>> {
        self.require_customer(customer_id)?;
        self.store.list_for_customer(customer_id)
    }

    /// Fetches one diversity record.
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::CustomerNotFound`] if the customer does not exist, or any
    /// store error.
    pub fn get_by_id(
        &self,
        customer_id: &ResourceId,
        diversity_id: &ResourceId,
    ) -> DiversityResult<Option<Diversity>> {
        self.require_customer(customer_id)?;
        self.store.get_by_id(customer_id, diversity_id)
    }

    /// Creates the customer's diversity record.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Caller context; its touchpoint becomes `LastModifiedBy`
    /// * `customer_id` - Owner taken from the route; overrides any id in `resource`
    /// * `resource` - Submitted record
    ///
    /// # Returns
    ///
    /// The stored record with its assigned `DiversityId`.
    ///
    /// # Errors
    ///
    /// In check order:
    /// - [`DiversityError::Validation`] with every failure
    /// - [`DiversityError::CustomerReadOnly`] for a terminated customer
    /// - [`DiversityError::CustomerNotFound`] for an unknown customer
    /// - [`DiversityError::AlreadyExists`] when the customer already has a record
    /// - any store error
    pub fn create(
        &self,
        ctx: &RequestContext,
        customer_id: ResourceId,
        resource: Diversity,
    ) -> DiversityResult<Diversity> {
        let resource = prepare_create(ctx, customer_id, resource, Utc::now())?;

        self.require_writable_customer(&customer_id)?;

        // The store refuses a second record for the customer.
        let created = self.store.create(&resource)?;
        tracing::info!(
            customer_id = %customer_id,
            diversity_id = ?created.diversity_id,
            "created diversity record"
        );

        if let Some(diversity_id) = created.diversity_id {
            let url = record_url(self.base_url(ctx), &customer_id, &diversity_id);
            if let Err(e) = self.publisher.publish_created(&created, &url) {
                tracing::warn!(error = %e, customer_id = %customer_id, "failed to publish create event");
            }
        }

        Ok(created)
    }

    /// Applies a sparse patch to an existing record.
    ///
    /// The overlay is first applied to the typed record and validated, then merged into
    /// the stored JSON document so fields the model does not know are kept.
    ///
    /// # Errors
    ///
    /// In check order:
    /// - [`DiversityError::CustomerReadOnly`] for a terminated customer
    /// - [`DiversityError::CustomerNotFound`] for an unknown customer
    /// - [`DiversityError::NotFound`] when the record does not exist for this customer
    /// - [`DiversityError::Validation`] when the patched record breaks a rule
    /// - [`DiversityError::MergeFailed`] when the stored document cannot be merged
    /// - any store error
    pub fn patch(
        &self,
        ctx: &RequestContext,
        customer_id: ResourceId,
        diversity_id: ResourceId,
        mut patch: DiversityPatch,
    ) -> DiversityResult<Diversity> {
        let now = Utc::now();
        stamp_patch(&mut patch, ctx.touchpoint(), now);

        self.require_writable_customer(&customer_id)?;

        let document = self
            .store
            .get_document(&customer_id, &diversity_id)?
            .ok_or_else(|| DiversityError::NotFound(diversity_id.to_string()))?;
        let existing = parse_document(&document)?;

        let effective = patch.apply_to(&existing);
        let failures = validate_resource(&effective, now);
        if !failures.is_empty() {
            tracing::info!(
                diversity_id = %diversity_id,
                failures = failures.len(),
                "patched diversity record failed validation"
            );
            return Err(DiversityError::Validation(failures));
        }

        let merged = merge_patch(&document, Some(&patch))
            .ok_or_else(|| DiversityError::MergeFailed(diversity_id.to_string()))?;

        let updated = self
            .store
            .replace_document(&diversity_id, &merged)?
            .ok_or_else(|| DiversityError::NotFound(diversity_id.to_string()))?;
        tracing::info!(
            customer_id = %customer_id,
            diversity_id = %diversity_id,
            "patched diversity record"
        );

        let url = record_url(self.base_url(ctx), &customer_id, &diversity_id);
        if let Err(e) = self.publisher.publish_patched(&patch, customer_id, &url) {
            tracing::warn!(error = %e, customer_id = %customer_id, "failed to publish patch event");
        }

        Ok(updated)
    }

    fn base_url<'a>(&'a self, ctx: &'a RequestContext) -> &'a str {
        ctx.api_base_url()
            .or_else(|| self.cfg.api_base_url())
            .unwrap_or("")
    }

    fn require_customer(&self, customer_id: &ResourceId) -> DiversityResult<()> {
        if !self.store.customer_exists(customer_id)? {
            return Err(DiversityError::CustomerNotFound(customer_id.to_string()));
        }
        Ok(())
    }

    fn require_writable_customer(&self, customer_id: &ResourceId) -> DiversityResult<()> {
        if self.store.customer_is_read_only(customer_id)? {
            return Err(DiversityError::CustomerReadOnly(customer_id.to_string()));
        }
        self.require_customer(customer_id)
    }
}
