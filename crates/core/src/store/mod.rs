//! Document store seam.
//!
//! The service only talks to storage through [`DiversityStore`]. Two development backends
//! ship with the crate:
//! - [`MemoryStore`]: process-local maps, used by tests and `DIVERSITY_STORE=memory`
//! - [`FileStore`]: one JSON document per record in sharded directories
//!
//! Both store diversity records in serialised form so that fields unknown to
//! [`Diversity`] survive a patch. Neither offers optimistic concurrency: the last replace
//! wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::config::{CoreConfig, StoreBackend};
use crate::model::Diversity;
use crate::{DiversityError, DiversityResult};
use chrono::{DateTime, Utc};
use diversity_uuid::ResourceId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The slice of a customer record this service needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "CustomerId")]
    pub customer_id: ResourceId,
    /// Set once the customer has been terminated; the customer is read only from then on.
    #[serde(rename = "DateOfTermination", default)]
    pub date_of_termination: Option<DateTime<Utc>>,
}

impl CustomerRecord {
    pub fn new(customer_id: ResourceId) -> Self {
        Self {
            customer_id,
            date_of_termination: None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.date_of_termination.is_some()
    }
}

/// Storage operations used by the diversity service.
pub trait DiversityStore: Send + Sync {
    /// Inserts or replaces a customer record.
    fn put_customer(&self, customer: &CustomerRecord) -> DiversityResult<()>;

    /// Looks up a customer record.
    fn get_customer(&self, customer_id: &ResourceId) -> DiversityResult<Option<CustomerRecord>>;

    fn customer_exists(&self, customer_id: &ResourceId) -> DiversityResult<bool> {
        Ok(self.get_customer(customer_id)?.is_some())
    }

    /// True when the customer exists and has been terminated.
    fn customer_is_read_only(&self, customer_id: &ResourceId) -> DiversityResult<bool> {
        Ok(self
            .get_customer(customer_id)?
            .is_some_and(|c| c.is_read_only()))
    }

    /// All diversity records owned by a customer.
    fn list_for_customer(&self, customer_id: &ResourceId) -> DiversityResult<Vec<Diversity>>;

    /// The stored document for a record, if it exists and belongs to `customer_id`.
    fn get_document(
        &self,
        customer_id: &ResourceId,
        diversity_id: &ResourceId,
    ) -> DiversityResult<Option<String>>;

    fn get_by_id(
        &self,
        customer_id: &ResourceId,
        diversity_id: &ResourceId,
    ) -> DiversityResult<Option<Diversity>> {
        self.get_document(customer_id, diversity_id)?
            .map(|doc| parse_document(&doc))
            .transpose()
    }

    /// True when the customer already owns a diversity record.
    fn exists_for_customer(&self, customer_id: &ResourceId) -> DiversityResult<bool> {
        Ok(!self.list_for_customer(customer_id)?.is_empty())
    }

    /// Stores a new record.
    ///
    /// The check that the owning customer has no record yet and the insert happen as one
    /// step, so a customer never ends up with two records.
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::InvalidInput`] when the record has no `DiversityId` or
    /// `CustomerId`, and [`DiversityError::AlreadyExists`] when the customer already owns a
    /// record or the id is taken.
    fn create(&self, diversity: &Diversity) -> DiversityResult<Diversity>;

    /// Replaces the stored document of an existing record.
    ///
    /// Returns `None` when no record with `diversity_id` exists.
    fn replace_document(
        &self,
        diversity_id: &ResourceId,
        document: &str,
    ) -> DiversityResult<Option<Diversity>>;
}

/// Opens the store selected by `cfg`.
///
/// # Errors
///
/// Returns an error if the file store's directories cannot be created.
pub fn open_store(cfg: Arc<CoreConfig>) -> DiversityResult<Arc<dyn DiversityStore>> {
    match cfg.store_backend() {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::File => Ok(Arc::new(FileStore::open(cfg)?)),
    }
}

pub(crate) fn parse_document(document: &str) -> DiversityResult<Diversity> {
    serde_json::from_str(document).map_err(DiversityError::Deserialization)
}

/// The identifiers a record must carry to be stored.
pub(crate) fn record_keys(diversity: &Diversity) -> DiversityResult<(ResourceId, ResourceId)> {
    let diversity_id = diversity
        .diversity_id
        .ok_or_else(|| DiversityError::InvalidInput("record has no DiversityId".into()))?;
    let customer_id = diversity
        .customer_id
        .ok_or_else(|| DiversityError::InvalidInput("record has no CustomerId".into()))?;
    Ok((diversity_id, customer_id))
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn customer_record_defaults_termination() {
        let record: CustomerRecord =
            serde_json::from_str(r#"{"CustomerId":"550e8400-e29b-41d4-a716-446655440000"}"#)
                .unwrap();
        assert!(!record.is_read_only());
    }

    #[test]
    fn record_keys_require_both_ids() {
        let err = record_keys(&Diversity::default()).unwrap_err();
        assert!(matches!(err, DiversityError::InvalidInput(msg) if msg.contains("DiversityId")));
    }

    #[test]
    fn open_store_memory_backend() {
        let cfg = Arc::new(
            CoreConfig::new(PathBuf::from("unused"), StoreBackend::Memory, None).unwrap(),
        );
        let store = open_store(cfg).unwrap();
        assert!(!store.customer_exists(&ResourceId::new()).unwrap());
    }
}
