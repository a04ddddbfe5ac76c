use super::{parse_document, record_keys, CustomerRecord, DiversityStore};
use crate::model::Diversity;
use crate::{DiversityError, DiversityResult};
use diversity_uuid::ResourceId;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug)]
struct StoredDocument {
    customer_id: ResourceId,
    document: String,
}

/// In-process store backed by hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: RwLock<HashMap<ResourceId, CustomerRecord>>,
    records: RwLock<HashMap<ResourceId, StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DiversityError {
    DiversityError::Store("memory store lock poisoned".into())
}

impl DiversityStore for MemoryStore {
    fn put_customer(&self, customer: &CustomerRecord) -> DiversityResult<()> {
        self.customers
            .write()
            .map_err(poisoned)?
            .insert(customer.customer_id, customer.clone());
        Ok(())
    }

    fn get_customer(&self, customer_id: &ResourceId) -> DiversityResult<Option<CustomerRecord>> {
        Ok(self.customers.read().map_err(poisoned)?.get(customer_id).cloned())
    }

    fn list_for_customer(&self, customer_id: &ResourceId) -> DiversityResult<Vec<Diversity>> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .values()
            .filter(|r| r.customer_id == *customer_id)
            .map(|r| parse_document(&r.document))
            .collect()
    }

    fn get_document(
        &self,
        customer_id: &ResourceId,
        diversity_id: &ResourceId,
    ) -> DiversityResult<Option<String>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records
            .get(diversity_id)
            .filter(|r| r.customer_id == *customer_id)
            .map(|r| r.document.clone()))
    }

    fn create(&self, diversity: &Diversity) -> DiversityResult<Diversity> {
        let (diversity_id, customer_id) = record_keys(diversity)?;
        let document = serde_json::to_string(diversity).map_err(DiversityError::Serialization)?;

        let mut records = self.records.write().map_err(poisoned)?;
        if records.values().any(|r| r.customer_id == customer_id) {
            return Err(DiversityError::AlreadyExists(customer_id.to_string()));
        }
        if records.contains_key(&diversity_id) {
            return Err(DiversityError::AlreadyExists(diversity_id.to_string()));
        }
        records.insert(
            diversity_id,
            StoredDocument {
                customer_id,
                document,
            },
        );
        Ok(diversity.clone())
    }

    fn replace_document(
        &self,
        diversity_id: &ResourceId,
        document: &str,
    ) -> DiversityResult<Option<Diversity>> {
        let parsed = parse_document(document)?;

        let mut records = self.records.write().map_err(poisoned)?;
        match records.get_mut(diversity_id) {
            Some(stored) => {
                stored.document = document.to_string();
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }
}
