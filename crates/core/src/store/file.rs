//! File-backed store.
//!
//! # Directory Structure
//!
//! ```text
//! <data_dir>/customers/<s1>/<s2>/<customer uuid>/customer.json
//! <data_dir>/diversity/<s1>/<s2>/<diversity uuid>/diversity.json
//! ```
//! where `s1`/`s2` are the first four hex characters of the UUID.
//!
//! Each write goes to its own uniquely named temporary file in the record directory, which
//! is then renamed over the target. Readers see either the old or the new document.
//!
//! Creates are serialised within one process; two processes sharing a data directory can
//! still race on the one-record-per-customer check.

use super::{parse_document, record_keys, CustomerRecord, DiversityStore};
use crate::config::CoreConfig;
use crate::constants::{CUSTOMER_FILENAME, DIVERSITY_FILENAME};
use crate::model::Diversity;
use crate::{DiversityError, DiversityResult};
use diversity_uuid::ResourceId;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// Store keeping one JSON document per record under the configured data directory.
#[derive(Debug)]
pub struct FileStore {
    cfg: Arc<CoreConfig>,
    // Held across the per-customer existence check and the write in `create`.
    create_lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store, creating its directories if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DiversityError::StorageDirCreation`] if a directory cannot be created.
    pub fn open(cfg: Arc<CoreConfig>) -> DiversityResult<Self> {
        fs::create_dir_all(cfg.diversity_dir()).map_err(DiversityError::StorageDirCreation)?;
        fs::create_dir_all(cfg.customers_dir()).map_err(DiversityError::StorageDirCreation)?;
        Ok(Self {
            cfg,
            create_lock: Mutex::new(()),
        })
    }

    fn record_path(&self, diversity_id: &ResourceId) -> PathBuf {
        diversity_id
            .sharded_dir(&self.cfg.diversity_dir())
            .join(DIVERSITY_FILENAME)
    }

    fn customer_path(&self, customer_id: &ResourceId) -> PathBuf {
        customer_id
            .sharded_dir(&self.cfg.customers_dir())
            .join(CUSTOMER_FILENAME)
    }

    /// Every stored diversity document, in no particular order.
    ///
    /// Unreadable files are logged and skipped.
    fn all_documents(&self) -> Vec<(PathBuf, String)> {
        let mut documents = Vec::new();

        let diversity_dir = self.cfg.diversity_dir();
        let s1_iter = match fs::read_dir(&diversity_dir) {
            Ok(it) => it,
            Err(_) => return documents,
        };
        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }
            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };
            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }
                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };
                for id_ent in id_iter.flatten() {
                    let record_path = id_ent.path().join(DIVERSITY_FILENAME);
                    if !record_path.is_file() {
                        continue;
                    }
                    match fs::read_to_string(&record_path) {
                        Ok(contents) => documents.push((record_path, contents)),
                        Err(e) => {
                            tracing::warn!(
                                path = %record_path.display(),
                                error = %e,
                                "failed to read diversity record"
                            );
                        }
                    }
                }
            }
        }

        documents
    }
}

fn read_optional(path: &Path) -> DiversityResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DiversityError::FileRead(e)),
    }
}

fn write_atomic(path: &Path, contents: &str) -> DiversityResult<()> {
    let dir = path.parent().ok_or_else(|| {
        DiversityError::Store(format!("record path has no parent: {}", path.display()))
    })?;
    fs::create_dir_all(dir).map_err(DiversityError::StorageDirCreation)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(DiversityError::FileWrite)?;
    tmp.write_all(contents.as_bytes())
        .map_err(DiversityError::FileWrite)?;
    tmp.persist(path)
        .map(|_| ())
        .map_err(|e| DiversityError::FileWrite(e.error))
}

/// Reads the `CustomerId` of a stored document without requiring the rest to parse.
fn owner_of(document: &str) -> Option<ResourceId> {
    let value: serde_json::Value = serde_json::from_str(document).ok()?;
    ResourceId::parse(value.get("CustomerId")?.as_str()?).ok()
}

impl DiversityStore for FileStore {
    fn put_customer(&self, customer: &CustomerRecord) -> DiversityResult<()> {
        let contents =
            serde_json::to_string_pretty(customer).map_err(DiversityError::Serialization)?;
        write_atomic(&self.customer_path(&customer.customer_id), &contents)
    }

    fn get_customer(&self, customer_id: &ResourceId) -> DiversityResult<Option<CustomerRecord>> {
        read_optional(&self.customer_path(customer_id))?
            .map(|c| serde_json::from_str(&c).map_err(DiversityError::Deserialization))
            .transpose()
    }

    fn list_for_customer(&self, customer_id: &ResourceId) -> DiversityResult<Vec<Diversity>> {
        let mut records = Vec::new();
        for (path, document) in self.all_documents() {
            if owner_of(&document) != Some(*customer_id) {
                continue;
            }
            match parse_document(&document) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unparseable record");
                }
            }
        }
        Ok(records)
    }

    fn get_document(
        &self,
        customer_id: &ResourceId,
        diversity_id: &ResourceId,
    ) -> DiversityResult<Option<String>> {
        let document = read_optional(&self.record_path(diversity_id))?;
        Ok(document.filter(|doc| owner_of(doc) == Some(*customer_id)))
    }

    fn exists_for_customer(&self, customer_id: &ResourceId) -> DiversityResult<bool> {
        Ok(self
            .all_documents()
            .iter()
            .any(|(_, doc)| owner_of(doc) == Some(*customer_id)))
    }

    fn create(&self, diversity: &Diversity) -> DiversityResult<Diversity> {
        let (diversity_id, customer_id) = record_keys(diversity)?;
        let contents = serde_json::to_string(diversity).map_err(DiversityError::Serialization)?;
        let path = self.record_path(&diversity_id);

        let _guard = self
            .create_lock
            .lock()
            .map_err(|_| DiversityError::Store("file store lock poisoned".into()))?;
        if self.exists_for_customer(&customer_id)? {
            return Err(DiversityError::AlreadyExists(customer_id.to_string()));
        }
        if path.exists() {
            return Err(DiversityError::AlreadyExists(diversity_id.to_string()));
        }
        write_atomic(&path, &contents)?;

        tracing::debug!(diversity_id = %diversity_id, path = %path.display(), "created diversity record");
        Ok(diversity.clone())
    }

    fn replace_document(
        &self,
        diversity_id: &ResourceId,
        document: &str,
    ) -> DiversityResult<Option<Diversity>> {
        let parsed = parse_document(document)?;
        let path = self.record_path(diversity_id);
        if !path.is_file() {
            return Ok(None);
        }
        write_atomic(&path, document)?;
        Ok(Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;
    use crate::store::test_support::{exercise_store, sample_record};
    use tempfile::TempDir;

    fn test_store(dir: &Path) -> FileStore {
        let cfg = Arc::new(
            CoreConfig::new(dir.to_path_buf(), StoreBackend::File, None).unwrap(),
        );
        FileStore::open(cfg).unwrap()
    }

    #[test]
    fn file_store_behaves_like_a_store() {
        let temp_dir = TempDir::new().unwrap();
        exercise_store(&test_store(temp_dir.path()));
    }

    #[test]
    fn open_creates_record_directories() {
        let temp_dir = TempDir::new().unwrap();
        test_store(temp_dir.path());
        assert!(temp_dir.path().join("diversity").is_dir());
        assert!(temp_dir.path().join("customers").is_dir());
    }

    #[test]
    fn records_are_written_to_sharded_paths() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(temp_dir.path());
        let record = sample_record(ResourceId::new());
        let diversity_id = record.diversity_id.unwrap();
        store.create(&record).unwrap();

        let simple = diversity_id.uuid().simple().to_string();
        let expected = temp_dir
            .path()
            .join("diversity")
            .join(&simple[0..2])
            .join(&simple[2..4])
            .join(&simple)
            .join("diversity.json");
        assert!(expected.is_file());
        assert_eq!(fs::read_dir(expected.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn records_survive_reopening() {
        let temp_dir = TempDir::new().unwrap();
        let customer = ResourceId::new();
        let record = sample_record(customer);
        test_store(temp_dir.path()).create(&record).unwrap();

        let reopened = test_store(temp_dir.path());
        assert_eq!(reopened.list_for_customer(&customer).unwrap(), vec![record]);
    }

    #[test]
    fn list_skips_corrupt_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(temp_dir.path());
        let customer = ResourceId::new();
        let record = sample_record(customer);
        store.create(&record).unwrap();

        let stray = temp_dir.path().join("diversity/ab/cd/abcd0000000000000000000000000000");
        fs::create_dir_all(&stray).unwrap();
        fs::write(stray.join("diversity.json"), "{ broken").unwrap();

        assert_eq!(store.list_for_customer(&customer).unwrap(), vec![record]);
    }

    #[test]
    fn concurrent_replaces_all_succeed() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(temp_dir.path());
        let record = sample_record(ResourceId::new());
        let diversity_id = record.diversity_id.unwrap();
        store.create(&record).unwrap();

        let documents: Vec<String> = (0..8)
            .map(|i| {
                let mut doc = serde_json::to_value(&record).unwrap();
                doc["Ethnicity"] = serde_json::json!(31 + i);
                doc.to_string()
            })
            .collect();

        let store = &store;
        for _ in 0..20 {
            std::thread::scope(|scope| {
                let handles: Vec<_> = documents
                    .iter()
                    .map(|doc| scope.spawn(move || store.replace_document(&diversity_id, doc)))
                    .collect();
                for handle in handles {
                    assert!(handle.join().unwrap().unwrap().is_some());
                }
            });
        }

        let stored = store.get_document(&record.customer_id.unwrap(), &diversity_id).unwrap();
        assert!(documents.contains(&stored.unwrap()));
    }

    #[test]
    fn concurrent_creates_keep_one_record_per_customer() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(temp_dir.path());
        let customer = ResourceId::new();
        let barrier = std::sync::Barrier::new(16);
        let (store_ref, barrier) = (&store, &barrier);

        let created = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    scope.spawn(move || {
                        let record = sample_record(customer);
                        barrier.wait();
                        store_ref.create(&record)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(Result::is_ok)
                .count()
        });

        assert_eq!(created, 1);
        assert_eq!(store.list_for_customer(&customer).unwrap().len(), 1);
    }

    #[test]
    fn missing_customer_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(temp_dir.path());
        assert_eq!(store.get_customer(&ResourceId::new()).unwrap(), None);
    }
}
