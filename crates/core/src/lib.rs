//! # Diversity Core
//!
//! Core business logic for the diversity record service.
//!
//! This crate contains the record model and the operations on it:
//! - Default values and server-assigned fields on create
//! - Validation, including consent-gated classification rules
//! - Sparse PATCH merge over the stored JSON document
//! - The store and event publisher seams, with development backends
//! - [`DiversityService`], which runs the four verbs
//!
//! **No API concerns**: HTTP routing, header parsing and status codes belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod context;
pub mod defaults;
mod error;
pub mod merge;
pub mod messaging;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use config::{CoreConfig, StoreBackend};
pub use constants::DEFAULT_DATA_DIR;
pub use context::RequestContext;
pub use error::{DiversityError, DiversityResult};
pub use messaging::{DiversityEvent, EventPublisher, QueuePublisher, TracingPublisher};
pub use model::{Diversity, DiversityPatch};
pub use service::DiversityService;
pub use store::{open_store, CustomerRecord, DiversityStore, FileStore, MemoryStore};
pub use validation::{validate_resource, ValidationFailure};

pub use diversity_types::TouchpointId;
pub use diversity_uuid::ResourceId;
