//! Constants used throughout the diversity core crate.

/// Default directory for record storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "diversity_data";

/// Directory name for diversity record storage.
pub const DIVERSITY_DIR_NAME: &str = "diversity";

/// Directory name for customer record storage.
pub const CUSTOMERS_DIR_NAME: &str = "customers";

/// Filename for a stored diversity document.
pub const DIVERSITY_FILENAME: &str = "diversity.json";

/// Filename for a stored customer document.
pub const CUSTOMER_FILENAME: &str = "customer.json";

/// Path segment for diversity records beneath a customer.
pub const DIVERSITY_RESOURCE_SEGMENT: &str = "diversitydetails";

/// Maximum length of the `LastModifiedBy` field.
pub const LAST_MODIFIED_BY_MAX_LEN: usize = 10;
