//! Id categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(domain, subdomain)` pair scoping one independent numeric-id space,
/// e.g. `(driver, levelzero)` or `(runtime, sycl)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Category {
    pub domain: String,
    pub subdomain: String,
}

impl Category {
    pub fn new(domain: impl Into<String>, subdomain: impl Into<String>) -> Self {
        Category {
            domain: domain.into(),
            subdomain: subdomain.into(),
        }
    }

    /// Snake-case key, e.g. `driver_levelzero`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.domain, self.subdomain)
    }

    /// Api group constant suffix, e.g. `LEVELZERO`.
    pub fn api_group(&self) -> String {
        self.subdomain.to_uppercase()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.subdomain)
    }
}
