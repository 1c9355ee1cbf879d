use std::fmt;
use serde::{Deserialize, Serialize};

/// Canonical contract identifier (stable across vendors), human-readable.
/// Examples: "SR3H5", "ESZ25", "FUT:CME:MNQZ25".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ContractId(pub String);

impl ContractId {
    #[inline]
    pub fn new<S: Into<String>>(s: S) -> Self {
        ContractId(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractId {
    fn from(s: &str) -> Self {
        ContractId(s.to_string())
    }
}

impl From<String> for ContractId {
    fn from(s: String) -> Self {
        ContractId(s)
    }
}
