//! Dataset identifiers on the hub

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `owner/name` reference to a hub dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetRef {
    /// Account that owns the dataset
    pub owner: String,
    /// Dataset slug
    pub name: String,
}

impl DatasetRef {
    /// Parse `owner/name`
    ///
    /// Exactly one `/` is allowed and both halves must be non-empty.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        match reference.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::invalid_value(
                "datasetRef",
                format!("expected 'owner/name', got '{reference}'"),
            )),
        }
    }

    /// API path that serves the dataset archive
    pub fn download_path(&self) -> String {
        format!("api/v1/datasets/download/{}/{}", self.owner, self.name)
    }

    /// File name the archive is saved under
    pub fn archive_name(&self) -> String {
        format!("{}.zip", self.name)
    }
}

impl FromStr for DatasetRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
