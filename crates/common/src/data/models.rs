use faststr::FastStr;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

pub const UNAVAILABLE_MODEL_ID: &str = "error";
pub const UNAVAILABLE_MODEL_NAME: &str =
    "Could not fetch models, check the Infomaniak API key and product id.";

/// Catalog ids arrive either as JSON integers or as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogId {
    Int(i64),
    Text(FastStr),
}

impl Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogModel {
    pub id:   CatalogId,
    pub name: FastStr,
    #[serde(rename = "type")]
    pub ty:   FastStr,
}

impl CatalogModel {
    pub fn is_llm(&self) -> bool {
        self.ty.as_str() == "llm"
    }
}

/// Body of `GET /models`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub data: Vec<CatalogModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id:           FastStr,
    pub display_name: FastStr,
    pub remote_name:  FastStr,
}

impl ModelEntry {
    /// Placeholder returned in place of the catalog when it cannot be fetched.
    pub fn unavailable() -> Self {
        Self {
            id:           FastStr::from_static_str(UNAVAILABLE_MODEL_ID),
            display_name: FastStr::from_static_str(UNAVAILABLE_MODEL_NAME),
            remote_name:  FastStr::empty(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.id.as_str() == UNAVAILABLE_MODEL_ID && self.remote_name.is_empty()
    }
}
