mod chat;
mod models;
mod request;

pub use chat::{ChatRequest, FORWARDED_FIELDS};
pub use models::{
    CatalogId, CatalogModel, ModelCatalog, ModelEntry, UNAVAILABLE_MODEL_ID, UNAVAILABLE_MODEL_NAME,
};
pub use request::RequestData;
