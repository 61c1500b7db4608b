mod cache;

pub use cache::{ModelTable, normalize_model_key, snapshot::ModelCache};
