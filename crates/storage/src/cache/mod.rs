pub mod snapshot;

use faststr::FastStr;
use std::collections::HashMap;

/// Short model id → remote model name.
///
/// Writers replace the whole table; readers observe either the previous or
/// the new table, never a mix of both.
pub trait ModelTable: Send + Sync + 'static {
    fn init() -> Self;

    /// `key` is normalized before the lookup.
    fn get(&self, key: &str) -> Option<FastStr>;

    fn replace(&self, entries: HashMap<FastStr, FastStr>);

    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The single key representation for model ids.
///
/// Catalogs key models by integers or by strings; both end up here, so `42`,
/// `"42"` and `"042"` share one key.
pub fn normalize_model_key(id: &str) -> FastStr {
    let id = id.trim();
    match id.parse::<i64>() {
        Ok(n) => n.to_string().into(),
        Err(_) => id.to_owned().into(),
    }
}
