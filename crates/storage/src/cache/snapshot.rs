use crate::cache::{ModelTable, normalize_model_key};
use arc_swap::ArcSwap;
use faststr::FastStr;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

#[derive(Clone)]
pub struct ModelCache(Arc<ArcSwap<HashMap<FastStr, FastStr>>>);

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCache {
    pub fn new() -> Self {
        Self(Arc::new(ArcSwap::from_pointee(HashMap::new())))
    }

    /// Current table; unaffected by later replacements.
    pub fn snapshot(&self) -> Arc<HashMap<FastStr, FastStr>> {
        self.0.load_full()
    }
}

impl ModelTable for ModelCache {
    fn init() -> Self {
        Self::new()
    }

    fn get(&self, key: &str) -> Option<FastStr> {
        let key = normalize_model_key(key);
        self.0.load().get(key.as_str()).cloned()
    }

    fn replace(&self, entries: HashMap<FastStr, FastStr>) {
        let entries: HashMap<FastStr, FastStr> = entries
            .into_iter()
            .map(|(k, v)| (normalize_model_key(&k), v))
            .collect();
        debug!(count = entries.len(), "model table replaced");
        self.0.store(Arc::new(entries));
    }

    fn clear(&self) {
        self.0.store(Arc::new(HashMap::new()));
    }

    fn len(&self) -> usize {
        self.0.load().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn table(entries: &[(&str, &str)]) -> HashMap<FastStr, FastStr> {
        entries
            .iter()
            .map(|(k, v)| (FastStr::from(k.to_string()), FastStr::from(v.to_string())))
            .collect()
    }

    #[test]
    fn test_get_normalizes() {
        let cache = ModelCache::init();
        cache.replace(table(&[("042", "mixtral"), ("llama", "llama3")]));
        assert_eq!(cache.get("42").as_deref(), Some("mixtral"));
        assert_eq!(cache.get(" 42").as_deref(), Some("mixtral"));
        assert_eq!(cache.get("llama").as_deref(), Some("llama3"));
        assert!(cache.get("43").is_none());
    }

    #[test]
    fn test_replace_is_not_merge() {
        let cache = ModelCache::init();
        cache.replace(table(&[("1", "a"), ("2", "b")]));
        cache.replace(table(&[("3", "c")]));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("1").is_none());
        assert_eq!(cache.get("3").as_deref(), Some("c"));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_snapshot_is_stable() {
        let cache = ModelCache::init();
        cache.replace(table(&[("1", "a")]));
        let before = cache.snapshot();
        cache.replace(table(&[("2", "b")]));
        assert_eq!(before.len(), 1);
        assert!(before.contains_key("1"));
        assert!(cache.snapshot().contains_key("2"));
    }

    #[test]
    fn test_concurrent_replace() {
        let cache = ModelCache::init();
        let writers: Vec<_> = (0..8)
            .map(|w| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for round in 0..200 {
                        let entries = (0..(w + 1))
                            .map(|i| {
                                (
                                    FastStr::from(i.to_string()),
                                    FastStr::from(format!("model-{w}-{round}")),
                                )
                            })
                            .collect();
                        cache.replace(entries);
                    }
                })
            })
            .collect();
        let reader = {
            let cache = cache.clone();
            thread::spawn(move || {
                for _ in 0..2000 {
                    let snapshot = cache.snapshot();
                    // every entry of one snapshot comes from the same write
                    let mut writes = snapshot
                        .values()
                        .map(|v| v.rsplitn(2, '-').nth(1).unwrap_or_default().to_owned());
                    if let Some(first) = writes.next() {
                        assert!(writes.all(|w| w == first));
                    }
                }
            })
        };
        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        let snapshot = cache.snapshot();
        assert!(!snapshot.is_empty());
        assert!(snapshot.values().all(|v| v.starts_with("model-")));
    }
}
