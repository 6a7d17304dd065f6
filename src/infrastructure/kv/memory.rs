use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::repositories::kv_store::KeyValueStore;

#[derive(Debug, Clone)]
enum Value {
    Hash(HashMap<String, String>),
    Text(String),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

/// Process-local [`KeyValueStore`] for tests and single-node development
/// runs. Production deployments use [`RedisKv`](super::redis::RedisKv).
#[derive(Debug, Default)]
pub struct InMemoryKv {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

// Only the trailing-`*` form the key builder emits.
fn matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKv {
    async fn hash_set(&self, key: &str, fields: Vec<(String, String)>) -> Result<()> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(key.to_string())
            .and_modify(|entry| {
                if entry.expired() || !matches!(entry.value, Value::Hash(_)) {
                    *entry = Entry {
                        value: Value::Hash(HashMap::new()),
                        expires_at: None,
                    };
                }
            })
            .or_insert_with(|| Entry {
                value: Value::Hash(HashMap::new()),
                expires_at: None,
            });
        if let Value::Hash(map) = &mut entry.value {
            map.extend(fields);
        }
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<Option<HashMap<String, String>>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).and_then(|entry| {
            if entry.expired() {
                return None;
            }
            match &entry.value {
                Value::Hash(map) => Some(map.clone()),
                Value::Text(_) => None,
            }
        }))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).is_some_and(|entry| !entry.expired()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, entry)| matches(pattern, key) && !entry.expired())
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: Value::Text(value),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).and_then(|entry| {
            if entry.expired() {
                return None;
            }
            match &entry.value {
                Value::Text(value) => Some(value.clone()),
                Value::Hash(_) => None,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_set_merges_fields_and_get_all_returns_them() {
        let kv = InMemoryKv::new();
        kv.hash_set("h", vec![("a".into(), "1".into())]).await.unwrap();
        kv.hash_set("h", vec![("b".into(), "2".into())]).await.unwrap();

        let fields = kv.hash_get_all("h").await.unwrap().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["a"], "1");
        assert_eq!(fields["b"], "2");
    }

    #[tokio::test]
    async fn missing_hash_reads_as_none() {
        let kv = InMemoryKv::new();
        assert!(kv.hash_get_all("nope").await.unwrap().is_none());
        assert!(!kv.exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn expired_text_value_is_gone() {
        let kv = InMemoryKv::new();
        kv.set_with_ttl("k", "v".into(), Duration::ZERO).await.unwrap();

        assert!(kv.get("k").await.unwrap().is_none());
        assert!(!kv.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn live_text_value_is_returned() {
        let kv = InMemoryKv::new();
        kv.set_with_ttl("k", "v".into(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn scan_matches_trailing_wildcard_only() {
        let kv = InMemoryKv::new();
        kv.hash_set("cart:5:7", vec![("a".into(), "1".into())])
            .await
            .unwrap();
        kv.hash_set("cart:5:9", vec![("a".into(), "1".into())])
            .await
            .unwrap();
        kv.hash_set("cart:6:7", vec![("a".into(), "1".into())])
            .await
            .unwrap();

        let mut keys = kv.scan_keys("cart:5:*").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["cart:5:7", "cart:5:9"]);
    }
}
