use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// Shared ephemeral key-value store holding cart entries, checkout
/// snapshots and cached identities.
///
/// The store offers no multi-key writes and no compare-and-swap: every
/// logical value is read-modify-written by its callers, so two concurrent
/// writers to one key race with last-write-wins. Key enumeration is a scan
/// and is only weakly consistent with concurrent mutation.
#[async_trait]
#[automock]
pub trait KeyValueStore {
    /// Write `fields` into the hash at `key`, creating it if absent.
    /// Existing fields not named in `fields` are left in place.
    async fn hash_set(&self, key: &str, fields: Vec<(String, String)>) -> Result<()>;

    /// All fields of the hash at `key`, or `None` when the key is absent.
    async fn hash_get_all(&self, key: &str) -> Result<Option<HashMap<String, String>>>;

    async fn exists(&self, key: &str) -> Result<bool>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Keys currently matching `pattern` (trailing-`*` wildcard).
    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>>;

    /// Write a plain string value that expires after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;
}
