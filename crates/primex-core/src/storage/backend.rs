use crate::error::Result;

/// Abstract string key-value store. Values are opaque serialized blobs;
/// the portfolio adapter decides what goes in them.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}
