//! The cache boundary: a plain key/blob store the core reads from and
//! writes to, never implements.
//!
//! Grounded on spec.md §6 ("The core does not define the on-disk format;
//! it requires only `get_cached(key) -> bytes | none` and `put(key, bytes)`")
//! — the on-disk cache manager itself (storage engine, fingerprinting,
//! eviction) is an explicit Non-goal; only this trait boundary is in scope.

use crate::error::Result;

/// Key identifying one cached pair of indexes: derived by the caller from
/// `(copyright-dir fingerprint, renewal-dir fingerprint, serialized config,
/// min_year, max_year, brute_force flag)` per spec.md §6. Opaque to this
/// crate — just the bytes used to look the blob up.
pub type CacheKey = String;

/// A key -> serialized-index-blob store. Implementations own the on-disk
/// (or remote) storage format entirely; this crate only ever calls
/// [`CacheStore::get_cached`] and [`CacheStore::put`].
pub trait CacheStore {
    /// Fetch the blob for `key`, or `Ok(None)` on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::MatchError::Cache`] if the store could not be
    /// read; the caller should treat this the same as a miss and rebuild.
    fn get_cached(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;

    /// Store `blob` under `key`, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::MatchError::Cache`] if the store could not be
    /// written; a failed write is non-fatal to the caller, which can still
    /// proceed with the freshly built indexes.
    fn put(&self, key: &CacheKey, blob: &[u8]) -> Result<()>;
}
