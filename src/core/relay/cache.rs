/*!
Bounded page cache with FIFO eviction and age-based expiry.

The cache maps source URLs to fetched content. Policy, in full:

- At most [`PageCache::MAX_ENTRIES`] entries; inserting a brand-new key at
  capacity evicts the oldest-inserted still-present key first.
- FIFO order is insertion order only. Reads never refresh recency, and
  overwriting an existing key keeps its original position, so a hot key is
  not protected from eviction.
- Reads return content only while the entry is younger than
  [`PageCache::MAX_AGE_MS`]. Stale entries are left in place (a stale read
  is just a miss) until the FIFO bound or an overwrite removes them.
- The full map round-trips through an ordered sequence of `(key, entry)`
  pairs for persistence; malformed persisted input resets to an empty cache
  instead of failing the caller.
*/

use indexmap::IndexMap;

/// Clock abstraction for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current wall-clock time as milliseconds since the Unix epoch
    fn epoch_millis(&self) -> i64;
}

/// Production clock implementation using system time
#[derive(Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// One cached fetch result
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CachedPage {
    /// Fetched content body
    pub content: String,
    /// Wall-clock fetch time, milliseconds since the Unix epoch
    pub fetched_at_ms: i64,
    /// Byte length of `content`
    pub size_bytes: usize,
}

/// Bounded FIFO cache of fetched pages keyed by source URL
pub struct PageCache {
    entries: IndexMap<String, CachedPage>,
    clock: Box<dyn Clock>,
}

impl PageCache {
    /// Maximum number of resident entries
    pub const MAX_ENTRIES: usize = 100;
    /// Freshness window in milliseconds (1 hour)
    pub const MAX_AGE_MS: i64 = 3_600_000;

    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            clock: Box::new(SystemClock),
        }
    }

    /// Configure the cache with a custom clock (for testing)
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Look up fresh content for a source URL.
    ///
    /// Returns the content only if an entry exists and is younger than
    /// [`Self::MAX_AGE_MS`]. Never mutates: a stale entry stays resident and
    /// keeps counting toward the capacity bound.
    pub fn get(&self, key: &str) -> Option<&str> {
        let entry = self.entries.get(key)?;
        let age_ms = self.clock.epoch_millis() - entry.fetched_at_ms;
        if age_ms < Self::MAX_AGE_MS {
            Some(entry.content.as_str())
        } else {
            None
        }
    }

    /// Insert or overwrite the content for a source URL.
    ///
    /// Stamps the entry with the current clock time and the content's byte
    /// length. Overwriting an existing key refreshes content and timestamp
    /// but keeps the key's original FIFO position. A brand-new key at
    /// capacity evicts exactly one entry, the earliest-inserted one, before
    /// inserting.
    pub fn put(&mut self, key: impl Into<String>, content: impl Into<String>) {
        let key = key.into();
        let content = content.into();
        let page = CachedPage {
            size_bytes: content.len(),
            fetched_at_ms: self.clock.epoch_millis(),
            content,
        };

        if !self.entries.contains_key(&key) && self.entries.len() >= Self::MAX_ENTRIES {
            let evicted = self.entries.shift_remove_index(0);
            if let Some((evicted_key, _)) = evicted {
                tracing::debug!("page cache full, evicted oldest entry {}", evicted_key);
            }
        }

        // IndexMap keeps the existing position on overwrite, which is
        // exactly the FIFO rule: position is set at first insertion.
        self.entries.insert(key, page);
    }

    /// Snapshot the cache as an ordered sequence of `(key, entry)` pairs.
    pub fn serialize(&self) -> Vec<(String, CachedPage)> {
        self.entries
            .iter()
            .map(|(key, page)| (key.clone(), page.clone()))
            .collect()
    }

    /// Replace the cache contents from an ordered sequence of pairs.
    ///
    /// Entries are restored through the same insert path as live puts, so
    /// the capacity bound and overwrite-in-place rules hold even for input
    /// that was not produced by [`Self::serialize`]. `size_bytes` is
    /// recomputed from the content to keep the entry invariant.
    pub fn deserialize(&mut self, pairs: Vec<(String, CachedPage)>) {
        self.entries.clear();
        for (key, mut page) in pairs {
            page.size_bytes = page.content.len();
            if !self.entries.contains_key(&key) && self.entries.len() >= Self::MAX_ENTRIES {
                self.entries.shift_remove_index(0);
            }
            self.entries.insert(key, page);
        }
    }

    /// Encode the cache as the JSON array-of-pairs persistence form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.serialize())
    }

    /// Restore the cache from its JSON persistence form.
    ///
    /// Fails soft: malformed input leaves the cache empty and logs a
    /// warning rather than surfacing an error to the caller.
    pub fn from_json(&mut self, raw: &str) {
        match serde_json::from_str::<Vec<(String, CachedPage)>>(raw) {
            Ok(pairs) => self.deserialize(pairs),
            Err(err) => {
                tracing::warn!("discarding persisted page cache: {}", err);
                self.entries.clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity bound, in entries.
    pub fn max_entries(&self) -> usize {
        Self::MAX_ENTRIES
    }

    /// Freshness window, in milliseconds.
    pub fn max_age_ms(&self) -> i64 {
        Self::MAX_AGE_MS
    }

    /// Total resident content size in bytes, stale entries included.
    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(|page| page.size_bytes).sum()
    }

    /// Resident keys in FIFO (insertion) order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new()
    }
}
