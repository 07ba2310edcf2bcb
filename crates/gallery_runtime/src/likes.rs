//! Client-only like counters, seeded once per object key and never persisted.

use std::collections::HashMap;

use platform_host::unix_time_ms_now;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Smallest seeded like count.
pub const MIN_SEEDED_LIKES: u32 = 1;
/// Largest seeded like count.
pub const MAX_SEEDED_LIKES: u32 = 150;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Engagement state of one object.
pub struct LikeState {
    /// Like count; never negative.
    pub count: u32,
    /// Whether the current user liked the object.
    pub liked: bool,
}

#[derive(Debug, Clone)]
/// Like counters per object key.
///
/// Unseen keys get a pseudo-random count in `1..=150` the first time they are seen; known keys
/// are never re-seeded. Counts only change through [`LikeCache::toggle`].
pub struct LikeCache {
    entries: HashMap<String, LikeState>,
    rng: SmallRng,
}

impl LikeCache {
    /// Creates a cache seeded from the clock.
    pub fn new() -> Self {
        Self::with_seed(unix_time_ms_now())
    }

    /// Creates a cache with a fixed random seed, for reproducible counts.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: HashMap::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Adds every unseen key with a fresh count; known keys keep their state.
    pub fn seed<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            self.seed_one(key);
        }
    }

    fn seed_one(&mut self, key: &str) -> &mut LikeState {
        let rng = &mut self.rng;
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| LikeState {
                count: rng.random_range(MIN_SEEDED_LIKES..=MAX_SEEDED_LIKES),
                liked: false,
            })
    }

    /// Flips the liked flag of `key` and moves its count by one, seeding it first if unseen.
    pub fn toggle(&mut self, key: &str) -> LikeState {
        let state = self.seed_one(key);
        if state.liked {
            state.count = state.count.saturating_sub(1);
        } else {
            state.count = state.count.saturating_add(1);
        }
        state.liked = !state.liked;
        *state
    }

    /// Returns the state of `key` if it has been seen.
    pub fn get(&self, key: &str) -> Option<LikeState> {
        self.entries.get(key).copied()
    }

    /// Returns `true` once `key` has been seeded.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of known keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no key has been seen.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LikeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for LikeCache {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}
