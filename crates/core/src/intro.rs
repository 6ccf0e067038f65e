//! The one durable client flag: whether the intro help panel has already been
//! auto-expanded in this browser profile.

pub const SEEN_VALUE: &str = "true";

/// Storage seam for the flag.
pub trait FlagStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Whether the panel should auto-expand, given the stored flag.
pub fn should_auto_expand(stored: Option<&str>) -> bool {
    stored.map_or(true, |v| v.is_empty())
}

/// Records that the panel has been auto-expanded.
pub fn mark_seen(store: &mut impl FlagStore, key: &str) {
    store.set(key, SEEN_VALUE);
    tracing::debug!(key, "intro panel auto-expanded for the first time");
}
