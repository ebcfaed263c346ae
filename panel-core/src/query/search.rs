//! Entity lookup by key or display name.

use panel::{EntityKey, EntityMatch};
use std::cmp::Ordering;

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchTier {
    Exact,
    Prefix,
    Substring,
}

fn tier(needle: &str, haystack: &str) -> Option<MatchTier> {
    if haystack == needle {
        Some(MatchTier::Exact)
    } else if haystack.starts_with(needle) {
        Some(MatchTier::Prefix)
    } else if haystack.contains(needle) {
        Some(MatchTier::Substring)
    } else {
        None
    }
}

/// Searchable entity directory: one entry per identified entity.
#[derive(Debug, Clone, Default)]
pub struct EntityDirectory {
    entries: Vec<DirectoryEntry>,
}

#[derive(Debug, Clone)]
struct DirectoryEntry {
    entry: EntityMatch,
    key_folded: String,
    name_folded: String,
    name_upper: String,
}

impl EntityDirectory {
    /// `names` yields each entity with its display name (the key itself when
    /// the entity never carries a name).
    pub fn new<I>(names: I) -> Self
    where
        I: IntoIterator<Item = (EntityKey, String)>,
    {
        let entries = names
            .into_iter()
            .map(|(key, name)| DirectoryEntry {
                key_folded: key.as_str().to_lowercase(),
                name_folded: name.to_lowercase(),
                name_upper: name.to_uppercase(),
                entry: EntityMatch { key, name },
            })
            .collect();
        Self { entries }
    }

    /// Case-insensitive search over keys and names.
    ///
    /// Exact matches rank before prefix matches, which rank before substring
    /// matches; the better of the key and name match counts. Ties are broken by
    /// display name, then key. A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<EntityMatch> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<(MatchTier, &DirectoryEntry)> = self
            .entries
            .iter()
            .filter_map(|e| {
                let best = match (tier(&needle, &e.key_folded), tier(&needle, &e.name_folded)) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
                best.map(|t| (t, e))
            })
            .collect();

        hits.sort_by(|(ta, a), (tb, b)| match ta.cmp(tb) {
            Ordering::Equal => a
                .name_upper
                .cmp(&b.name_upper)
                .then_with(|| a.entry.key.cmp(&b.entry.key)),
            other => other,
        });

        hits.into_iter()
            .take(limit)
            .map(|(_, e)| e.entry.clone())
            .collect()
    }
}
