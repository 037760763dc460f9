//! Substring filter over a topic catalog.
//!
//! A topic matches when its name or description contains the query,
//! compared case-insensitively. The query is used as typed: no trimming,
//! no tokenization, no ranking. Output keeps catalog order.

use crate::types::Topic;

/// Lowercased query, computed once per filter pass.
#[derive(Debug, Clone)]
pub struct Needle {
    folded: String,
}

impl Needle {
    pub fn new(query: &str) -> Self {
        Self {
            folded: query.to_lowercase(),
        }
    }

    pub fn is_match(&self, topic: &Topic) -> bool {
        if self.folded.is_empty() {
            return true;
        }
        topic.name.to_lowercase().contains(&self.folded)
            || topic.description.to_lowercase().contains(&self.folded)
    }
}

/// Single-topic predicate.
pub fn matches(topic: &Topic, query: &str) -> bool {
    Needle::new(query).is_match(topic)
}

/// Topics of `catalog` matching `query`, in catalog order.
pub fn filter<'a>(catalog: &'a [Topic], query: &str) -> Vec<&'a Topic> {
    let needle = Needle::new(query);
    catalog.iter().filter(|t| needle.is_match(t)).collect()
}

/// Positions in `catalog` of the topics matching `query`.
///
/// Same selection as [`filter`]; lets a caller hold the view without
/// borrowing the catalog.
pub fn filter_indices(catalog: &[Topic], query: &str) -> Vec<usize> {
    let needle = Needle::new(query);
    catalog
        .iter()
        .enumerate()
        .filter(|(_, t)| needle.is_match(t))
        .map(|(idx, _)| idx)
        .collect()
}
