//! String interning for graph node keys.
//!
//! Maps task uids to dense integer node ids so that the scheduling passes can
//! use direct array indexing instead of string-keyed maps.

use rustc_hash::FxHashMap;

/// Dense node id (index into the graph's node arrays).
pub type NodeId = u32;

/// Interner that assigns node ids to uids in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct NodeInterner {
    to_id: FxHashMap<String, NodeId>,
}

impl NodeInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_id: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Intern a uid, returning its node id.
    pub fn intern(&mut self, key: &str) -> NodeId {
        if let Some(&id) = self.to_id.get(key) {
            return id;
        }
        let id = self.to_id.len() as NodeId;
        self.to_id.insert(key.to_string(), id);
        id
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<NodeId> {
        self.to_id.get(key).copied()
    }
}
