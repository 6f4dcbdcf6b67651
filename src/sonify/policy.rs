use serde::{Deserialize, Serialize};

/// What to do with a core or track index that points past the end of what exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexPolicy {
    /// Substitute index 0
    #[default]
    ClampToZero,
    /// Substitute the last valid index
    ClampToLast,
    /// Refuse the index
    Reject,
}

impl IndexPolicy {
    /// Resolve `index` against a collection of `len` items.
    ///
    /// In-range indices pass through untouched under every policy. Returns
    /// `None` when the policy rejects the index or there is nothing to fall back to.
    pub fn resolve(self, index: usize, len: usize) -> Option<usize> {
        if index < len {
            return Some(index);
        }
        match self {
            IndexPolicy::ClampToZero => (len > 0).then_some(0),
            IndexPolicy::ClampToLast => len.checked_sub(1),
            IndexPolicy::Reject => None,
        }
    }
}
