/// The position of a node in the sequential table of a [`Ring`].
///
/// Links between the nodes of a ring are stored as indices into its `nodes`
/// arena rather than as references, so a ring never holds a reference
/// cycle. An index stays valid until the node it refers to is removed;
/// afterwards the slot may be recycled for a different value.
///
/// [`Ring`]: `crate::Ring`
#[derive(Debug, Eq, PartialEq, Copy, Clone, Hash)]
#[repr(transparent)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Creates a new index.
    #[must_use]
    pub const fn new(ix: usize) -> Self {
        Self(ix)
    }

    /// Returns the index value as a primitive type.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

/// The position of the first node ever created in a [`Ring`].
///
/// [`Ring`]: `crate::Ring`
pub(crate) const FIRST_NODE: NodeIndex = NodeIndex::new(0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_get() {
        assert_eq!(NodeIndex::new(0).get(), 0);
        assert_eq!(NodeIndex::new(123).get(), 123);
        assert_eq!(NodeIndex::new(456789).get(), 456789);
        assert_eq!(FIRST_NODE.get(), 0);
    }

    #[test]
    fn index_equality_is_positional() {
        assert_eq!(NodeIndex::new(7), NodeIndex::new(7));
        assert_ne!(NodeIndex::new(7), NodeIndex::new(8));
    }
}
