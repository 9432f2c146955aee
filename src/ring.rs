use crate::indices::{NodeIndex, FIRST_NODE};
use crate::Error;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;

/// The number of clockwise steps that [`Ring::insert`] takes before placing
/// a new value; the value lands _before_ the node reached this way, that is,
/// between the first and second clockwise neighbors of the cursor.
pub const INSERT_OFFSET: usize = 2;

/// The number of counterclockwise steps that [`Ring::remove`] takes to reach
/// the node that it unlinks.
pub const REMOVE_OFFSET: usize = 7;

/// A value of a [`Ring`] together with the links to its neighbors.
#[derive(Clone)]
pub(crate) struct Entry<T> {
    /// The payload of this node.
    value: T,
    /// The previous node in counterclockwise order.
    ///
    /// # Invariant
    ///
    /// The `next` link of the node at index `prev` points back to this node.
    /// In a ring with a single node, `prev` and `next` refer to the node
    /// itself.
    prev: NodeIndex,
    /// The next node in clockwise order.
    ///
    /// # Invariant
    ///
    /// The `prev` link of the node at index `next` points back to this node.
    next: NodeIndex,
}

/// A slot in the sequential table of a [`Ring`], which either holds a live
/// node or is waiting to be recycled.
#[derive(Clone)]
pub(crate) enum Node<T> {
    /// A node that currently belongs to the ring.
    Entry(Entry<T>),
    /// A slot released by a removal.
    Vacant {
        /// The next vacant slot in the free list, if any.
        next_free: Option<NodeIndex>,
    },
}

/// A circular sequence of values with a movable cursor.
///
/// Every operation is anchored at the cursor: it can step to either
/// neighbor, a new value is [inserted](`Self::insert`) at a fixed distance
/// clockwise from it, and a value is [removed](`Self::remove`) at a fixed
/// distance counterclockwise from it. Each of these operations takes $O(1)$
/// time, regardless of the number of values in the ring.
///
/// The nodes are stored in an arena and link to each other by [`NodeIndex`].
/// Slots freed by removals are chained into a free list and reused by later
/// insertions, so the arena never grows beyond the largest number of values
/// that were alive at the same time.
///
/// A ring is never empty: it starts with one value and refuses to remove
/// its last one.
///
/// # Examples
///
/// ```
/// use marble_ring::Ring;
///
/// let mut ring = Ring::new(0);
/// for value in 1..=4 {
///     ring.insert(value);
/// }
/// assert_eq!(ring.to_string(), "0 (4) 2 1 3");
/// assert_eq!(ring.len(), 5);
///
/// // Seven steps counterclockwise from 4 wrap around the ring to 3.
/// assert_eq!(ring.remove(), Ok(3));
/// assert_eq!(ring.to_string(), "(0) 4 2 1");
/// ```
#[derive(Clone)]
pub struct Ring<T> {
    /// The live nodes, interleaved with the vacant slots of the free list.
    nodes: Vec<Node<T>>,
    /// The current position of the ring.
    ///
    /// # Invariant
    ///
    /// This index always refers to a [live node](`Node::Entry`).
    cursor: NodeIndex,
    /// The node where whole-ring traversals begin. It is the first node of
    /// the ring until that node is removed, at which point its clockwise
    /// neighbor takes over.
    anchor: NodeIndex,
    /// The most recently vacated slot, if any.
    free: Option<NodeIndex>,
    /// The number of live nodes.
    ///
    /// # Invariant
    ///
    /// `len` is positive, and it equals the number of steps needed to return
    /// to `cursor` when walking clockwise from it.
    len: usize,
}

impl<T> Ring<T> {
    /// Creates a ring whose only node holds `first`. The node is its own
    /// predecessor and successor, and the cursor starts on it.
    #[must_use]
    pub fn new(first: T) -> Self {
        Self::with_capacity(first, 1)
    }

    /// Creates a ring whose only node holds `first`, with room for at least
    /// `capacity` nodes before the arena needs to reallocate.
    ///
    /// If that much memory cannot be reserved, the ring starts with room for
    /// a single node and grows on demand instead.
    #[must_use]
    pub fn with_capacity(first: T, capacity: usize) -> Self {
        let mut nodes = Vec::new();
        if nodes.try_reserve_exact(capacity.max(1)).is_err() {
            nodes.reserve_exact(1);
        }
        nodes.push(Node::Entry(Entry {
            value: first,
            prev: FIRST_NODE,
            next: FIRST_NODE,
        }));
        Self {
            nodes,
            cursor: FIRST_NODE,
            anchor: FIRST_NODE,
            free: None,
            len: 1,
        }
    }

    /// Returns the number of values in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of nodes the ring can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns `true` if the ring holds no values, which never happens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the value under the cursor.
    #[must_use]
    pub fn cursor(&self) -> &T {
        &self.entry(self.cursor).value
    }

    /// Returns the position of the node under the cursor.
    ///
    /// Two positions are equal if and only if they refer to the same node,
    /// even when distinct nodes hold equal values.
    #[must_use]
    pub fn cursor_index(&self) -> NodeIndex {
        self.cursor
    }

    /// Moves the cursor to its clockwise neighbor.
    pub fn step_clockwise(&mut self) {
        self.cursor = self.entry(self.cursor).next;
    }

    /// Moves the cursor to its counterclockwise neighbor.
    pub fn step_counter_clockwise(&mut self) {
        self.cursor = self.entry(self.cursor).prev;
    }

    /// Inserts a value between the first and second clockwise neighbors of
    /// the cursor, and moves the cursor to the new node.
    ///
    /// This is [`Self::insert_with_offset`] with an offset of
    /// [`INSERT_OFFSET`].
    pub fn insert(&mut self, value: T) {
        self.insert_with_offset(INSERT_OFFSET, value);
    }

    /// Moves the cursor `steps` times clockwise, places a new node holding
    /// `value` immediately before the node reached this way, and moves the
    /// cursor to the new node.
    ///
    /// With `steps == 0` the new node becomes the counterclockwise neighbor
    /// of the original cursor.
    pub fn insert_with_offset(&mut self, steps: usize, value: T) {
        // Walking `len` steps in either direction is a full turn.
        for _ in 0..steps % self.len {
            self.step_clockwise();
        }
        let next_ix = self.cursor;
        let prev_ix = self.entry(next_ix).prev;
        let ix = self.allocate(Entry {
            value,
            prev: prev_ix,
            next: next_ix,
        });
        // If the ring had a single node, `prev_ix == next_ix` and both links
        // of that node now point to the new one.
        self.entry_mut(prev_ix).next = ix;
        self.entry_mut(next_ix).prev = ix;
        self.cursor = ix;
        self.len += 1;
    }

    /// Removes the value seven nodes counterclockwise from the cursor, and
    /// moves the cursor to the clockwise neighbor of the removed node.
    ///
    /// This is [`Self::remove_with_offset`] with an offset of
    /// [`REMOVE_OFFSET`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] and leaves the ring untouched if the
    /// ring has a single node.
    pub fn remove(&mut self) -> Result<T, Error> {
        self.remove_with_offset(REMOVE_OFFSET)
    }

    /// Moves the cursor `steps` times counterclockwise, unlinks the node
    /// reached this way, and moves the cursor to the clockwise neighbor of
    /// that node. Returns the value of the removed node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Underflow`] and leaves the ring untouched, cursor
    /// included, if the ring has a single node.
    pub fn remove_with_offset(&mut self, steps: usize) -> Result<T, Error> {
        if self.len < 2 {
            return Err(Error::Underflow { len: self.len });
        }
        for _ in 0..steps % self.len {
            self.step_counter_clockwise();
        }
        let ix = self.cursor;
        let (prev_ix, next_ix) = {
            let entry = self.entry(ix);
            (entry.prev, entry.next)
        };
        self.entry_mut(prev_ix).next = next_ix;
        self.entry_mut(next_ix).prev = prev_ix;
        self.cursor = next_ix;
        if self.anchor == ix {
            self.anchor = next_ix;
        }
        self.len -= 1;
        // Push the slot onto the free list.
        let node = mem::replace(
            &mut self.nodes[ix.get()],
            Node::Vacant {
                next_free: self.free,
            },
        );
        self.free = Some(ix);
        match node {
            Node::Entry(entry) => Ok(entry.value),
            Node::Vacant { .. } => unreachable!("cursor should refer to a live node"),
        }
    }

    /// Returns an iterator over the values of the ring in clockwise order,
    /// starting at the oldest node that is still alive.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            next: self.anchor,
            remaining: self.len,
        }
    }

    /// Returns an iterator over the values of the ring in clockwise order,
    /// starting at the cursor.
    pub fn iter_from_cursor(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            next: self.cursor,
            remaining: self.len,
        }
    }

    /// Stores `entry` in a vacant slot, or at the end of the arena if there
    /// are none, and returns its position.
    fn allocate(&mut self, entry: Entry<T>) -> NodeIndex {
        if let Some(ix) = self.free {
            let slot = &mut self.nodes[ix.get()];
            if let Node::Vacant { next_free } = *slot {
                self.free = next_free;
            } else {
                panic!("free list should only hold vacant slots, found {ix:?}");
            }
            *slot = Node::Entry(entry);
            ix
        } else {
            self.nodes.push(Node::Entry(entry));
            NodeIndex::new(self.nodes.len() - 1)
        }
    }

    // Accessor methods.

    /// Returns a reference to the live node at the given position.
    ///
    /// # Panics
    ///
    /// This function panics if the index is out of bounds, or if the slot
    /// referenced is [vacant](`Node::Vacant`).
    fn entry(&self, ix: NodeIndex) -> &Entry<T> {
        if let Node::Entry(entry) = &self.nodes[ix.get()] {
            entry
        } else {
            panic!("node at index {ix:?} is not part of the ring")
        }
    }

    /// Returns a mutable reference to the live node at the given position.
    ///
    /// # Panics
    ///
    /// This function panics if the index is out of bounds, or if the slot
    /// referenced is [vacant](`Node::Vacant`).
    fn entry_mut(&mut self, ix: NodeIndex) -> &mut Entry<T> {
        if let Node::Entry(entry) = &mut self.nodes[ix.get()] {
            entry
        } else {
            panic!("node at index {ix:?} is not part of the ring")
        }
    }
}

impl<'r, T> IntoIterator for &'r Ring<T> {
    type Item = &'r T;
    type IntoIter = Iter<'r, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lists the values clockwise from the oldest live node, separated by
/// spaces, with the value under the cursor in parentheses.
impl<T: fmt::Display> fmt::Display for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ix = self.anchor;
        for pos in 0..self.len {
            if pos > 0 {
                f.write_str(" ")?;
            }
            let entry = self.entry(ix);
            if ix == self.cursor {
                write!(f, "({})", entry.value)?;
            } else {
                write!(f, "{}", entry.value)?;
            }
            ix = entry.next;
        }
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("values", &self.iter().collect::<Vec<_>>())
            .field("cursor", self.cursor())
            .finish()
    }
}

/// An iterator over the values of a [`Ring`], in clockwise order.
///
/// This structure is created by [`Ring::iter`] and [`Ring::iter_from_cursor`].
pub struct Iter<'r, T> {
    ring: &'r Ring<T>,
    next: NodeIndex,
    remaining: usize,
}

impl<'r, T> Iterator for Iter<'r, T> {
    type Item = &'r T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let entry = self.ring.entry(self.next);
        self.next = entry.next;
        Some(&entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
