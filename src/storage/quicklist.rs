//! QuickList - a chain of listpack nodes backing list values
//!
//! Nodes live in an arena and link to each other by index, so the chain owns
//! every node outright and dropping the list drops the arena. A new node is
//! linked at an edge once the edge node's listpack would grow past the
//! configured byte size.

use bytes::Bytes;

use super::listpack::{Listpack, ListpackValue};

/// Default byte budget for a single node (list-max-listpack-size -2)
pub const DEFAULT_NODE_MAX_BYTES: usize = 8 * 1024;

#[derive(Clone, Debug, Default)]
struct QuickListNode {
    lp: Listpack,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked chain of listpacks with an O(1) element count
#[derive(Clone, Debug)]
pub struct QuickList {
    /// Node arena; freed slots are recycled through `free`
    nodes: Vec<QuickListNode>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    /// Elements across all nodes
    count: usize,
    node_max_bytes: usize,
}

impl Default for QuickList {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_MAX_BYTES)
    }
}

impl QuickList {
    /// Create a list with one empty node
    pub fn new(node_max_bytes: usize) -> Self {
        Self {
            nodes: vec![QuickListNode::default()],
            free: Vec::new(),
            head: 0,
            tail: 0,
            count: 0,
            node_max_bytes: node_max_bytes.max(1),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of linked nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Total listpack bytes across linked nodes
    pub fn size_bytes(&self) -> usize {
        self.node_indices().map(|i| self.nodes[i].lp.size_bytes()).sum()
    }

    fn alloc_node(&mut self, prev: Option<usize>, next: Option<usize>) -> usize {
        let node = QuickListNode {
            lp: Listpack::new(),
            prev,
            next,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// True if `entry_len` more bytes would overflow a non-empty node
    #[inline]
    fn needs_split(&self, idx: usize, entry_len: usize) -> bool {
        let lp = &self.nodes[idx].lp;
        !lp.is_empty() && lp.size_bytes() + entry_len > self.node_max_bytes
    }

    /// Append values at the tail, in order. Returns how many were stored.
    pub fn push_right<T: AsRef<[u8]>>(&mut self, values: &[T]) -> usize {
        let mut added = 0;
        for value in values {
            let Ok(entry_len) = Listpack::entry_size(value.as_ref()) else {
                continue;
            };
            if self.needs_split(self.tail, entry_len) {
                let idx = self.alloc_node(Some(self.tail), None);
                self.nodes[self.tail].next = Some(idx);
                self.tail = idx;
            }
            added += self.nodes[self.tail].lp.push_right(std::slice::from_ref(value));
        }
        self.count += added;
        added
    }

    /// Prepend values so that `values[0]` becomes the head. Returns how many were stored.
    pub fn push_left<T: AsRef<[u8]>>(&mut self, values: &[T]) -> usize {
        let mut added = 0;
        for value in values.iter().rev() {
            let Ok(entry_len) = Listpack::entry_size(value.as_ref()) else {
                continue;
            };
            if self.needs_split(self.head, entry_len) {
                let idx = self.alloc_node(None, Some(self.head));
                self.nodes[self.head].prev = Some(idx);
                self.head = idx;
            }
            added += self.nodes[self.head].lp.push_left(std::slice::from_ref(value));
        }
        self.count += added;
        added
    }

    /// Remove and return the head element
    pub fn pop_left(&mut self) -> Option<Bytes> {
        let value = self.nodes[self.head].lp.pop_left()?;
        self.count -= 1;

        if self.nodes[self.head].lp.is_empty() {
            if let Some(next) = self.nodes[self.head].next {
                self.free.push(self.head);
                self.nodes[next].prev = None;
                self.head = next;
            }
        }
        Some(value)
    }

    /// Remove and return the tail element
    pub fn pop_right(&mut self) -> Option<Bytes> {
        let value = self.nodes[self.tail].lp.pop_right()?;
        self.count -= 1;

        if self.nodes[self.tail].lp.is_empty() {
            if let Some(prev) = self.nodes[self.tail].prev {
                self.free.push(self.tail);
                self.nodes[prev].next = None;
                self.tail = prev;
            }
        }
        Some(value)
    }

    fn node_indices(&self) -> NodeIndices<'_> {
        NodeIndices {
            ql: self,
            next: Some(self.head),
        }
    }

    /// Iterate elements head to tail
    pub fn iter(&self) -> impl Iterator<Item = ListpackValue<'_>> + '_ {
        self.node_indices().flat_map(move |i| self.nodes[i].lp.iter())
    }

    /// Element at `index`; negative indices count from the tail
    pub fn index(&self, index: i64) -> Option<Bytes> {
        let len = self.count as i64;
        let index = if index < 0 { len + index } else { index };
        if index < 0 || index >= len {
            return None;
        }

        let mut remaining = index as usize;
        for i in self.node_indices() {
            let lp = &self.nodes[i].lp;
            if remaining < lp.len() {
                return lp.iter().nth(remaining).map(|v| v.to_bytes());
            }
            remaining -= lp.len();
        }
        None
    }

    /// Elements in the inclusive range `start..=stop`, Redis LRANGE style
    pub fn range(&self, start: i64, stop: i64) -> Vec<Bytes> {
        let len = self.count as i64;
        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
        if start > stop || start >= len {
            return Vec::new();
        }

        self.iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .map(|v| v.to_bytes())
            .collect()
    }
}

struct NodeIndices<'a> {
    ql: &'a QuickList,
    next: Option<usize>,
}

impl Iterator for NodeIndices<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let idx = self.next?;
        self.next = self.ql.nodes[idx].next;
        Some(idx)
    }
}

/// A named list value
#[derive(Clone, Debug)]
pub struct List {
    key: Bytes,
    qlist: QuickList,
}

impl List {
    pub fn new(key: Bytes, node_max_bytes: usize) -> Self {
        Self {
            key,
            qlist: QuickList::new(node_max_bytes),
        }
    }

    #[inline]
    pub fn key(&self) -> &Bytes {
        &self.key
    }

    /// RPUSH: append at the tail, returns the number of values stored
    #[inline]
    pub fn r_push<T: AsRef<[u8]>>(&mut self, values: &[T]) -> usize {
        self.qlist.push_right(values)
    }

    /// Prepend at the head, `values[0]` ends up first
    #[inline]
    pub fn l_push<T: AsRef<[u8]>>(&mut self, values: &[T]) -> usize {
        self.qlist.push_left(values)
    }

    #[inline]
    pub fn l_pop(&mut self) -> Option<Bytes> {
        self.qlist.pop_left()
    }

    #[inline]
    pub fn r_pop(&mut self) -> Option<Bytes> {
        self.qlist.pop_right()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.qlist.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.qlist.is_empty()
    }

    #[inline]
    pub fn index(&self, index: i64) -> Option<Bytes> {
        self.qlist.index(index)
    }

    #[inline]
    pub fn range(&self, start: i64, stop: i64) -> Vec<Bytes> {
        self.qlist.range(start, stop)
    }

    #[inline]
    pub fn quicklist(&self) -> &QuickList {
        &self.qlist
    }
}
