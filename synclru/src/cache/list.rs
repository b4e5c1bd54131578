//! Recency list
//!
//! Doubly-linked list of cache nodes kept in a slot arena. Nodes are addressed
//! by generation-checked [`NodeRef`] handles instead of pointers, so a handle
//! to a removed node never resolves to whatever reuses its slot.
//!
//! ```text
//!   front ──► [A] ◄──► [B] ◄──► [C] ◄── back
//!             MRU                LRU
//! ```

/// Stable handle to a node in a [`RecencyList`]
///
/// Stays valid across `move_to_front`; invalidated by `remove` and `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    slot: usize,
    generation: u64,
}

/// List node
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Arena slot. `generation` is bumped every time the slot is vacated.
struct Slot<K, V> {
    generation: u64,
    node: Option<Node<K, V>>,
}

/// Recency-ordered list, most recently touched at the front
pub struct RecencyList<K, V> {
    slots: Vec<Slot<K, V>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of linked nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Most recently touched node
    pub fn front(&self) -> Option<NodeRef> {
        self.head.map(|slot| self.handle(slot))
    }

    /// Least recently touched node (the eviction candidate)
    pub fn back(&self) -> Option<NodeRef> {
        self.tail.map(|slot| self.handle(slot))
    }

    /// Link a new node at the front
    pub fn push_front(&mut self, key: K, value: V) -> NodeRef {
        let slot = self.allocate(key, value);
        self.link_front(slot);
        self.len += 1;
        self.handle(slot)
    }

    /// Link a new node at the back
    pub fn push_back(&mut self, key: K, value: V) -> NodeRef {
        let slot = self.allocate(key, value);
        self.link_back(slot);
        self.len += 1;
        self.handle(slot)
    }

    /// Relink `node` as the front, keeping its handle.
    ///
    /// Returns `false` if the handle is stale.
    pub fn move_to_front(&mut self, node: NodeRef) -> bool {
        if !self.is_live(node) {
            return false;
        }
        if self.head == Some(node.slot) {
            return true;
        }

        self.unlink(node.slot);
        self.link_front(node.slot);
        true
    }

    /// Unlink `node` and hand back its key and value.
    ///
    /// Returns `None` if the handle is stale.
    pub fn remove(&mut self, node: NodeRef) -> Option<(K, V)> {
        if !self.is_live(node) {
            return None;
        }

        self.unlink(node.slot);
        let entry = &mut self.slots[node.slot];
        entry.generation = entry.generation.wrapping_add(1);
        let removed = entry.node.take()?;
        self.free_list.push(node.slot);
        self.len -= 1;
        Some((removed.key, removed.value))
    }

    /// Key and value behind a live handle
    pub fn get(&self, node: NodeRef) -> Option<(&K, &V)> {
        self.node(node).map(|n| (&n.key, &n.value))
    }

    /// Mutable value behind a live handle
    pub fn get_mut(&mut self, node: NodeRef) -> Option<&mut V> {
        let slot = self.slots.get_mut(node.slot)?;
        if slot.generation != node.generation {
            return None;
        }
        slot.node.as_mut().map(|n| &mut n.value)
    }

    /// Whether `node` refers to a node currently linked in this list
    pub fn is_live(&self, node: NodeRef) -> bool {
        self.node(node).is_some()
    }

    /// Iterate front (MRU) to back (LRU)
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Drop every node. All outstanding handles become stale.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free_list.push(index);
        }
        // Hand out low slots first after a clear.
        self.free_list.reverse();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Walk the list in both directions and check links and length agree.
    pub(crate) fn check_links(&self) -> bool {
        let mut forward = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let Some(node) = self.slots.get(slot).and_then(|s| s.node.as_ref()) else {
                return false;
            };
            if node.prev != prev {
                return false;
            }
            forward += 1;
            if forward > self.len {
                return false;
            }
            prev = Some(slot);
            cursor = node.next;
        }
        if prev != self.tail {
            return false;
        }

        let mut backward = 0;
        let mut cursor = self.tail;
        while let Some(slot) = cursor {
            let Some(node) = self.slots.get(slot).and_then(|s| s.node.as_ref()) else {
                return false;
            };
            backward += 1;
            if backward > self.len {
                return false;
            }
            cursor = node.prev;
        }

        let occupied = self.slots.iter().filter(|s| s.node.is_some()).count();
        forward == self.len && backward == self.len && occupied == self.len
    }

    #[inline]
    fn handle(&self, slot: usize) -> NodeRef {
        NodeRef {
            slot,
            generation: self.slots[slot].generation,
        }
    }

    fn node(&self, node: NodeRef) -> Option<&Node<K, V>> {
        let slot = self.slots.get(node.slot)?;
        if slot.generation != node.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Place a fresh unlinked node in a free slot
    fn allocate(&mut self, key: K, value: V) -> usize {
        let node = Node {
            key,
            value,
            prev: None,
            next: None,
        };

        if let Some(index) = self.free_list.pop() {
            self.slots[index].node = Some(node);
            index
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            index
        }
    }

    fn link_front(&mut self, index: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[index].node.as_mut() {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head) => {
                if let Some(node) = self.slots[head].node.as_mut() {
                    node.prev = Some(index);
                }
            }
            None => self.tail = Some(index),
        }

        self.head = Some(index);
    }

    fn link_back(&mut self, index: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.slots[index].node.as_mut() {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(tail) => {
                if let Some(node) = self.slots[tail].node.as_mut() {
                    node.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }

        self.tail = Some(index);
    }

    /// Close the gap around `index` and clear its own links
    fn unlink(&mut self, index: usize) {
        let (prev, next) = match self.slots[index].node.as_mut() {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(prev_index) => {
                if let Some(node) = self.slots[prev_index].node.as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next_index) => {
                if let Some(node) = self.slots[next_index].node.as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over `(key, value)` pairs
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list;
        let index = self.cursor?;
        let node = list.slots[index].node.as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
