//! A singly-linked FIFO queue.
//!
//! Nodes live in a slot arena and link to their successor by slot index,
//! so the queue keeps an O(1) tail without aliasing any node. Freed slots
//! are recycled by later enqueues.

#[derive(Debug)]
struct Node<T> {
    value: T,
    next: Option<usize>,
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(Node<T>),
    Free { next_free: Option<usize> },
}

/// First-in, first-out queue.
#[derive(Debug)]
pub struct LinkedQueue<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
    tail: Option<usize>,
    free: Option<usize>,
    len: usize,
}

impl<T> Default for LinkedQueue<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            free: None,
            len: 0,
        }
    }
}

impl<T> LinkedQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Appends a value at the tail.
    pub fn enqueue(&mut self, value: T) {
        let node = Node { value, next: None };
        let index = self.allocate(node);

        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        self.len += 1;
    }

    /// Removes and returns the value at the head, or `None` if the queue is
    /// empty.
    pub fn dequeue(&mut self) -> Option<T> {
        let index = self.head?;
        let slot = std::mem::replace(
            &mut self.slots[index],
            Slot::Free {
                next_free: self.free,
            },
        );
        self.free = Some(index);

        let Slot::Occupied(node) = slot else {
            unreachable!("head always points at an occupied slot");
        };

        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(node.value)
    }

    /// The value at the head, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        match &self.slots[self.head?] {
            Slot::Occupied(node) => Some(&node.value),
            Slot::Free { .. } => None,
        }
    }

    fn allocate(&mut self, node: Node<T>) -> usize {
        match self.free {
            Some(index) => {
                if let Slot::Free { next_free } = self.slots[index] {
                    self.free = next_free;
                }
                self.slots[index] = Slot::Occupied(node);
                index
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        match &mut self.slots[index] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => unreachable!("linked slots are always occupied"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeues_in_enqueue_order() {
        let mut queue = LinkedQueue::new();
        for i in 0..5 {
            queue.enqueue(i);
        }
        assert_eq!(queue.len(), 5);
        let drained: Vec<_> = std::iter::from_fn(|| queue.dequeue()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn empty_queue_dequeues_none() {
        let mut queue = LinkedQueue::<String>::new();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
        assert_eq!(queue.peek(), None);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn interleaved_operations_stay_fifo() {
        let mut queue = LinkedQueue::new();
        let mut expected = std::collections::VecDeque::new();
        let mut next = 0;

        // a fixed, irregular pattern of enqueue counts and dequeue counts
        for (pushes, pops) in [(3, 1), (1, 2), (4, 0), (0, 3), (2, 5), (1, 1)] {
            for _ in 0..pushes {
                queue.enqueue(next);
                expected.push_back(next);
                next += 1;
            }
            for _ in 0..pops {
                assert_eq!(queue.dequeue(), expected.pop_front());
            }
            assert_eq!(queue.len(), expected.len());
            assert_eq!(queue.peek(), expected.front());
        }
    }

    #[test]
    fn reuses_freed_slots() {
        let mut queue = LinkedQueue::new();
        queue.enqueue("a");
        queue.enqueue("b");
        assert_eq!(queue.dequeue(), Some("a"));
        queue.enqueue("c");
        assert_eq!(queue.slots.len(), 2);
        assert_eq!(queue.dequeue(), Some("b"));
        assert_eq!(queue.dequeue(), Some("c"));
        assert_eq!(queue.dequeue(), None);
        queue.enqueue("d");
        assert_eq!(queue.slots.len(), 2);
        assert_eq!(queue.peek(), Some(&"d"));
    }
}
