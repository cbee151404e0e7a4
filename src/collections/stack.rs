//! A singly-linked LIFO stack.

#[derive(Debug)]
struct Node<T> {
    value: T,
    next: Option<Box<Node<T>>>,
}

/// Last-in, first-out stack. Each node owns the node beneath it.
#[derive(Debug)]
pub struct LinkedStack<T> {
    top: Option<Box<Node<T>>>,
}

impl<T> Default for LinkedStack<T> {
    fn default() -> Self {
        Self { top: None }
    }
}

impl<T> LinkedStack<T> {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `value` the new top.
    pub fn push(&mut self, value: T) {
        let next = self.top.take();
        self.top = Some(Box::new(Node { value, next }));
    }

    /// Removes and returns the top value, or `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<T> {
        let node = self.top.take()?;
        self.top = node.next;
        Some(node.value)
    }

    /// The top value, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.top.as_deref().map(|node| &node.value)
    }

    /// Whether the stack holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Number of values on the stack.
    ///
    /// Walks every node.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.top.as_deref();
        while let Some(node) = cursor {
            count += 1;
            cursor = node.next.as_deref();
        }
        count
    }
}

impl<T> Drop for LinkedStack<T> {
    fn drop(&mut self) {
        let mut cursor = self.top.take();
        while let Some(mut node) = cursor {
            cursor = node.next.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_push_order() {
        let mut stack = LinkedStack::new();
        for i in 0..4 {
            stack.push(i);
        }
        assert_eq!(stack.len(), 4);
        assert_eq!(stack.peek(), Some(&3));
        let popped: Vec<_> = std::iter::from_fn(|| stack.pop()).collect();
        assert_eq!(popped, vec![3, 2, 1, 0]);
        assert!(stack.is_empty());
    }

    #[test]
    fn empty_stack_pops_none() {
        let mut stack = LinkedStack::<u32>::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.peek(), None);
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn push_after_pop() {
        let mut stack = LinkedStack::new();
        stack.push('a');
        stack.push('b');
        assert_eq!(stack.pop(), Some('b'));
        stack.push('c');
        assert_eq!(stack.pop(), Some('c'));
        assert_eq!(stack.pop(), Some('a'));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn long_stack_drops() {
        let mut stack = LinkedStack::new();
        for i in 0..200_000 {
            stack.push(i);
        }
        assert_eq!(stack.len(), 200_000);
        drop(stack);
    }
}
