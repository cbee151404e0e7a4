//! An unbalanced binary search tree keyed by case-insensitive strings.
//!
//! The tree never rebalances, so sorted insertion degrades lookups to a
//! linear walk. There is no removal.

use std::{cmp::Ordering, rc::Rc};

use tracing::debug;

/// A value that can be stored in a [`SearchTree`].
pub trait Keyed {
    /// The string the value is ordered and looked up by.
    fn key(&self) -> &str;
}

impl<T: Keyed + ?Sized> Keyed for Rc<T> {
    fn key(&self) -> &str {
        (**self).key()
    }
}

/// Compares two strings character by character after lowercasing.
#[must_use]
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
}

type Link<T> = Option<Box<Node<T>>>;

/// A binary search tree holding at most one value per key.
#[derive(Debug)]
pub struct SearchTree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Default for SearchTree<T> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<T: Keyed> SearchTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value at the leaf position its key leads to.
    ///
    /// If a value with an equal key (ignoring case) is already present the
    /// tree is unchanged and the new value is dropped. Returns `true` if
    /// the value was stored.
    pub fn insert(&mut self, value: T) -> bool {
        let mut cursor = &mut self.root;
        while let Some(node) = cursor {
            cursor = match compare_ignore_case(value.key(), node.value.key()) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => {
                    debug!(key = value.key(), "duplicate key, not inserted");
                    return false;
                }
            };
        }
        *cursor = Some(Box::new(Node {
            value,
            left: None,
            right: None,
        }));
        self.len += 1;
        true
    }

    /// Looks up the value whose key equals `key`, ignoring case.
    #[must_use]
    pub fn search(&self, key: &str) -> Option<&T> {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            cursor = match compare_ignore_case(key, node.value.key()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }
}

impl<T> SearchTree<T> {
    /// Number of stored values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn height(&self) -> usize {
        fn height<T>(link: Option<&Node<T>>) -> usize {
            link.map_or(0, |node| {
                1 + height(node.left.as_deref()).max(height(node.right.as_deref()))
            })
        }
        height(self.root.as_deref())
    }

    /// Iterates over the values in ascending key order.
    #[must_use]
    pub fn iter(&self) -> InOrder<'_, T> {
        let mut iter = InOrder { stack: Vec::new() };
        iter.descend_left(self.root.as_deref());
        iter
    }
}

impl<T> Drop for SearchTree<T> {
    fn drop(&mut self) {
        // unlink iteratively so a degenerate tree cannot overflow the stack
        let mut pending: Vec<Box<Node<T>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

/// In-order iterator over a [`SearchTree`].
#[derive(Debug)]
pub struct InOrder<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> InOrder<'a, T> {
    fn descend_left(&mut self, mut link: Option<&'a Node<T>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_deref());
        Some(&node.value)
    }
}

impl<'a, T> IntoIterator for &'a SearchTree<T> {
    type Item = &'a T;
    type IntoIter = InOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
