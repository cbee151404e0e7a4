//! A growable, shrinkable array with a hand-managed buffer.
//!
//! Capacity doubles when a push finds the buffer full, and halves when a
//! removal leaves the array exactly a quarter full. Capacity never drops
//! below [`MIN_CAPACITY`].

use thiserror::Error;
use tracing::debug;

/// The capacity of a freshly created array, and the floor for shrinking.
pub const MIN_CAPACITY: usize = 5;

/// Returned when an index falls outside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} is out of range for an array of length {len}")]
pub struct IndexOutOfRange {
    /// The requested index.
    pub index: usize,
    /// The length of the array at the time of the request.
    pub len: usize,
}

/// An insertion-ordered sequence of values.
///
/// Slots `[0, len)` are always occupied and slots `[len, capacity)` are
/// always empty.
#[derive(Debug, Clone)]
pub struct ResizableArray<T> {
    slots: Box<[Option<T>]>,
    len: usize,
}

impl<T> Default for ResizableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResizableArray<T> {
    /// Creates an empty array with [`MIN_CAPACITY`] slots.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: empty_slots(MIN_CAPACITY),
            len: 0,
        }
    }

    /// Number of stored values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots currently allocated.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Appends a value at the end, doubling capacity first if the buffer is
    /// full.
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity() {
            self.resize(self.capacity() * 2);
        }
        self.slots[self.len] = Some(value);
        self.len += 1;
    }

    /// Returns the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        self.slots[..self.len]
            .get(index)
            .and_then(Option::as_ref)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Removes and returns the value at `index`, shifting every later value
    /// one slot to the left.
    ///
    /// If the array is left non-empty and exactly a quarter full, capacity
    /// is halved (but never below [`MIN_CAPACITY`]).
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= len`. The array is left
    /// untouched.
    pub fn remove_at(&mut self, index: usize) -> Result<T, IndexOutOfRange> {
        let removed = self.slots[..self.len]
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| self.out_of_range(index))?;

        for i in index..self.len - 1 {
            self.slots[i] = self.slots[i + 1].take();
        }
        // the trailing slot was vacated by the final `take` above
        self.len -= 1;

        if self.len > 0 && self.len == self.capacity() / 4 {
            let target = (self.capacity() / 2).max(MIN_CAPACITY);
            if target < self.capacity() {
                self.resize(target);
            }
        }

        Ok(removed)
    }

    /// Index of the first value matching the predicate.
    pub fn position<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(|value| predicate(value))
    }

    /// Iterates over the stored values in insertion order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots[..self.len],
        }
    }

    const fn out_of_range(&self, index: usize) -> IndexOutOfRange {
        IndexOutOfRange {
            index,
            len: self.len,
        }
    }

    fn resize(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);
        let mut slots = empty_slots(capacity);
        for (new, old) in slots.iter_mut().zip(&mut self.slots[..self.len]) {
            *new = old.take();
        }
        debug!(from = self.capacity(), to = capacity, "resized array");
        self.slots = slots;
    }
}

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

/// Iterator over the values of a [`ResizableArray`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    slots: &'a [Option<T>],
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let (first, rest) = self.slots.split_first()?;
        self.slots = rest;
        first.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a ResizableArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn filled(n: usize) -> ResizableArray<usize> {
        let mut array = ResizableArray::new();
        for i in 0..n {
            array.push(i);
        }
        array
    }

    #[test]
    fn push_keeps_insertion_order() {
        let array = filled(12);
        assert_eq!(array.len(), 12);
        for i in 0..12 {
            assert_eq!(array.get(i), Ok(&i));
        }
        let values: Vec<_> = array.iter().copied().collect();
        assert_eq!(values, (0..12).collect::<Vec<_>>());
    }

    #[test_case(0, 5; "empty")]
    #[test_case(5, 5; "exactly full")]
    #[test_case(6, 10; "first growth")]
    #[test_case(11, 20; "second growth")]
    #[test_case(21, 40; "third growth")]
    fn capacity_doubles_when_full(pushes: usize, capacity: usize) {
        assert_eq!(filled(pushes).capacity(), capacity);
    }

    #[test]
    fn get_out_of_range() {
        let array = filled(3);
        assert_eq!(array.get(3), Err(IndexOutOfRange { index: 3, len: 3 }));
        assert!(ResizableArray::<u8>::new().get(0).is_err());
    }

    #[test]
    fn remove_shifts_left() {
        let mut array = filled(5);
        assert_eq!(array.remove_at(1), Ok(1));
        assert_eq!(array.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3, 4]);
        assert_eq!(array.remove_at(3), Ok(4));
        assert_eq!(array.iter().copied().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn remove_out_of_range_leaves_array_untouched() {
        let mut array = filled(2);
        assert_eq!(
            array.remove_at(2),
            Err(IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), MIN_CAPACITY);
    }

    #[test]
    fn shrinks_at_quarter_capacity() {
        let mut array = filled(11);
        assert_eq!(array.capacity(), 20);

        // 20 / 4 = 5, so going from 6 to 5 elements halves capacity
        while array.len() > 6 {
            array.remove_at(0).unwrap();
        }
        assert_eq!(array.capacity(), 20);
        array.remove_at(0).unwrap();
        assert_eq!(array.len(), 5);
        assert_eq!(array.capacity(), 10);

        // 10 / 4 = 2
        array.remove_at(0).unwrap();
        array.remove_at(0).unwrap();
        assert_eq!(array.capacity(), 10);
        array.remove_at(0).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.capacity(), MIN_CAPACITY);

        assert_eq!(array.iter().copied().collect::<Vec<_>>(), vec![9, 10]);
    }

    #[test]
    fn never_shrinks_below_minimum() {
        let mut array = filled(5);
        while !array.is_empty() {
            array.remove_at(0).unwrap();
            assert_eq!(array.capacity(), MIN_CAPACITY);
        }
    }

    #[test]
    fn position_finds_first_match() {
        let array = filled(6);
        assert_eq!(array.position(|v| *v > 3), Some(4));
        assert_eq!(array.position(|v| *v > 10), None);
    }
}
