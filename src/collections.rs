//! Hand-built containers backing the catalog.
//!
//! None of these wrap a standard library collection. Each one owns its
//! storage directly so that growth, shrinking and node ownership are
//! explicit.

mod array;
mod queue;
mod search_tree;
mod stack;

pub use array::{IndexOutOfRange, Iter as ArrayIter, MIN_CAPACITY, ResizableArray};
pub use queue::LinkedQueue;
pub use search_tree::{InOrder, Keyed, SearchTree, compare_ignore_case};
pub use stack::LinkedStack;
