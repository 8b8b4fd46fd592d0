//! A `std::vec::Vec`, but 1-indexed instead of 0-indexed.

/// Like a `std::vec::Vec`, but 1-indexed instead of 0-indexed. Index 0 is never occupied.
#[derive(Debug, Clone, PartialEq)]
pub struct OneIndexedVec<T> {
    vec: Vec<T>,
}

impl<T> OneIndexedVec<T> {
    /// Returns the element at the given index, or None if the index is 0 or out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index == 0 {
            return None;
        }
        self.vec.get(index - 1)
    }

    /// Returns the number of elements in the vector.
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    /// Returns true if the vector has a length of 0.
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Returns an iterator over the elements paired with their 1-based index.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &T)> {
        self.vec.iter().enumerate().map(|(i, value)| (i + 1, value))
    }
}

impl<T> From<Vec<T>> for OneIndexedVec<T> {
    fn from(vec: Vec<T>) -> Self {
        OneIndexedVec { vec }
    }
}
