//! Compact storage for a sequence of variable-length arrays.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Debug;
use std::ops::Range;

/// A sequence of arrays stored back to back in a single buffer.
///
/// Array `i` occupies `data[offsets[i] .. offsets[i + 1]]`, so `offsets` always holds
/// `len() + 1` entries.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedVec<T> {
    data: Vec<T>,
    offsets: Vec<usize>,
}

impl<T: Debug> Debug for NestedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for NestedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NestedVec<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            offsets: vec![0],
        }
    }

    /// Builds the nested vec from precomputed array lengths and a fill pass.
    ///
    /// `counts[i]` is the length of array `i`. The `fill` closure is handed a callback
    /// `push(i, value)` that appends `value` to array `i`; it must push exactly `counts[i]`
    /// values into every array `i`, in any interleaving.
    ///
    /// # Panics
    ///
    /// Panics if `fill` pushes more values into an array than its count allows, or fewer values
    /// in total than the counts sum to.
    pub fn from_counts<F>(counts: &[usize], fill: F) -> Self
    where
        T: Clone + Default,
        F: FnOnce(&mut dyn FnMut(usize, T)),
    {
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        let mut total = 0;
        offsets.push(total);
        for count in counts {
            total += count;
            offsets.push(total);
        }

        let mut data = vec![T::default(); total];
        let mut cursor: Vec<usize> = offsets[..counts.len()].to_vec();
        let mut written = 0;
        {
            let mut push = |i: usize, value: T| {
                assert!(cursor[i] < offsets[i + 1], "array {} received more values than its count", i);
                data[cursor[i]] = value;
                cursor[i] += 1;
                written += 1;
            };
            fill(&mut push);
        }
        assert_eq!(written, total, "fill pass pushed fewer values than the counts require");

        Self { data, offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of elements across all arrays.
    pub fn total_num_elements(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, index: usize) -> Option<&[T]> {
        let range = self.get_index_range(index)?;
        self.data.get(range)
    }

    fn get_index_range(&self, index: usize) -> Option<Range<usize>> {
        let begin = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(begin..end)
    }

    pub fn iter<'a>(&'a self) -> impl 'a + ExactSizeIterator<Item = &'a [T]> {
        self.offsets
            .windows(2)
            .map(move |window| &self.data[window[0]..window[1]])
    }

    /// Returns an iterator over all elements inside all arrays.
    pub fn iter_array_elements<'a>(&'a self) -> impl 'a + Iterator<Item = &'a T> {
        self.data.iter()
    }
}

impl<T: Clone> NestedVec<T> {
    pub fn push(&mut self, array: &[T]) {
        self.data.extend_from_slice(array);
        self.offsets.push(self.data.len());
    }
}

impl<'a, T: Clone> From<&'a [Vec<T>]> for NestedVec<T> {
    fn from(arrays: &'a [Vec<T>]) -> Self {
        let mut result = Self::new();
        for array in arrays {
            result.push(array);
        }
        result
    }
}
