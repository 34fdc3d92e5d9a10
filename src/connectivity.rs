use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-width table of node indices, one row per cell.
///
/// Rows are stored contiguously in a single buffer. A table always has a row width of at least one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "UncheckedConnectivityTable")]
pub struct ConnectivityTable {
    width: usize,
    indices: Vec<usize>,
}

#[derive(Deserialize)]
struct UncheckedConnectivityTable {
    width: usize,
    indices: Vec<usize>,
}

impl TryFrom<UncheckedConnectivityTable> for ConnectivityTable {
    type Error = ConversionError;

    fn try_from(table: UncheckedConnectivityTable) -> Result<Self, Self::Error> {
        let UncheckedConnectivityTable { width, indices } = table;
        let len = indices.len();
        Self::from_flat(width, indices).ok_or_else(|| {
            ConversionError::InvalidMesh(format!(
                "connectivity of {} indices cannot be split into rows of width {}",
                len, width
            ))
        })
    }
}

impl fmt::Debug for ConnectivityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl ConnectivityTable {
    /// Creates an empty table whose rows have the given width.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    pub fn new(width: usize) -> Self {
        Self::with_capacity(width, 0)
    }

    /// Creates an empty table with room for `num_rows` rows.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero.
    pub fn with_capacity(width: usize, num_rows: usize) -> Self {
        assert!(width > 0, "Row width must be positive");
        Self {
            width,
            indices: Vec::with_capacity(width * num_rows),
        }
    }

    /// Creates a table from a flat row-major index buffer.
    ///
    /// Returns `None` if `width` is zero or the buffer length is not a multiple of `width`.
    pub fn from_flat(width: usize, indices: Vec<usize>) -> Option<Self> {
        (width > 0 && indices.len() % width == 0).then(|| Self { width, indices })
    }

    /// Creates a table from a list of rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all have length `width`.
    pub fn from_rows<R: AsRef<[usize]>>(width: usize, rows: impl IntoIterator<Item = R>) -> Self {
        let mut table = Self::new(width);
        for row in rows {
            table.push_row(row.as_ref());
        }
        table
    }

    /// Appends a row.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not have the width of the table.
    pub fn push_row(&mut self, row: &[usize]) {
        assert_eq!(row.len(), self.width, "Row length must match table width");
        self.indices.extend_from_slice(row);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.indices.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[usize]> {
        let begin = index.checked_mul(self.width)?;
        let end = begin.checked_add(self.width)?;
        self.indices.get(begin..end)
    }

    pub fn rows(&self) -> impl '_ + ExactSizeIterator<Item = &[usize]> {
        self.indices.chunks_exact(self.width)
    }

    /// All indices in row-major order.
    pub fn as_flat(&self) -> &[usize] {
        &self.indices
    }

    /// Largest index referenced by any row.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().copied().max()
    }
}
