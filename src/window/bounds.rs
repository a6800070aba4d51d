//! Per-row window bounds

use crate::series::Series;

/// Half-open `[start[i], end[i])` windows, one per row.
///
/// Bounds are signed and unclipped; an offset can push them before the first
/// row or past the last. Consumers clip to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: Vec<i64>,
    pub end: Vec<i64>,
}

impl WindowBounds {
    pub fn len(&self) -> usize {
        self.start.len()
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    /// Bounds for `row`, or `None` past the last row
    pub fn window(&self, row: usize) -> Option<(i64, i64)> {
        Some((*self.start.get(row)?, *self.end.get(row)?))
    }
}

/// Produces window bounds for a column of `num_values` rows
pub trait WindowIndexer {
    fn window_bounds(&self, num_values: usize) -> WindowBounds;
}

/// Window from the current row to the end of the table: `[i, N)`
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceToEnd;

impl WindowIndexer for SliceToEnd {
    fn window_bounds(&self, num_values: usize) -> WindowBounds {
        WindowBounds {
            start: (0..num_values as i64).collect(),
            end: vec![num_values as i64; num_values],
        }
    }
}

/// Window of `lengths[i]` rows starting `offset` rows after the current row.
///
/// A null length gives an empty window `[i + offset, i + offset)`. Fractional
/// lengths are truncated towards zero.
#[derive(Debug, Clone)]
pub struct SliceN {
    lengths: Series,
    offset: i64,
}

impl SliceN {
    pub fn new(lengths: Series) -> Self {
        Self { lengths, offset: 0 }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl WindowIndexer for SliceN {
    fn window_bounds(&self, num_values: usize) -> WindowBounds {
        let mut start = Vec::with_capacity(num_values);
        let mut end = Vec::with_capacity(num_values);

        for row in 0..num_values {
            let first = row as i64 + self.offset;
            start.push(first);
            match self.lengths.get(row) {
                Some(n) => end.push(first + n as i64),
                None => end.push(first),
            }
        }

        WindowBounds { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_to_end_bounds() {
        let bounds = SliceToEnd.window_bounds(5);

        assert_eq!(bounds.start, vec![0, 1, 2, 3, 4]);
        assert_eq!(bounds.end, vec![5; 5]);
        // Row 2 covers rows 2, 3 and 4
        assert_eq!(bounds.window(2), Some((2, 5)));
        assert_eq!(bounds.window(5), None);
    }

    #[test]
    fn test_slice_n_bounds_with_null_length() {
        let lengths = Series::new(vec![Some(3.0), Some(2.0), None, Some(1.0), Some(0.0)]);
        let bounds = SliceN::new(lengths).window_bounds(5);

        assert_eq!(bounds.window(0), Some((0, 3)));
        assert_eq!(bounds.window(1), Some((1, 3)));
        assert_eq!(bounds.window(2), Some((2, 2)));
        assert_eq!(bounds.window(3), Some((3, 4)));
        assert_eq!(bounds.window(4), Some((4, 4)));
    }

    #[test]
    fn test_slice_n_offset() {
        let lengths = Series::full(3, 2.0);
        let bounds = SliceN::new(lengths).with_offset(1).window_bounds(3);

        assert_eq!(bounds.start, vec![1, 2, 3]);
        assert_eq!(bounds.end, vec![3, 4, 5]);
    }
}
