//! Rolling sum over precomputed window bounds

use super::WindowBounds;
use crate::series::Series;

/// Sum `values` over each window in `bounds`.
///
/// Windows are clipped to `[0, values.len())`. Null values contribute 0; a
/// window that is empty or lies wholly outside the table sums to null.
pub fn rolling_sum(values: &Series, bounds: &WindowBounds) -> Series {
    let len = values.len() as i64;

    (0..bounds.len())
        .map(|row| {
            let (start, end) = bounds.window(row)?;
            let start = start.clamp(0, len) as usize;
            let end = end.clamp(0, len) as usize;
            if start >= end {
                return None;
            }

            Some(values.values()[start..end].iter().flatten().sum::<f64>())
        })
        .collect()
}
