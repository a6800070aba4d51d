//! Forward-looking window bounds and rolling sums
//!
//! Commutation columns are running totals from the current row to the end of
//! the table ([`SliceToEnd`]). [`SliceN`] reads the window length per row from
//! another column, such as a remaining-term countdown. Indexers produce
//! half-open `[start, end)` bounds per row which [`rolling_sum`] reduces.

mod bounds;
mod rolling;

pub use bounds::{SliceN, SliceToEnd, WindowBounds, WindowIndexer};
pub use rolling::rolling_sum;
