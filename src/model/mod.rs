//! Row model for the forum list screen.
//!
//! The forum list is one flat ordered sequence of rows: an optional favorites
//! section (headed "Favorites"), followed by one section per forum group
//! (headed when the group has a name). The list is recomputed wholesale on
//! every data change and diffed against its predecessor.
//!
//! # Module Structure
//!
//! - `row` - Row variants, diff identity, per-row display data
//! - `delta` - Ordered-sequence differ (deletions / insertions / moves)
//! - `tree` - Forum hierarchy: ancestor walks and collapse visibility
//! - `builder` - Merges favorites and grouped forums into the row list

mod builder;
mod delta;
mod row;
mod tree;

pub use builder::{build_rows, RowModel, RowModelBuilder};
pub use delta::{diff, RowDelta};
pub use row::{ForumCard, Row, RowId};
pub use tree::ForumTree;
