//! Column and sort data model
//!
//! Plain value types handed to the transition engine. Nothing here
//! owns session state; callers keep snapshots and replace them.

pub mod column;
pub mod sort;

pub use column::{Column, ColumnSet, ColumnType};
pub use sort::{SortDirection, SortEntry, SortOrder, SortSpec};
