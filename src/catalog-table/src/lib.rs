//! Plain-text table rendering for uniform record sequences.
//!
//! This crate provides:
//! - [`Value`]: primitive cell values with one canonical string conversion
//! - [`TableRow`] / [`Field`]: an explicit, ordered field-accessor list per record kind
//! - [`Record`]: dynamically shaped records for callers without a static schema
//! - [`Table`]: computed columns, widths and the aligned output lines
//!
//! ```text
//! | Id | Name | Price |
//! |----|------|-------|
//! | 1  | A    | 9.99  |
//! | 2  | Bob  | 19.5  |
//! ```

pub mod error;
pub mod record;
pub mod render;
pub mod table;
pub mod value;

pub use error::{TableError, TableResult};
pub use record::Record;
pub use render::{Field, TableRow, layout, render, render_records};
pub use table::{Column, Table, parse_header};
pub use value::Value;

/// Media type served by the table formatter.
pub const TABLE_MEDIA_TYPE: &str = "text/primitives-table";
