//! Core data types shared by the merger, collapser and catalog I/O.
//!
//! ## Module Structure
//!
//! - `message`: Message and Origin (one candidate text from one source)
//! - `entry`: Entry and Occurrence (the collapsed output unit)

pub mod entry;
pub mod message;

pub use entry::{Entry, Occurrence};
pub use message::{Message, Origin, format_context, split_context};
