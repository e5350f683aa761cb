//! Core merge engine.
//!
//! Pure, single-threaded and I/O free. Callers hand in already-open message
//! streams and get back merged messages and per-topic entry collections.
//!
//! ## Pipeline
//!
//! ```text
//! streams (priority order) -> merge -> assemble (collapse per topic) -> Catalogs
//! ```
//!
//! ## Module Structure
//!
//! - `data`: Message, Entry and Occurrence types
//! - `resolve`: EntityResolver trait and the KindRegistry implementation
//! - `sort_key`: Sort and group keys, ordering helpers
//! - `merge`: K-way prioritized stream merger
//! - `collapse`: Number-placeholder collapsing
//! - `assemble`: Routing entries into per-topic collections

pub mod assemble;
pub mod collapse;
pub mod data;
pub mod merge;
pub mod resolve;
pub mod sort_key;

pub use assemble::{CatalogAssembler, Catalogs, TopicKey, assemble, topic_for};
pub use collapse::{Collapser, EntryBuilder, NUMBER_PLACEHOLDER, collapse, normalize_numbers};
pub use data::{Entry, Message, Occurrence, Origin};
pub use merge::{MergeOutput, MessageStream, StreamMerger, merge_streams};
pub use resolve::{EntityResolver, KindDef, KindRegistry};
pub use sort_key::{SortKey, compare_messages, sort_key, sort_messages};
