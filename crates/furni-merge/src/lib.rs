//! Record-merge engine for the furnidata catalog.
//!
//! Reconciles schema defaults, stored item state, and caller-supplied fields
//! into complete item records. Everything here is synchronous and in-memory;
//! persisting the resulting document is the caller's job.
//!
//! - [`overlay`] -- ordered last-write-wins fold over partial records
//! - [`CatalogMerger::merge_update`] -- update one existing item by id
//! - [`CatalogMerger::merge_add`] -- append a new item with a generated id
//! - [`IdGenerator`] -- strictly increasing millisecond ids

pub mod error;
pub mod id;
pub mod merger;
pub mod overlay;

pub use error::{MergeError, MergeResult};
pub use id::IdGenerator;
pub use merger::CatalogMerger;
pub use overlay::overlay;
