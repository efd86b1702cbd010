//! Writing-system list curation core.
//!
//! This library maintains an editable working copy of a project's ordered
//! writing-system list for one role (vernacular, analysis, pronunciation),
//! supports insert/reorder/toggle/merge/delete operations under the list's
//! invariants, and reconciles the accumulated edits back into the project
//! store in a single transaction. The store, the tag grammar, and all user
//! interaction are external collaborators injected through traits.

// Module declarations
pub mod hooks;
pub mod models;
pub mod services;
pub mod store;
pub mod tags;
