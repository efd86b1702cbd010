//! Service layer for business logic.
//!
//! This module contains the editing model for one role's writing-system
//! list and the engine that reconciles its edits with the project store.

pub mod reconcile;
pub mod working_list;

// Re-export commonly used types
pub use reconcile::Reconciler;
pub use working_list::{MergeRequest, WorkingListModel, DEFAULT_WS_TAG};
