//! Data models for writing systems and working-list entries.
//!
//! Models are plain data, independent of the store and of the editing logic
//! in the service layer.

pub mod definition;
pub mod list_item;
pub mod role;

// Re-export all model types
pub use definition::{
    LanguageSubtag, WritingSystemDefinition, AUDIO_SCRIPT, AUDIO_VARIANT, IPA_VARIANT,
};
pub use list_item::ListItem;
pub use role::ListRole;
