//! Clipper core: pure job configuration, selectors, and vault layout.
mod job;
mod layout;
mod naming;
mod selector;

pub use job::{ClipJob, ModuleNaming, Source};
pub use layout::VaultLayout;
pub use naming::sanitize_component;
pub use selector::{NotesSelector, SelectorKindError, TargetSelector};
