use std::path::{Path, PathBuf};

use crate::naming::sanitize_component;

/// Output locations for one vault: notes under `{root}/{section}/`, media
/// under `{root}/Assets/{section}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultLayout {
    root: PathBuf,
    section: String,
}

impl VaultLayout {
    pub fn new(root: impl Into<PathBuf>, section: &str) -> Self {
        Self {
            root: root.into(),
            section: sanitize_component(section),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn section_dir(&self) -> PathBuf {
        self.root.join(&self.section)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("Assets").join(&self.section)
    }

    pub fn note_path(&self, module_name: &str) -> PathBuf {
        self.section_dir()
            .join(format!("{}.md", sanitize_component(module_name)))
    }
}
