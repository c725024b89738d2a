//! Form surface abstraction: named text fields plus file inputs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use pretcad_common::Result;

/// Where a selected file's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Disk(PathBuf),
    Memory(String),
}

/// A file chosen in a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Name as the user sees it (no directory).
    pub name: String,
    pub source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, source: FileSource::Disk(path) }
    }

    pub fn in_memory(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), source: FileSource::Memory(text.into()) }
    }

    /// Full text content. Invalid UTF-8 is replaced rather than rejected.
    pub async fn read_text(&self) -> Result<String> {
        match &self.source {
            FileSource::Disk(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            FileSource::Memory(text) => Ok(text.clone()),
        }
    }
}

/// Named form fields. Implementations use interior mutability; the bridge
/// only ever holds a shared reference.
pub trait FormSurface: Send + Sync {
    /// Current raw value, `None` when the surface has no such field.
    fn field(&self, name: &str) -> Option<String>;

    /// Write a field. Status regions are written through here too.
    fn set_field(&self, name: &str, value: &str);

    /// The single file selected in a file input, if any.
    fn selected_file(&self, name: &str) -> Option<SelectedFile>;

    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// In-memory form used by the CLI and tests.
#[derive(Debug, Default)]
pub struct MemoryForm {
    fields: RwLock<HashMap<String, String>>,
    files: RwLock<HashMap<String, SelectedFile>>,
}

impl MemoryForm {
    pub fn new() -> Self { Self::default() }

    /// Form with the given fields already present.
    pub fn with_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { fields: RwLock::new(map), files: RwLock::default() }
    }

    pub fn select_file(&self, input: &str, file: SelectedFile) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(input.to_string(), file);
    }

    /// Copy of all field values.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.fields.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl FormSurface for MemoryForm {
    fn field(&self, name: &str) -> Option<String> {
        self.fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set_field(&self, name: &str, value: &str) {
        self.fields
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value.to_string());
    }

    fn selected_file(&self, name: &str) -> Option<SelectedFile> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}
