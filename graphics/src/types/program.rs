//! Shader program descriptors.

use std::path::PathBuf;

/// Pipeline stage of a shader source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// A shader stage and the file its source is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub path: PathBuf,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, path: impl Into<PathBuf>) -> Self {
        Self {
            stage,
            path: path.into(),
        }
    }
}

/// Descriptor for linking a shader program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ProgramDescriptor {
    /// Debug label for the program.
    pub label: Option<String>,
    /// Stages linked into the program.
    pub sources: Vec<ShaderSource>,
}

impl ProgramDescriptor {
    /// A vertex + fragment program.
    pub fn new(vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        Self {
            label: None,
            sources: vec![
                ShaderSource::new(ShaderStage::Vertex, vertex),
                ShaderSource::new(ShaderStage::Fragment, fragment),
            ],
        }
    }

    /// Set the debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
