//! Graphics error types.

use std::fmt;

use lumen_core::obj::ObjError;

/// Errors that can occur in the graphics system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// Failed to create a resource.
    ResourceCreationFailed(String),
    /// An invalid parameter was provided.
    InvalidParameter(String),
    /// A buffer was requested with size 0.
    ZeroSizedBuffer {
        /// Debug label of the requested buffer.
        label: Option<String>,
    },
    /// A partial buffer update would write past the end of the buffer.
    BufferOverflow {
        /// Write offset in bytes.
        offset: u64,
        /// Bytes to write.
        len: u64,
        /// Buffer size in bytes.
        size: u64,
    },
    /// Every slot for this kind of light is taken.
    LightLimitReached {
        /// Light kind (`"directional"`, `"point"`, `"spot"`).
        kind: &'static str,
        /// Slot count for the kind.
        max: usize,
    },
    /// A light index outside the slot range.
    InvalidLightIndex {
        /// Light kind (`"directional"`, `"point"`, `"spot"`).
        kind: &'static str,
        /// The rejected index.
        index: usize,
        /// Slot count for the kind.
        max: usize,
    },
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceCreationFailed(msg) => write!(f, "resource creation failed: {msg}"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::ZeroSizedBuffer { label: Some(label) } => {
                write!(f, "attempted creating buffer '{label}' with size 0")
            }
            Self::ZeroSizedBuffer { label: None } => {
                write!(f, "attempted creating buffer with size 0")
            }
            Self::BufferOverflow { offset, len, size } => write!(
                f,
                "buffer write of {len} bytes at offset {offset} overflows buffer of {size} bytes"
            ),
            Self::LightLimitReached { kind, max } => write!(
                f,
                "cannot add a {kind} light, the maximum of {max} has been reached"
            ),
            Self::InvalidLightIndex { kind, index, max } => write!(
                f,
                "invalid {kind} light index {index}, must be in the range 0-{}",
                max.saturating_sub(1)
            ),
        }
    }
}

impl std::error::Error for GraphicsError {}

/// Errors from loading a mesh asset onto the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The OBJ file could not be parsed or turned into a mesh.
    Obj(ObjError),
    /// GPU resources for the mesh could not be created.
    Graphics(GraphicsError),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Obj(e) => write!(f, "{e}"),
            Self::Graphics(e) => write!(f, "GPU upload failed: {e}"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Obj(e) => Some(e),
            Self::Graphics(e) => Some(e),
        }
    }
}

impl From<ObjError> for AssetError {
    fn from(e: ObjError) -> Self {
        Self::Obj(e)
    }
}

impl From<GraphicsError> for AssetError {
    fn from(e: GraphicsError) -> Self {
        Self::Graphics(e)
    }
}
