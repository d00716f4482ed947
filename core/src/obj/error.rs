//! Error types for OBJ loading.

use std::path::Path;

/// The file could not be read or is not valid OBJ/MTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    /// A diagnostic with free-form text.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// An I/O failure while reading `path`.
    pub fn io(path: &Path, err: &std::io::Error) -> Self {
        Self::new(format!("failed to read {}: {err}", path.display()))
    }

    /// The diagnostic text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Prefix the diagnostic with the file it came from.
    pub(crate) fn in_file(mut self, path: &Path) -> Self {
        self.message = format!("{}: {}", path.display(), self.message);
        self
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<tobj::LoadError> for ParseError {
    fn from(e: tobj::LoadError) -> Self {
        Self::new(e.to_string())
    }
}

/// The file parsed but cannot be turned into a mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The file declares no vertex positions.
    NoVertices,
    /// The file declares no faces.
    NoFaces,
    /// The file declares no normals; lighting needs them.
    NoNormals,
    /// The file references no material library entries.
    NoMaterials,
    /// A face was declared before any `usemtl`.
    FaceWithoutMaterial {
        /// Name of the shape containing the face.
        shape: String,
        /// Triangle index within the shape.
        face: usize,
    },
    /// A face vertex has no normal index.
    MissingNormalIndex {
        /// Name of the shape containing the face.
        shape: String,
        /// Triangle index within the shape.
        face: usize,
    },
    /// A face references a material the table does not contain.
    MaterialOutOfRange {
        /// Name of the shape containing the face.
        shape: String,
        /// Triangle index within the shape.
        face: usize,
        /// The offending material index.
        material: usize,
        /// Number of materials available.
        count: usize,
    },
    /// A face corner references an attribute past the end of its array.
    IndexOutOfRange {
        /// Name of the shape containing the face.
        shape: String,
        /// Triangle index within the shape.
        face: usize,
        /// `"position"`, `"normal"` or `"texture coordinate"`.
        attribute: &'static str,
        /// The offending zero-based index.
        index: u32,
        /// Length of the attribute array.
        count: usize,
    },
    /// A shape's corner list does not hold three corners per material entry.
    MalformedShape {
        /// Name of the shape.
        shape: String,
        /// Corners present.
        corners: usize,
        /// Triangles declared by the material list.
        faces: usize,
    },
    /// The vertex map already held a key that was just looked up as absent.
    DedupConflict {
        /// Triangle index within the shape.
        face: usize,
        /// Corner of the triangle (0..3).
        corner: usize,
    },
    /// More unique vertices than 32-bit indices can address.
    IndexOverflow,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoVertices => write!(f, "mesh has 0 vertices"),
            Self::NoFaces => write!(f, "mesh has 0 faces"),
            Self::NoNormals => write!(f, "mesh has 0 normals"),
            Self::NoMaterials => write!(f, "mesh has 0 materials"),
            Self::FaceWithoutMaterial { shape, face } => {
                write!(f, "face {face} of shape '{shape}' has no assigned material")
            }
            Self::MissingNormalIndex { shape, face } => {
                write!(f, "face {face} of shape '{shape}' has a vertex without a normal")
            }
            Self::MaterialOutOfRange {
                shape,
                face,
                material,
                count,
            } => write!(
                f,
                "face {face} of shape '{shape}' uses material {material}, but only {count} exist"
            ),
            Self::IndexOutOfRange {
                shape,
                face,
                attribute,
                index,
                count,
            } => write!(
                f,
                "face {face} of shape '{shape}' references {attribute} {index} of {count}"
            ),
            Self::MalformedShape {
                shape,
                corners,
                faces,
            } => write!(
                f,
                "shape '{shape}' has {corners} corners for {faces} triangles"
            ),
            Self::DedupConflict { face, corner } => {
                write!(f, "vertex map insertion failed for face {face}, corner {corner}")
            }
            Self::IndexOverflow => write!(f, "mesh exceeds the 32-bit index range"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Errors that can occur during OBJ loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjError {
    /// Reading or parsing failed.
    Parse(ParseError),
    /// The parsed data violates a structural requirement.
    Load(LoadError),
}

impl std::fmt::Display for ObjError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "OBJ {e}"),
            Self::Load(e) => write!(f, "OBJ load error: {e}"),
        }
    }
}

impl std::error::Error for ObjError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Load(e) => Some(e),
        }
    }
}

impl From<ParseError> for ObjError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<LoadError> for ObjError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}
