//! Wavefront material library (`.mtl`) import.
//!
//! `tobj` reads the library; this module maps its materials onto
//! [`MaterialDescriptor`]. Statements `tobj` has no field for (`Ke`, `Tr`,
//! `map_Pm`, `map_Pr`, `map_Ke`, `norm`) arrive through
//! `Material::unknown_param`.

use std::io::BufRead;

use crate::material::{MaterialDescriptor, TextureSlot};

use super::error::ParseError;

/// Parse every material of a library.
pub fn parse_mtl<R: BufRead>(mut reader: R) -> Result<Vec<MaterialDescriptor>, ParseError> {
    let (materials, _) = tobj::load_mtl_buf(&mut reader)?;
    materials.into_iter().map(convert_material).collect()
}

/// Map one `tobj` material onto a descriptor.
///
/// Absent coefficients keep the descriptor defaults.
pub(crate) fn convert_material(mat: tobj::Material) -> Result<MaterialDescriptor, ParseError> {
    let mut desc = MaterialDescriptor::new(mat.name.as_str());
    let extra = |key: &str| mat.unknown_param.get(key).map(String::as_str);

    if let Some(ambient) = mat.ambient {
        desc.ambient = ambient;
    }
    if let Some(diffuse) = mat.diffuse {
        desc.diffuse = diffuse;
    }
    if let Some(specular) = mat.specular {
        desc.specular = specular;
    }
    if let Some(emissive) = extra("Ke") {
        desc.emissive = parse_color(emissive).map_err(|e| in_material(&mat.name, e))?;
    }
    if let Some(shininess) = mat.shininess {
        desc.shininess = shininess;
    }
    match (mat.dissolve, extra("Tr")) {
        (Some(dissolve), _) => desc.dissolve = dissolve,
        (None, Some(tr)) => {
            desc.dissolve = 1.0 - parse_float(tr).map_err(|e| in_material(&mat.name, e))?
        }
        (None, None) => {}
    }
    desc.illumination = mat.illumination_model;

    let textures = [
        (TextureSlot::Diffuse, mat.diffuse_texture.as_deref()),
        (TextureSlot::Specular, mat.specular_texture.as_deref()),
        (TextureSlot::Metallic, extra("map_Pm")),
        (TextureSlot::Roughness, extra("map_Pr")),
        (TextureSlot::Ambient, mat.ambient_texture.as_deref()),
        (
            TextureSlot::Bump,
            mat.normal_texture.as_deref().or_else(|| extra("norm")),
        ),
        (TextureSlot::Emissive, extra("map_Ke")),
        (TextureSlot::Mask, mat.dissolve_texture.as_deref()),
    ];
    for (slot, value) in textures {
        if let Some(name) = value.and_then(texture_name) {
            desc.set_texture(slot, name);
        }
    }

    for key in mat.unknown_param.keys() {
        log::debug!("MTL: ignoring '{key}' in material '{}'", mat.name);
    }
    Ok(desc)
}

fn in_material(name: &str, message: String) -> ParseError {
    ParseError::new(format!("material '{name}': {message}"))
}

/// Drop everything from the first `#`.
fn strip_comment(value: &str) -> &str {
    value.split_once('#').map_or(value, |(before, _)| before)
}

fn parse_float(value: &str) -> Result<f32, String> {
    let value = strip_comment(value).trim();
    value.parse().map_err(|_| format!("invalid number '{value}'"))
}

/// `r [g b]`; a single component is replicated.
fn parse_color(value: &str) -> Result<[f32; 3], String> {
    let components = strip_comment(value)
        .split_whitespace()
        .map(|c| c.parse::<f32>().map_err(|_| format!("invalid color component '{c}'")))
        .collect::<Result<Vec<_>, _>>()?;
    match components.as_slice() {
        [v] => Ok([*v; 3]),
        [r, g, b, ..] => Ok([*r, *g, *b]),
        _ => Err(format!("expected 1 or 3 color components, got '{value}'")),
    }
}

/// The file name is the last token; option flags such as `-bm 0.5` precede it.
fn texture_name(value: &str) -> Option<&str> {
    strip_comment(value).split_whitespace().last()
}
