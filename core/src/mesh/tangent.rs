//! Per-vertex tangent frames for bump-mapped geometry.
//!
//! Tangents are accumulated per triangle from the position and texture
//! coordinate deltas (Lengyel, *Mathematics for 3D Game Programming and
//! Computer Graphics*, 7.8), then orthogonalized against the vertex normal.
//! The bitangent is not stored; its orientation is folded into
//! [`Vertex::handedness`].

use crate::math::Vec3;
use crate::profile_function;

use super::Vertex;

/// Texture coordinates are scaled by this factor before solving the 2x2
/// system, which keeps the determinant away from the epsilon for tightly
/// packed UV islands.
pub const UV_CONDITIONING_SCALE: f32 = 100.0;

/// Offset added to a texture coordinate that duplicates another one in the
/// same triangle.
pub const DUPLICATE_UV_NUDGE: f32 = 0.1;

/// Two texture coordinates closer than this (per component) are duplicates.
pub const DUPLICATE_UV_EPSILON: f32 = 1.0e-6;

/// Triangles whose UV determinant falls below this contribute nothing.
pub const DEGENERATE_DETERMINANT: f64 = 1.0e-6;

/// Accumulated tangents shorter than this leave the vertex without a frame.
pub const MIN_TANGENT_LENGTH: f32 = 1.0e-6;

/// Counters describing one tangent pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TangentReport {
    /// Triangles visited.
    pub triangles: usize,
    /// Triangles that needed at least one duplicate-UV nudge.
    pub nudged: usize,
    /// Triangles skipped because of a degenerate UV mapping.
    pub degenerate: usize,
    /// Vertices that ended up with a tangent frame.
    pub framed_vertices: usize,
}

/// Compute tangents and handedness in place.
///
/// Only the triangles listed in `index_arrays` contribute; pass the index
/// arrays of bump-mapped face groups only. Every vertex of `vertices` is
/// finalized afterwards, so vertices touched by no contributing triangle end
/// up with handedness `0`.
///
/// Every index must be in bounds for `vertices`.
pub fn build_tangents<'a, I>(vertices: &mut [Vertex], index_arrays: I) -> TangentReport
where
    I: IntoIterator<Item = &'a [u32]>,
{
    profile_function!();

    let mut report = TangentReport::default();
    let mut bitangents = vec![Vec3::zeros(); vertices.len()];

    for indices in index_arrays {
        for tri in indices.chunks_exact(3) {
            report.triangles += 1;
            let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let v = corners.map(|i| vertices[i]);
            let (uvs, nudged) = separate_duplicate_uvs([v[0].tex_coord, v[1].tex_coord, v[2].tex_coord]);
            if nudged {
                report.nudged += 1;
            }

            let Some((t, b)) = triangle_tangent(
                [v[0].position, v[1].position, v[2].position],
                uvs,
            ) else {
                report.degenerate += 1;
                continue;
            };

            for &i in &corners {
                let acc = &mut vertices[i].tangent;
                acc[0] += t.x;
                acc[1] += t.y;
                acc[2] += t.z;
                bitangents[i] += b;
            }
        }
    }

    for (vertex, bitangent) in vertices.iter_mut().zip(&bitangents) {
        if finalize_vertex(vertex, bitangent) {
            report.framed_vertices += 1;
        }
    }

    log::debug!(
        "Tangent pass: {} triangles ({} nudged, {} degenerate), {} framed vertices",
        report.triangles,
        report.nudged,
        report.degenerate,
        report.framed_vertices
    );

    report
}

/// Push apart texture coordinates that coincide within a triangle.
///
/// All three differences are measured on the original coordinates before any
/// offset is applied. Returns the patched coordinates and whether anything
/// moved.
fn separate_duplicate_uvs(uvs: [[f32; 2]; 3]) -> ([[f32; 2]; 3], bool) {
    let coincide = |a: [f32; 2], b: [f32; 2]| {
        (b[0] - a[0]).abs() < DUPLICATE_UV_EPSILON && (b[1] - a[1]).abs() < DUPLICATE_UV_EPSILON
    };
    let nudge = |uv: &mut [f32; 2]| {
        uv[0] += DUPLICATE_UV_NUDGE;
        uv[1] += DUPLICATE_UV_NUDGE;
    };

    let [uv0, mut uv1, mut uv2] = uvs;
    let first_second = coincide(uv0, uv1);
    let first_third = coincide(uv0, uv2);
    let second_third = coincide(uv1, uv2);

    if first_second {
        nudge(&mut uv1);
    }
    if first_third {
        nudge(&mut uv2);
    }
    if second_third {
        nudge(&mut uv2);
    }

    ([uv0, uv1, uv2], first_second || first_third || second_third)
}

/// Solve for the unnormalized tangent and bitangent of one triangle.
///
/// Returns `None` when the UV mapping is degenerate.
fn triangle_tangent(positions: [[f32; 3]; 3], uvs: [[f32; 2]; 3]) -> Option<(Vec3, Vec3)> {
    let p0 = Vec3::from(positions[0]);
    let e0 = Vec3::from(positions[1]) - p0;
    let e1 = Vec3::from(positions[2]) - p0;

    let scale = UV_CONDITIONING_SCALE;
    let s0 = f64::from(uvs[1][0] * scale - uvs[0][0] * scale);
    let t0 = f64::from(uvs[1][1] * scale - uvs[0][1] * scale);
    let s1 = f64::from(uvs[2][0] * scale - uvs[0][0] * scale);
    let t1 = f64::from(uvs[2][1] * scale - uvs[0][1] * scale);

    let denom = s0 * t1 - s1 * t0;
    if denom.abs() < DEGENERATE_DETERMINANT {
        return None;
    }
    let r = 1.0 / denom;

    let e0 = e0.map(f64::from);
    let e1 = e1.map(f64::from);
    let tangent = (e0 * t1 - e1 * t0) * r;
    let bitangent = (e1 * s0 - e0 * s1) * r;

    Some((tangent.map(|c| c as f32), bitangent.map(|c| c as f32)))
}

/// Orthogonalize the accumulated tangent and derive handedness.
///
/// Returns `true` if the vertex received a tangent frame.
fn finalize_vertex(vertex: &mut Vertex, bitangent: &Vec3) -> bool {
    let n = Vec3::from(vertex.normal);
    let t = Vec3::from(vertex.tangent);

    if t.norm() < MIN_TANGENT_LENGTH {
        vertex.handedness = 0.0;
        return false;
    }

    let t = (t - n * n.dot(&t)).normalize();
    vertex.handedness = if n.cross(&t).dot(bitangent) < 0.0 {
        -1.0
    } else {
        1.0
    };
    vertex.tangent = t.into();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(normal: [f32; 3]) -> (Vec<Vertex>, Vec<u32>) {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], normal, [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], normal, [1.0, 0.0]),
            Vertex::new([1.0, 1.0, 0.0], normal, [1.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0], normal, [0.0, 1.0]),
        ];
        (vertices, vec![0, 1, 2, 0, 2, 3])
    }

    fn assert_unit_and_orthogonal(v: &Vertex) {
        let t = Vec3::from(v.tangent);
        let n = Vec3::from(v.normal);
        assert!((t.norm() - 1.0).abs() < 1e-4, "tangent not unit: {t:?}");
        assert!(t.dot(&n).abs() < 1e-4, "tangent not orthogonal: {t:?}");
    }

    #[test]
    fn test_planar_quad_tangent_follows_u() {
        let (mut vertices, indices) = quad([0.0, 0.0, 1.0]);
        let report = build_tangents(&mut vertices, [indices.as_slice()]);

        assert_eq!(report.triangles, 2);
        assert_eq!(report.framed_vertices, 4);
        for v in &vertices {
            assert_unit_and_orthogonal(v);
            assert!((v.tangent[0] - 1.0).abs() < 1e-5);
            assert_eq!(v.handedness, 1.0);
        }
    }

    #[test]
    fn test_mirrored_uvs_flip_handedness() {
        let (mut vertices, indices) = quad([0.0, 0.0, 1.0]);
        for v in &mut vertices {
            v.tex_coord[1] = 1.0 - v.tex_coord[1];
        }
        build_tangents(&mut vertices, [indices.as_slice()]);
        for v in &vertices {
            assert_eq!(v.handedness, -1.0);
        }
    }

    #[test]
    fn test_tangent_is_orthogonalized_against_tilted_normal() {
        let tilted = Vec3::new(0.3, 0.0, 1.0).normalize();
        let (mut vertices, indices) = quad(tilted.into());
        build_tangents(&mut vertices, [indices.as_slice()]);
        for v in &vertices {
            assert_unit_and_orthogonal(v);
        }
    }

    #[test]
    fn test_identical_uvs_contribute_nothing() {
        let normal = [0.0, 0.0, 1.0];
        let mut vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], normal, [0.5, 0.5]),
            Vertex::new([1.0, 0.0, 0.0], normal, [0.5, 0.5]),
            Vertex::new([0.0, 1.0, 0.0], normal, [0.5, 0.5]),
        ];
        let report = build_tangents(&mut vertices, [[0u32, 1, 2].as_slice()]);

        assert_eq!(report.nudged, 1);
        assert_eq!(report.degenerate, 1);
        for v in &vertices {
            assert_eq!(v.tangent, [0.0; 3]);
            assert_eq!(v.handedness, 0.0);
        }
    }

    #[test]
    fn test_degenerate_triangle_is_skipped_before_patch() {
        let uv = [0.25, 0.75];
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert!(triangle_tangent(positions, [uv, uv, uv]).is_none());
    }

    #[test]
    fn test_duplicate_uv_nudge_uses_original_differences() {
        let uv = [0.0, 0.0];
        let (patched, nudged) = separate_duplicate_uvs([uv, uv, uv]);
        assert!(nudged);
        assert_eq!(patched[1], [DUPLICATE_UV_NUDGE, DUPLICATE_UV_NUDGE]);
        assert_eq!(patched[2], [2.0 * DUPLICATE_UV_NUDGE, 2.0 * DUPLICATE_UV_NUDGE]);

        let (untouched, nudged) = separate_duplicate_uvs([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
        assert!(!nudged);
        assert_eq!(untouched[2], [0.0, 1.0]);
    }

    #[test]
    fn test_partial_duplicate_is_rescued_by_nudge() {
        let normal = [0.0, 0.0, 1.0];
        let mut vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], normal, [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], normal, [0.0, 0.0]),
            Vertex::new([0.0, 1.0, 0.0], normal, [0.0, 1.0]),
        ];
        let report = build_tangents(&mut vertices, [[0u32, 1, 2].as_slice()]);
        assert_eq!(report.degenerate, 0);
        for v in &vertices {
            assert_unit_and_orthogonal(v);
            assert_ne!(v.handedness, 0.0);
        }
    }

    #[test]
    fn test_untouched_vertices_get_zero_handedness() {
        let (mut vertices, indices) = quad([0.0, 0.0, 1.0]);
        vertices.push(Vertex::new([5.0, 5.0, 5.0], [0.0, 1.0, 0.0], [0.3, 0.3]));
        build_tangents(&mut vertices, [&indices[..3]]);

        assert_eq!(vertices[3].handedness, 0.0);
        assert_eq!(vertices[4].handedness, 0.0);
        assert_eq!(vertices[4].tangent, [0.0; 3]);
        assert_ne!(vertices[0].handedness, 0.0);
    }
}
