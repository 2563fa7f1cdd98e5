use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use voxel_atlas::{TextureAtlas, TextureType};

/// Interleaved vertex: position, tile-local texture coordinate, and the
/// pixel offset of the face's atlas tile.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub atlas_offset: [f32; 2],
}

pub const VERTICES_PER_FACE: usize = 6;
pub const FACE_COUNT: usize = 6;
pub const CUBE_VERTEX_COUNT: usize = VERTICES_PER_FACE * FACE_COUNT;

/// Material of each face, in the order the faces appear in the vertex table:
/// front, back, left, right, bottom, top.
pub const FACE_TEXTURES: [TextureType; FACE_COUNT] = [
    TextureType::GrassSide,
    TextureType::GrassSide,
    TextureType::GrassSide,
    TextureType::GrassSide,
    TextureType::Dirt,
    TextureType::GrassTop,
];

/// Degrees per second the demo cube spins.
pub const SPIN_RATE: f32 = 45.0;

/// Two triangles per face, non-indexed. v = 0 is the bottom of a tile.
#[rustfmt::skip]
const CUBE_TABLE: [([f32; 3], [f32; 2]); CUBE_VERTEX_COUNT] = [
    // Front
    ([-0.5, -0.5, -0.5], [0.0, 0.0]),
    ([ 0.5, -0.5, -0.5], [1.0, 0.0]),
    ([ 0.5,  0.5, -0.5], [1.0, 1.0]),
    ([ 0.5,  0.5, -0.5], [1.0, 1.0]),
    ([-0.5,  0.5, -0.5], [0.0, 1.0]),
    ([-0.5, -0.5, -0.5], [0.0, 0.0]),
    // Back
    ([-0.5, -0.5,  0.5], [0.0, 0.0]),
    ([ 0.5, -0.5,  0.5], [1.0, 0.0]),
    ([ 0.5,  0.5,  0.5], [1.0, 1.0]),
    ([ 0.5,  0.5,  0.5], [1.0, 1.0]),
    ([-0.5,  0.5,  0.5], [0.0, 1.0]),
    ([-0.5, -0.5,  0.5], [0.0, 0.0]),
    // Left
    ([-0.5,  0.5,  0.5], [0.0, 1.0]),
    ([-0.5,  0.5, -0.5], [1.0, 1.0]),
    ([-0.5, -0.5, -0.5], [1.0, 0.0]),
    ([-0.5, -0.5, -0.5], [1.0, 0.0]),
    ([-0.5, -0.5,  0.5], [0.0, 0.0]),
    ([-0.5,  0.5,  0.5], [0.0, 1.0]),
    // Right
    ([ 0.5,  0.5,  0.5], [0.0, 1.0]),
    ([ 0.5,  0.5, -0.5], [1.0, 1.0]),
    ([ 0.5, -0.5, -0.5], [1.0, 0.0]),
    ([ 0.5, -0.5, -0.5], [1.0, 0.0]),
    ([ 0.5, -0.5,  0.5], [0.0, 0.0]),
    ([ 0.5,  0.5,  0.5], [0.0, 1.0]),
    // Bottom
    ([-0.5, -0.5, -0.5], [0.0, 1.0]),
    ([ 0.5, -0.5, -0.5], [1.0, 1.0]),
    ([ 0.5, -0.5,  0.5], [1.0, 0.0]),
    ([ 0.5, -0.5,  0.5], [1.0, 0.0]),
    ([-0.5, -0.5,  0.5], [0.0, 0.0]),
    ([-0.5, -0.5, -0.5], [0.0, 1.0]),
    // Top
    ([-0.5,  0.5, -0.5], [0.0, 1.0]),
    ([ 0.5,  0.5, -0.5], [1.0, 1.0]),
    ([ 0.5,  0.5,  0.5], [1.0, 0.0]),
    ([ 0.5,  0.5,  0.5], [1.0, 0.0]),
    ([-0.5,  0.5,  0.5], [0.0, 0.0]),
    ([-0.5,  0.5, -0.5], [0.0, 1.0]),
];

/// Build the unit cube with each face's atlas offset baked into its vertices.
pub fn cube_vertices(atlas: &TextureAtlas) -> Vec<CubeVertex> {
    CUBE_TABLE
        .iter()
        .enumerate()
        .map(|(i, &(position, uv))| {
            let offset = atlas.lookup(FACE_TEXTURES[i / VERTICES_PER_FACE]).as_vec2();
            CubeVertex {
                position,
                uv,
                atlas_offset: offset.to_array(),
            }
        })
        .collect()
}

/// Model transform of the spinning cube after `elapsed_seconds`.
pub fn model_matrix(elapsed_seconds: f32) -> Mat4 {
    let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
    Mat4::from_axis_angle(axis, (elapsed_seconds * SPIN_RATE).to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cube_has_six_faces_of_two_triangles() {
        let verts = cube_vertices(&TextureAtlas::build_default(16));
        assert_eq!(verts.len(), 36);
        for v in &verts {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
            assert!(v.uv.iter().all(|c| *c == 0.0 || *c == 1.0));
        }
    }

    #[test]
    fn faces_carry_their_atlas_tile() {
        let verts = cube_vertices(&TextureAtlas::build_default(16));
        let face = |i: usize| &verts[i * VERTICES_PER_FACE..(i + 1) * VERTICES_PER_FACE];
        assert!(face(0).iter().all(|v| v.atlas_offset == [16.0, 0.0]));
        assert!(face(4).iter().all(|v| v.atlas_offset == [0.0, 0.0]));
        assert!(face(5).iter().all(|v| v.atlas_offset == [32.0, 0.0]));
    }

    #[test]
    fn top_face_sits_at_positive_y() {
        let verts = cube_vertices(&TextureAtlas::build_default(16));
        assert!(verts[30..].iter().all(|v| v.position[1] == 0.5));
        assert!(verts[24..30].iter().all(|v| v.position[1] == -0.5));
    }

    #[test]
    fn vertex_stride_is_seven_floats() {
        assert_eq!(std::mem::size_of::<CubeVertex>(), 7 * 4);
    }

    #[test]
    fn model_matrix_starts_at_identity() {
        assert_eq!(model_matrix(0.0), Mat4::IDENTITY);
    }

    #[test]
    fn model_matrix_spins_at_fixed_rate() {
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
        let rotated = model_matrix(2.0).transform_vector3(axis);
        assert_relative_eq!(rotated.dot(axis), 1.0, epsilon = 1e-5);
        let off_axis = model_matrix(2.0).transform_vector3(Vec3::Z);
        assert_relative_eq!(off_axis.dot(Vec3::Z), 90.0_f32.to_radians().cos(), epsilon = 1e-5);
    }
}
