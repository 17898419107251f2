use strata_geom::Vec3;

use crate::face::Face;

/// Format-independent vertex as produced by model and fluid resolvers.
///
/// Positions are section-local (`0.0..=16.0` for geometry inside the section).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub color: [u8; 4],
    pub uv: [f32; 2],
    /// Block light, sky light.
    pub light: [u8; 2],
}

impl Vertex {
    #[inline]
    pub const fn new(pos: Vec3, color: [u8; 4], uv: [f32; 2], light: [u8; 2]) -> Self {
        Self {
            pos,
            color,
            uv,
            light,
        }
    }
}

/// One polygon's worth of vertices; always pushed and sorted as a unit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: [Vertex; 4],
    len: u8,
}

impl Polygon {
    #[inline]
    pub fn triangle(v: [Vertex; 3]) -> Self {
        Self {
            vertices: [v[0], v[1], v[2], Vertex::default()],
            len: 3,
        }
    }

    #[inline]
    pub fn quad(v: [Vertex; 4]) -> Self {
        Self { vertices: v, len: 4 }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices[..self.len as usize]
    }

    /// Shifts every vertex by `d`.
    pub fn translated(mut self, d: Vec3) -> Self {
        for v in &mut self.vertices[..self.len as usize] {
            v.pos += d;
        }
        self
    }
}

/// Builds the quad covering `face` of the box `[min, max]`.
///
/// UVs are anchored to the face plane's coordinates so adjacent boxes tile seamlessly.
pub fn box_face(face: Face, min: Vec3, max: Vec3, color: [u8; 4], light: [u8; 2]) -> Polygon {
    const FACE_CORNERS: [[usize; 4]; 6] = [
        [0, 2, 6, 4], // PosY
        [5, 7, 3, 1], // NegY
        [6, 2, 3, 7], // PosX
        [0, 4, 5, 1], // NegX
        [4, 6, 7, 5], // PosZ
        [2, 0, 1, 3], // NegZ
    ];

    let corners = [
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(max.x, min.y, max.z),
    ];

    let uv_from = |p: Vec3| match face {
        Face::PosY | Face::NegY => [p.x, p.z],
        Face::PosX | Face::NegX => [p.z, p.y],
        Face::PosZ | Face::NegZ => [p.x, p.y],
    };

    let idx = FACE_CORNERS[face.index()];
    let (a, b, c, d) = (
        corners[idx[0]],
        corners[idx[1]],
        corners[idx[2]],
        corners[idx[3]],
    );
    let vertex = |p: Vec3| Vertex::new(p, color, uv_from(p), light);
    Polygon::quad([vertex(a), vertex(d), vertex(c), vertex(b)])
}
