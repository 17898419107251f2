use strata_geom::Vec3;

use crate::mesh::Mesh;

struct GroupKey {
    first_vertex: usize,
    len: usize,
    dist_sq: f32,
}

/// Reorders a mesh's polygons back to front as seen from `camera`.
///
/// `camera` is in section-local coordinates. Each polygon is keyed by the squared
/// distance from its centroid; polygons move as whole groups and equal keys keep
/// emission order, so sorting an already sorted mesh is a no-op.
pub fn sort_translucent(mesh: &Mesh, camera: Vec3) -> Mesh {
    let format = mesh.format();
    let stride = mesh.stride();

    let mut keys = Vec::with_capacity(mesh.polygon_count());
    let mut first_vertex = 0usize;
    for &len in mesh.groups() {
        let len = len as usize;
        let mut sum = Vec3::ZERO;
        for i in first_vertex..first_vertex + len {
            sum += format.decode_position(mesh.vertex(i));
        }
        let centroid = sum / len as f32;
        keys.push(GroupKey {
            first_vertex,
            len,
            dist_sq: centroid.distance_squared(camera),
        });
        first_vertex += len;
    }

    // Stable: ties keep emission order
    keys.sort_by(|a, b| b.dist_sq.total_cmp(&a.dist_sq));

    let src = mesh.bytes();
    let mut data = Vec::with_capacity(src.len());
    let mut groups = Vec::with_capacity(keys.len());
    for k in &keys {
        data.extend_from_slice(&src[k.first_vertex * stride..(k.first_vertex + k.len) * stride]);
        groups.push(k.len as u8);
    }
    mesh.with_contents(data, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{CapacityPolicy, VertexBufferBuilder};
    use crate::face::Face;
    use crate::format::VertexFormat;
    use crate::pass::{Material, RenderPass};
    use crate::vertex::{Polygon, Vertex, box_face};

    fn mesh_of(format: VertexFormat, polys: &[Polygon]) -> Mesh {
        let mut b = VertexBufferBuilder::new(format, 4, CapacityPolicy::default());
        b.start(7);
        for p in polys {
            b.push(p.vertices(), Material::TRANSLUCENT).unwrap();
        }
        Mesh::from_builder(RenderPass::Translucent, &b).unwrap()
    }

    fn unit_face_at(x: f32) -> Polygon {
        box_face(
            Face::PosY,
            Vec3::new(x, 0.0, 0.0),
            Vec3::new(x + 1.0, 1.0, 1.0),
            [255, 255, 255, 128],
            [0, 15],
        )
    }

    #[test]
    fn farther_polygon_comes_first() {
        let near = unit_face_at(0.0);
        let far = unit_face_at(8.0);
        let mesh = mesh_of(VertexFormat::Standard, &[near, far]);
        let sorted = sort_translucent(&mesh, Vec3::new(-4.0, 1.0, 0.5));
        let first = VertexFormat::Standard.decode_position(sorted.vertex(0));
        assert!(first.x >= 8.0, "far quad should lead, got {first:?}");
        assert_eq!(sorted.vertex_count(), mesh.vertex_count());
        assert_eq!(sorted.bytes().len(), mesh.bytes().len());
    }

    #[test]
    fn sorting_twice_is_identical() {
        let polys: Vec<Polygon> = (0..10).map(|i| unit_face_at(((i * 7) % 10) as f32)).collect();
        for format in [VertexFormat::Standard, VertexFormat::Compact] {
            let mesh = mesh_of(format, &polys);
            let cam = Vec3::new(3.3, 5.0, -2.0);
            let once = sort_translucent(&mesh, cam);
            let twice = sort_translucent(&once, cam);
            assert_eq!(once.bytes(), twice.bytes());
            assert_eq!(once.groups(), twice.groups());
        }
    }

    #[test]
    fn equidistant_polygons_keep_emission_order() {
        let v = |x: f32, r: u8| Vertex::new(Vec3::new(x, 0.0, 0.0), [r, 0, 0, 255], [0.0; 2], [0; 2]);
        let left = Polygon::triangle([v(-1.0, 1), v(-1.0, 1), v(-1.0, 1)]);
        let right = Polygon::triangle([v(1.0, 2), v(1.0, 2), v(1.0, 2)]);
        let mesh = mesh_of(VertexFormat::Standard, &[left, right]);
        let sorted = sort_translucent(&mesh, Vec3::ZERO);
        assert_eq!(sorted.bytes(), mesh.bytes());
    }

    #[test]
    fn mixed_group_sizes_stay_whole() {
        let v = |x: f32| Vertex::new(Vec3::new(x, 0.0, 0.0), [0; 4], [0.0; 2], [0; 2]);
        let tri = Polygon::triangle([v(1.0), v(1.0), v(1.0)]);
        let quad = Polygon::quad([v(9.0), v(9.0), v(9.0), v(9.0)]);
        let mesh = mesh_of(VertexFormat::Standard, &[tri, quad]);
        let sorted = sort_translucent(&mesh, Vec3::ZERO);
        assert_eq!(sorted.groups(), &[4, 3]);
        let s = mesh.stride();
        assert_eq!(&sorted.bytes()[..4 * s], &mesh.bytes()[3 * s..]);
        assert_eq!(&sorted.bytes()[4 * s..], &mesh.bytes()[..3 * s]);
    }
}
