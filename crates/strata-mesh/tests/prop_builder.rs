use hashbrown::HashSet;
use proptest::prelude::*;
use strata_geom::{LocalPos, SECTION_CELLS, SECTION_SIZE, SectionPos, Vec3};
use strata_mesh::{
    BoundsBuilder, CapacityPolicy, Face, Material, OcclusionBuilder, RenderPass, Vertex,
    VertexBufferBuilder, VertexFormat,
};

fn arb_local() -> impl Strategy<Value = LocalPos> {
    let n = SECTION_SIZE as u8;
    (0..n, 0..n, 0..n).prop_map(|(x, y, z)| LocalPos::new(x, y, z))
}

fn arb_vertex() -> impl Strategy<Value = Vertex> {
    (
        (0.0f32..16.0, 0.0f32..16.0, 0.0f32..16.0),
        any::<[u8; 4]>(),
        (0.0f32..1.0, 0.0f32..1.0),
        any::<[u8; 2]>(),
    )
        .prop_map(|((x, y, z), color, (u, v), light)| {
            Vertex::new(Vec3::new(x, y, z), color, [u, v], light)
        })
}

fn arb_batches() -> impl Strategy<Value = Vec<Vec<Vertex>>> {
    prop::collection::vec(prop::collection::vec(arb_vertex(), 3..=4), 0..64)
}

proptest! {
    // Buffer bytes equal the concatenated per-vertex encodings, whatever growth happened
    #[test]
    fn written_bytes_match_encodings(batches in arb_batches(), initial in 1usize..8, compact in any::<bool>()) {
        let format = if compact { VertexFormat::Compact } else { VertexFormat::Standard };
        let mut b = VertexBufferBuilder::new(format, initial, CapacityPolicy::default());
        b.start(99);
        let mut want = Vec::new();
        for batch in &batches {
            b.push(batch, Material::SOLID).unwrap();
            for v in batch {
                format.encode(v, Material::SOLID, 99, &mut want);
            }
        }
        prop_assert_eq!(b.count() * format.stride(), want.len());
        prop_assert!(b.count() <= b.capacity());
        if batches.is_empty() {
            prop_assert!(b.slice().is_err());
        } else {
            prop_assert_eq!(b.slice().unwrap(), &want[..]);
            prop_assert_eq!(b.groups().len(), batches.len());
        }
    }

    // Bounds are the smallest box containing every added cell
    #[test]
    fn bounds_are_minimal(cells in prop::collection::vec(arb_local(), 1..40)) {
        let mut bb = BoundsBuilder::new();
        for &c in &cells {
            bb.add_block(c);
        }
        let b = bb.build(SectionPos::new(2, 0, -1));
        let local = b.local().unwrap();
        for &c in &cells {
            prop_assert!(local.contains(c));
        }
        prop_assert_eq!(local.min.x, cells.iter().map(|c| c.x).min().unwrap());
        prop_assert_eq!(local.max.y, cells.iter().map(|c| c.y).max().unwrap());
        prop_assert_eq!(local.min.z, cells.iter().map(|c| c.z).min().unwrap());
        prop_assert!(!b.world().is_degenerate());
    }

    // Visibility is symmetric and exactly the marked cells are reported closed
    #[test]
    fn occlusion_is_symmetric(cells in prop::collection::vec(arb_local(), 0..1500)) {
        let mut ob = OcclusionBuilder::new();
        for &c in &cells {
            ob.mark_closed(c);
        }
        let data = ob.build();
        let marked: HashSet<LocalPos> = cells.iter().copied().collect();
        prop_assert_eq!(data.closed_count(), marked.len());
        for i in 0..SECTION_CELLS {
            let p = LocalPos::from_index(i);
            prop_assert_eq!(data.is_closed(p), marked.contains(&p));
        }
        for a in Face::ALL {
            for c in Face::ALL {
                prop_assert_eq!(data.is_visible_through(a, c), data.is_visible_through(c, a));
            }
        }
    }
}

#[test]
fn grows_from_one_to_a_hundred_thousand_vertices() {
    const N: u32 = 100_000;
    let format = VertexFormat::Standard;
    let material = Material::for_pass(RenderPass::Solid);
    let mut b = VertexBufferBuilder::new(format, 1, CapacityPolicy::ResetToInitial);
    b.start(5);
    let mut want = Vec::with_capacity(N as usize * format.stride());
    for i in 0..N {
        let [c0, c1, c2, c3] = i.to_le_bytes();
        let v = Vertex::new(
            Vec3::new(i as f32, (i % 16) as f32, -(i as f32)),
            [c0, c1, c2, c3 ^ 0xA5],
            [(i % 7) as f32 / 7.0, 0.5],
            [c0, c1],
        );
        b.push(&[v], material).unwrap();
        format.encode(&v, material, 5, &mut want);
    }
    assert_eq!(b.count(), N as usize);
    assert!(b.capacity() >= N as usize);
    assert_eq!(b.groups().len(), N as usize);
    let got = b.slice().unwrap();
    assert_eq!(got.len(), want.len());
    let first_diff = got.iter().zip(&want).position(|(a, w)| a != w);
    assert_eq!(first_diff, None, "bytes diverge at offset {first_diff:?}");
    b.start(6);
    assert_eq!(b.capacity(), 1);
}
