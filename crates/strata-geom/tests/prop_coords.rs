use proptest::prelude::*;
use strata_geom::{Aabb, BlockPos, LocalPos, SECTION_SIZE, SectionPos, Vec3};

fn world_i32() -> impl Strategy<Value = i32> {
    -30_000_000i32..=30_000_000
}

fn arb_block() -> impl Strategy<Value = BlockPos> {
    (world_i32(), -2048i32..=2048, world_i32()).prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

fn small_f32() -> impl Strategy<Value = f32> {
    -1_000.0f32..1_000.0
}

fn small_vec3() -> impl Strategy<Value = Vec3> {
    (small_f32(), small_f32(), small_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // Every block splits into (section, local) and recombines losslessly
    #[test]
    fn block_section_local_round_trip(p in arb_block()) {
        let s = p.section();
        let l = p.local();
        prop_assert!((l.x as usize) < SECTION_SIZE);
        prop_assert!((l.y as usize) < SECTION_SIZE);
        prop_assert!((l.z as usize) < SECTION_SIZE);
        prop_assert_eq!(l.to_world(s), p);
    }

    // Section origin is the cell at local (0,0,0)
    #[test]
    fn section_origin_is_local_zero(x in -100_000i32..100_000, y in -128i32..128, z in -100_000i32..100_000) {
        let s = SectionPos::new(x, y, z);
        let o = s.origin();
        prop_assert_eq!(o.section(), s);
        prop_assert_eq!(o.local(), LocalPos::new(0, 0, 0));
    }

    // Distance squared is symmetric and zero on the diagonal
    #[test]
    fn distance_squared_symmetric(a in small_vec3(), b in small_vec3()) {
        prop_assert_eq!(a.distance_squared(b), b.distance_squared(a));
        prop_assert_eq!(a.distance_squared(a), 0.0);
    }

    // A box contains its own corners and any point between them
    #[test]
    fn aabb_contains_interior(a in small_vec3(), b in small_vec3(), t in 0.0f32..=1.0) {
        let min = Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        let bb = Aabb::new(min, max);
        prop_assert!(bb.contains_point(min));
        prop_assert!(bb.contains_point(max));
        let mid = min + (max - min) * t;
        prop_assert!(bb.contains_point(Vec3::new(
            mid.x.clamp(min.x, max.x),
            mid.y.clamp(min.y, max.y),
            mid.z.clamp(min.z, max.z),
        )));
    }
}
