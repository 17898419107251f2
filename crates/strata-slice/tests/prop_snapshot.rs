use proptest::prelude::*;
use strata_geom::{BlockPos, SECTION_SIZE, SectionPos};
use strata_slice::{
    AttachedObject, AuxData, AuxDataSource, CellState, NoAuxData, ObjectKind, SNAPSHOT_MARGIN,
    SectionSnapshot, WorldSlice,
};

fn section_coord() -> impl Strategy<Value = i32> {
    -100_000i32..=100_000
}

fn arb_section() -> impl Strategy<Value = SectionPos> {
    (section_coord(), -64i32..=64, section_coord()).prop_map(|(x, y, z)| SectionPos::new(x, y, z))
}

fn offset_in_volume() -> impl Strategy<Value = i32> {
    let m = SNAPSHOT_MARGIN as i32;
    -m..(SECTION_SIZE as i32 + m)
}

proptest! {
    // set/get agree everywhere inside the captured volume, margin included
    #[test]
    fn set_then_get_inside_volume(s in arb_section(), dx in offset_in_volume(), dy in offset_in_volume(), dz in offset_in_volume(), id in 1u16..) {
        let mut snap = SectionSnapshot::new(s);
        let pos = s.origin().offset(dx, dy, dz);
        prop_assert!(snap.set(pos, CellState::opaque_cube(id)));
        prop_assert_eq!(snap.cell_state(pos), CellState::opaque_cube(id));
        prop_assert_eq!(snap.get_world(pos), Some(CellState::opaque_cube(id)));
    }

    // Anything past the margin reads as air and refuses writes
    #[test]
    fn outside_volume_is_air(s in arb_section(), axis in 0usize..3, far in prop::bool::ANY) {
        let m = SNAPSHOT_MARGIN as i32;
        let step = if far { SECTION_SIZE as i32 + m } else { -m - 1 };
        let (dx, dy, dz) = match axis {
            0 => (step, 0, 0),
            1 => (0, step, 0),
            _ => (0, 0, step),
        };
        let mut snap = SectionSnapshot::new(s);
        let pos = s.origin().offset(dx, dy, dz);
        prop_assert!(!snap.contains_world(pos));
        prop_assert!(!snap.set(pos, CellState::opaque_cube(1)));
        prop_assert_eq!(snap.cell_state(pos), CellState::AIR);
    }

    // Margin cells never count towards the section's own occupancy
    #[test]
    fn margin_does_not_populate_section(s in arb_section(), dy in prop::sample::select(vec![-1, SECTION_SIZE as i32])) {
        let mut snap = SectionSnapshot::new(s);
        prop_assert!(snap.set(s.origin().offset(3, dy, 3), CellState::opaque_cube(7)));
        prop_assert!(snap.is_all_air());
        prop_assert!(snap.set(s.origin().offset(3, 0, 3), CellState::opaque_cube(7)));
        prop_assert!(snap.has_non_air());
    }
}

#[test]
fn from_fn_visits_full_volume() {
    let s = SectionPos::new(2, -1, 5);
    let mut calls = 0usize;
    let snap = SectionSnapshot::from_fn(s, |p| {
        calls += 1;
        if p.y == s.origin().y { CellState::opaque_cube(3) } else { CellState::AIR }
    });
    let dim = SECTION_SIZE + 2 * SNAPSHOT_MARGIN;
    assert_eq!(calls, dim * dim * dim);
    assert_eq!(snap.cell_state(s.origin().offset(15, 0, 15)), CellState::opaque_cube(3));
    assert_eq!(snap.cell_state(s.origin().offset(15, 1, 15)), CellState::AIR);
    let (min, max) = snap.volume();
    assert_eq!(min, s.origin().offset(-1, -1, -1));
    assert_eq!(max, s.origin().offset(17, 17, 17));
}

#[test]
fn attached_objects_resolve_by_anchor() {
    let s = SectionPos::new(0, 0, 0);
    let mut snap = SectionSnapshot::new(s);
    let anchor = BlockPos::new(4, 5, 6);
    assert!(snap.insert_attached(AttachedObject::new(anchor, ObjectKind(9))));
    assert!(!snap.insert_attached(AttachedObject::new(BlockPos::new(40, 0, 0), ObjectKind(9))));
    assert_eq!(snap.attached_count(), 1);
    assert_eq!(snap.attached_object(anchor).map(|o| o.kind), Some(ObjectKind(9)));
    assert!(snap.attached_object(anchor.offset(1, 0, 0)).is_none());
}

#[test]
fn aux_data_defaults_to_empty() {
    let mut map = hashbrown::HashMap::new();
    let pos = BlockPos::new(1, 2, 3);
    map.insert(pos, AuxData::new(vec![1u8, 2, 3]));
    assert_eq!(map.aux_data_or_empty(pos).bytes(), &[1, 2, 3]);
    assert!(map.aux_data_or_empty(pos.offset(0, 1, 0)).is_empty());
    assert_eq!(NoAuxData.aux_data_or_empty(pos), AuxData::EMPTY);
}
