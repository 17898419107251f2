use hashbrown::HashMap;
use strata_geom::{BlockPos, SECTION_SIZE, SectionPos};

use crate::WorldSlice;
use crate::cell::{AttachedObject, CellState};

/// Cells of neighbourhood captured on every side of the section.
pub const SNAPSHOT_MARGIN: usize = 1;

const DIM: usize = SECTION_SIZE + 2 * SNAPSHOT_MARGIN;

/// Owned copy of one section and its one-cell neighbourhood.
///
/// Captured once on the producing thread, then shared read-only (`Arc`) with the
/// worker compiling the section.
#[derive(Clone, Debug)]
pub struct SectionSnapshot {
    pub section: SectionPos,
    cells: Vec<CellState>,
    attached: HashMap<BlockPos, AttachedObject>,
}

impl SectionSnapshot {
    /// An all-air snapshot.
    pub fn new(section: SectionPos) -> Self {
        Self {
            section,
            cells: vec![CellState::AIR; DIM * DIM * DIM],
            attached: HashMap::new(),
        }
    }

    /// Fills every captured cell (margin included) from `f`.
    pub fn from_fn(section: SectionPos, mut f: impl FnMut(BlockPos) -> CellState) -> Self {
        let mut snap = Self::new(section);
        let min = snap.min_corner();
        for y in 0..DIM {
            for z in 0..DIM {
                for x in 0..DIM {
                    let pos = min.offset(x as i32, y as i32, z as i32);
                    snap.cells[(y * DIM + z) * DIM + x] = f(pos);
                }
            }
        }
        snap
    }

    #[inline]
    fn min_corner(&self) -> BlockPos {
        let m = SNAPSHOT_MARGIN as i32;
        self.section.origin().offset(-m, -m, -m)
    }

    #[inline]
    fn idx(&self, pos: BlockPos) -> Option<usize> {
        let min = self.min_corner();
        let lx = pos.x.checked_sub(min.x)?;
        let ly = pos.y.checked_sub(min.y)?;
        let lz = pos.z.checked_sub(min.z)?;
        let d = DIM as i32;
        if !(0..d).contains(&lx) || !(0..d).contains(&ly) || !(0..d).contains(&lz) {
            return None;
        }
        Some(((ly as usize * DIM) + lz as usize) * DIM + lx as usize)
    }

    #[inline]
    pub fn contains_world(&self, pos: BlockPos) -> bool {
        self.idx(pos).is_some()
    }

    #[inline]
    pub fn get_world(&self, pos: BlockPos) -> Option<CellState> {
        self.idx(pos).map(|i| self.cells[i])
    }

    /// Writes a cell; returns false when `pos` is outside the captured volume.
    pub fn set(&mut self, pos: BlockPos, state: CellState) -> bool {
        match self.idx(pos) {
            Some(i) => {
                self.cells[i] = state;
                true
            }
            None => false,
        }
    }

    /// Registers an attached object at its anchor cell. Returns false when the anchor
    /// lies outside the captured volume.
    pub fn insert_attached(&mut self, object: AttachedObject) -> bool {
        if !self.contains_world(object.pos) {
            return false;
        }
        self.attached.insert(object.pos, object);
        true
    }

    /// True when any cell of the section itself (margin excluded) is not air.
    pub fn has_non_air(&self) -> bool {
        let origin = self.section.origin();
        (0..SECTION_SIZE as i32).any(|y| {
            (0..SECTION_SIZE as i32).any(|z| {
                (0..SECTION_SIZE as i32).any(|x| {
                    self.get_world(origin.offset(x, y, z))
                        .is_some_and(|c| !c.is_air())
                })
            })
        })
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }
}

impl WorldSlice for SectionSnapshot {
    #[inline]
    fn cell_state(&self, pos: BlockPos) -> CellState {
        self.get_world(pos).unwrap_or(CellState::AIR)
    }

    #[inline]
    fn attached_object(&self, pos: BlockPos) -> Option<AttachedObject> {
        self.attached.get(&pos).cloned()
    }

    fn volume(&self) -> (BlockPos, BlockPos) {
        let min = self.min_corner();
        (min, min.offset(DIM as i32, DIM as i32, DIM as i32))
    }
}
