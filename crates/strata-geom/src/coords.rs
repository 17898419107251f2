use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Vec3;

/// Edge length of a section, in cells.
pub const SECTION_SIZE: usize = 16;
/// Cells per section.
pub const SECTION_CELLS: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

const SECTION_SHIFT: i32 = 4;
const LOCAL_MASK: i32 = (SECTION_SIZE as i32) - 1;

/// Absolute cell coordinate in the voxel grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Section containing this cell.
    #[inline]
    pub fn section(self) -> SectionPos {
        SectionPos::new(
            self.x >> SECTION_SHIFT,
            self.y >> SECTION_SHIFT,
            self.z >> SECTION_SHIFT,
        )
    }

    /// Coordinate of this cell inside its own section.
    #[inline]
    pub fn local(self) -> LocalPos {
        LocalPos {
            x: (self.x & LOCAL_MASK) as u8,
            y: (self.y & LOCAL_MASK) as u8,
            z: (self.z & LOCAL_MASK) as u8,
        }
    }

    #[inline]
    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Section coordinate; the section's first cell is at `self * SECTION_SIZE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl SectionPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn origin(self) -> BlockPos {
        BlockPos::new(
            self.x << SECTION_SHIFT,
            self.y << SECTION_SHIFT,
            self.z << SECTION_SHIFT,
        )
    }
}

impl fmt::Display for SectionPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Cell coordinate inside one section, each axis in `0..SECTION_SIZE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPos {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl LocalPos {
    #[inline]
    pub fn new(x: u8, y: u8, z: u8) -> Self {
        debug_assert!(
            (x as usize) < SECTION_SIZE && (y as usize) < SECTION_SIZE && (z as usize) < SECTION_SIZE
        );
        Self { x, y, z }
    }

    /// Linear index, y-major then z then x.
    #[inline]
    pub fn index(self) -> usize {
        ((self.y as usize * SECTION_SIZE) + self.z as usize) * SECTION_SIZE + self.x as usize
    }

    #[inline]
    pub fn from_index(i: usize) -> Self {
        debug_assert!(i < SECTION_CELLS);
        Self {
            x: (i % SECTION_SIZE) as u8,
            z: ((i / SECTION_SIZE) % SECTION_SIZE) as u8,
            y: (i / (SECTION_SIZE * SECTION_SIZE)) as u8,
        }
    }

    #[inline]
    pub fn to_world(self, section: SectionPos) -> BlockPos {
        section
            .origin()
            .offset(i32::from(self.x), i32::from(self.y), i32::from(self.z))
    }

    /// True when the cell touches any face of the section.
    #[inline]
    pub fn is_on_edge(self) -> bool {
        const LAST: u8 = (SECTION_SIZE - 1) as u8;
        self.x == 0
            || self.y == 0
            || self.z == 0
            || self.x == LAST
            || self.y == LAST
            || self.z == LAST
    }
}

impl fmt::Display for LocalPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_blocks_map_to_negative_sections() {
        let p = BlockPos::new(-1, -16, -17);
        assert_eq!(p.section(), SectionPos::new(-1, -1, -2));
        assert_eq!(p.local(), LocalPos::new(15, 0, 15));
        assert_eq!(p.local().to_world(p.section()), p);
    }

    #[test]
    fn local_index_round_trips() {
        for i in 0..SECTION_CELLS {
            assert_eq!(LocalPos::from_index(i).index(), i);
        }
    }
}
