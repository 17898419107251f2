use strata_geom::{LocalPos, SECTION_SIZE, Vec3};

/// One of the six axis-aligned faces of a cell or of a whole section.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const COUNT: usize = 6;
    pub const ALL: [Face; Self::COUNT] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (x, y, z) = self.delta();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Neighbour of `p` across this face, or `None` when that leaves the section.
    #[inline]
    pub fn step(self, p: LocalPos) -> Option<LocalPos> {
        let (dx, dy, dz) = self.delta();
        let x = i32::from(p.x) + dx;
        let y = i32::from(p.y) + dy;
        let z = i32::from(p.z) + dz;
        let inside = |v: i32| (0..SECTION_SIZE as i32).contains(&v);
        if inside(x) && inside(y) && inside(z) {
            Some(LocalPos::new(x as u8, y as u8, z as u8))
        } else {
            None
        }
    }
}
