use strata_geom::{Aabb, LocalPos, SectionPos, Vec3};

/// Inclusive cell range inside one section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalBox {
    pub min: LocalPos,
    pub max: LocalPos,
}

impl LocalBox {
    #[inline]
    pub fn contains(&self, p: LocalPos) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
}

/// Tracks which cells of a section emitted geometry, as three per-axis occupancy masks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundsBuilder {
    x: u16,
    y: u16,
    z: u16,
}

#[inline]
fn span(mask: u16) -> (u8, u8) {
    (mask.trailing_zeros() as u8, (15 - mask.leading_zeros()) as u8)
}

impl BoundsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_block(&mut self, pos: LocalPos) {
        self.x |= 1 << pos.x;
        self.y |= 1 << pos.y;
        self.z |= 1 << pos.z;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x == 0
    }

    /// Smallest box containing every added cell, in section-local and world space.
    pub fn build(&self, section: SectionPos) -> RenderBounds {
        let origin = section.origin().as_vec3();
        if self.is_empty() {
            return RenderBounds {
                local: None,
                world: Aabb::point(origin),
            };
        }
        let (x0, x1) = span(self.x);
        let (y0, y1) = span(self.y);
        let (z0, z1) = span(self.z);
        let local = LocalBox {
            min: LocalPos::new(x0, y0, z0),
            max: LocalPos::new(x1, y1, z1),
        };
        let min = origin + Vec3::new(f32::from(x0), f32::from(y0), f32::from(z0));
        let max = origin + Vec3::new(f32::from(x1 + 1), f32::from(y1 + 1), f32::from(z1 + 1));
        RenderBounds {
            local: Some(local),
            world: Aabb::new(min, max),
        }
    }
}

/// Render bounds of one compiled section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderBounds {
    local: Option<LocalBox>,
    world: Aabb,
}

impl RenderBounds {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.local.is_none()
    }

    #[inline]
    pub fn local(&self) -> Option<LocalBox> {
        self.local
    }

    /// World-space box covering whole cells; degenerate at the section origin when empty.
    #[inline]
    pub fn world(&self) -> Aabb {
        self.world
    }
}
