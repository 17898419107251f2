use strata_geom::{LocalPos, SECTION_CELLS};

use crate::constants::{BITS_PER_WORD, CELL_WORDS, MIN_CLOSED_FOR_FLOOD, WORD_INDEX_MASK, WORD_INDEX_SHIFT};
use crate::face::Face;

#[inline]
fn bit_get(words: &[u64; CELL_WORDS], i: usize) -> bool {
    (words[i >> WORD_INDEX_SHIFT] >> (i & WORD_INDEX_MASK)) & 1 != 0
}

#[inline]
fn bit_set(words: &mut [u64; CELL_WORDS], i: usize) {
    words[i >> WORD_INDEX_SHIFT] |= 1u64 << (i & WORD_INDEX_MASK);
}

#[inline]
fn pair_bit(from: Face, to: Face) -> u64 {
    1u64 << (from.index() * Face::COUNT + to.index())
}

const ALL_VISIBLE: u64 = (1u64 << (Face::COUNT * Face::COUNT)) - 1;

/// Collects the fully opaque cells of one section.
#[derive(Clone, Debug)]
pub struct OcclusionBuilder {
    closed: [u64; CELL_WORDS],
    closed_count: usize,
}

impl Default for OcclusionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OcclusionBuilder {
    pub fn new() -> Self {
        Self {
            closed: [0; CELL_WORDS],
            closed_count: 0,
        }
    }

    /// Records `pos` as a fully opaque unit cube. Marking twice is a no-op.
    #[inline]
    pub fn mark_closed(&mut self, pos: LocalPos) {
        let i = pos.index();
        if !bit_get(&self.closed, i) {
            bit_set(&mut self.closed, i);
            self.closed_count += 1;
        }
    }

    #[inline]
    pub fn closed_count(&self) -> usize {
        self.closed_count
    }

    pub fn build(&self) -> OcclusionData {
        let visibility = if self.closed_count < MIN_CLOSED_FOR_FLOOD {
            ALL_VISIBLE
        } else if self.closed_count == SECTION_CELLS {
            0
        } else {
            self.flood_visibility()
        };
        OcclusionData {
            closed: self.closed,
            closed_count: self.closed_count,
            visibility,
        }
    }

    /// Flood fills every open region that touches the section boundary; each region links
    /// all the boundary faces it reaches.
    fn flood_visibility(&self) -> u64 {
        let mut visited = self.closed;
        let mut stack: Vec<LocalPos> = Vec::with_capacity(SECTION_CELLS / 4);
        let mut visibility = 0u64;

        for start in 0..SECTION_CELLS {
            if bit_get(&visited, start) {
                continue;
            }
            let start = LocalPos::from_index(start);
            if !start.is_on_edge() {
                continue;
            }

            let mut touched = 0u8;
            bit_set(&mut visited, start.index());
            stack.push(start);
            while let Some(p) = stack.pop() {
                for face in Face::ALL {
                    match face.step(p) {
                        Some(n) => {
                            let ni = n.index();
                            if !bit_get(&visited, ni) {
                                bit_set(&mut visited, ni);
                                stack.push(n);
                            }
                        }
                        None => touched |= 1 << face.index(),
                    }
                }
            }

            for from in Face::ALL {
                if touched & (1 << from.index()) == 0 {
                    continue;
                }
                for to in Face::ALL {
                    if touched & (1 << to.index()) != 0 {
                        visibility |= pair_bit(from, to);
                    }
                }
            }
        }
        visibility
    }
}

/// Immutable occlusion descriptor of one compiled section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OcclusionData {
    closed: [u64; CELL_WORDS],
    closed_count: usize,
    /// Bit `from * 6 + to` set when `to` can be seen entering through `from`.
    visibility: u64,
}

impl Default for OcclusionData {
    fn default() -> Self {
        OcclusionBuilder::new().build()
    }
}

impl OcclusionData {
    #[inline]
    pub fn is_closed(&self, pos: LocalPos) -> bool {
        bit_get(&self.closed, pos.index())
    }

    #[inline]
    pub fn closed_count(&self) -> usize {
        self.closed_count
    }

    #[inline]
    pub fn is_visible_through(&self, from: Face, to: Face) -> bool {
        self.visibility & pair_bit(from, to) != 0
    }

    /// True when every cell is closed.
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.closed_count == SECTION_CELLS
    }

    /// Iterates the closed cells in index order.
    pub fn closed_cells(&self) -> impl Iterator<Item = LocalPos> + '_ {
        self.closed.iter().enumerate().flat_map(|(w, &word)| {
            (0..BITS_PER_WORD)
                .filter(move |b| (word >> b) & 1 != 0)
                .map(move |b| LocalPos::from_index(w * BITS_PER_WORD + b))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_geom::SECTION_SIZE;

    fn fill(b: &mut OcclusionBuilder, pred: impl Fn(u8, u8, u8) -> bool) {
        let n = SECTION_SIZE as u8;
        for y in 0..n {
            for z in 0..n {
                for x in 0..n {
                    if pred(x, y, z) {
                        b.mark_closed(LocalPos::new(x, y, z));
                    }
                }
            }
        }
    }

    #[test]
    fn empty_section_sees_everything() {
        let data = OcclusionBuilder::new().build();
        assert_eq!(data.closed_count(), 0);
        for a in Face::ALL {
            for b in Face::ALL {
                assert!(data.is_visible_through(a, b));
            }
        }
    }

    #[test]
    fn solid_section_sees_nothing() {
        let mut b = OcclusionBuilder::new();
        fill(&mut b, |_, _, _| true);
        let data = b.build();
        assert!(data.is_solid());
        for a in Face::ALL {
            for c in Face::ALL {
                assert!(!data.is_visible_through(a, c));
            }
        }
    }

    #[test]
    fn horizontal_wall_splits_top_from_bottom() {
        let mut b = OcclusionBuilder::new();
        fill(&mut b, |_, y, _| y == 8);
        let data = b.build();
        assert_eq!(data.closed_count(), 256);
        assert!(!data.is_visible_through(Face::PosY, Face::NegY));
        assert!(!data.is_visible_through(Face::NegY, Face::PosY));
        assert!(data.is_visible_through(Face::PosY, Face::PosX));
        assert!(data.is_visible_through(Face::NegY, Face::NegZ));
        assert!(data.is_visible_through(Face::PosX, Face::NegX));
        assert!(data.is_visible_through(Face::PosY, Face::PosY));
    }

    #[test]
    fn sparse_section_skips_flood_fill() {
        let mut b = OcclusionBuilder::new();
        // 255 closed cells: a full wall minus one
        fill(&mut b, |x, y, z| y == 8 && !(x == 0 && z == 0));
        let data = b.build();
        assert_eq!(data.closed_count(), 255);
        assert!(data.is_visible_through(Face::PosY, Face::NegY));
    }

    #[test]
    fn marking_is_idempotent() {
        let mut b = OcclusionBuilder::new();
        let p = LocalPos::new(3, 4, 5);
        b.mark_closed(p);
        b.mark_closed(p);
        let data = b.build();
        assert_eq!(data.closed_count(), 1);
        assert!(data.is_closed(p));
        assert!(!data.is_closed(LocalPos::new(5, 4, 3)));
        assert_eq!(data.closed_cells().collect::<Vec<_>>(), vec![p]);
    }
}
