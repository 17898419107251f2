//! Shared constants for strata-mesh.

// Bitset configuration (u64-based), one bit per section cell
pub(crate) const BITS_PER_WORD: usize = 64;
pub(crate) const WORD_INDEX_SHIFT: usize = 6; // log2(64)
pub(crate) const WORD_INDEX_MASK: usize = 63; // (1<<6) - 1
pub(crate) const CELL_WORDS: usize = strata_geom::SECTION_CELLS / BITS_PER_WORD;

/// Below this many closed cells every face is treated as seeing every other face;
/// flood filling such a sparse section buys nothing.
pub(crate) const MIN_CLOSED_FOR_FLOOD: usize = 256;

/// Compact format stores positions as u16 over this span, starting at `COMPACT_POS_MIN`.
pub(crate) const COMPACT_POS_MIN: f32 = -8.0;
pub(crate) const COMPACT_POS_RANGE: f32 = 32.0;
