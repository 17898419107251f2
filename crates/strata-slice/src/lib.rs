//! Read-only voxel data seen by a section compile: cell states, attached objects,
//! per-position model data, and an owned snapshot implementation.
#![forbid(unsafe_code)]

mod cell;
mod snapshot;

pub use cell::{
    AttachedObject, AuxData, BlockId, BlockState, CellState, FluidState, ObjectKind, RenderKind,
};
pub use snapshot::{SNAPSHOT_MARGIN, SectionSnapshot};

use hashbrown::HashMap;
use strata_geom::BlockPos;

/// Voxel data source queried by the compiler.
///
/// Implementations must answer for every cell of the section being compiled plus a
/// one-cell margin around it. Queries are synchronous and must not block on I/O; the
/// data is expected to have been captured before the compile started.
pub trait WorldSlice: Send + Sync {
    fn cell_state(&self, pos: BlockPos) -> CellState;

    fn attached_object(&self, pos: BlockPos) -> Option<AttachedObject>;

    /// Inclusive min / exclusive max of the region this slice can answer for.
    fn volume(&self) -> (BlockPos, BlockPos);
}

/// Per-position auxiliary model data. Missing entries read as [`AuxData::EMPTY`].
pub trait AuxDataSource: Send + Sync {
    fn aux_data(&self, pos: BlockPos) -> Option<AuxData>;

    #[inline]
    fn aux_data_or_empty(&self, pos: BlockPos) -> AuxData {
        self.aux_data(pos).unwrap_or(AuxData::EMPTY)
    }
}

impl AuxDataSource for HashMap<BlockPos, AuxData> {
    #[inline]
    fn aux_data(&self, pos: BlockPos) -> Option<AuxData> {
        self.get(&pos).cloned()
    }
}

/// Aux source for worlds that carry no per-position model data.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuxData;

impl AuxDataSource for NoAuxData {
    #[inline]
    fn aux_data(&self, _pos: BlockPos) -> Option<AuxData> {
        None
    }
}
