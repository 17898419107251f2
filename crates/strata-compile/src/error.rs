use strata_geom::{BlockPos, LocalPos};
use strata_mesh::{BufferError, VertexFormat};
use strata_slice::CellState;
use thiserror::Error;

use crate::resolve::ResolveError;
use crate::result::Section;

/// What went wrong inside a single cell.
#[derive(Debug, Error)]
pub enum CellFault {
    #[error("model resolver failed: {0}")]
    Model(#[source] ResolveError),

    #[error("fluid resolver failed: {0}")]
    Fluid(#[source] ResolveError),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(
        "failed to render cell {local} (world {world}) of section {section}, state {state:?}, \
         slice volume {}..{}: {source}",
        .volume.0,
        .volume.1
    )]
    CellResolution {
        section: Section,
        local: LocalPos,
        world: BlockPos,
        state: CellState,
        volume: (BlockPos, BlockPos),
        #[source]
        source: CellFault,
    },

    #[error("slice volume {}..{} does not cover section {section}", .volume.0, .volume.1)]
    SliceOutOfRange {
        section: Section,
        volume: (BlockPos, BlockPos),
    },

    #[error("section id {:#x} of {section} does not fit the {format:?} vertex tag", .section.id)]
    SectionIdOutOfRange {
        section: Section,
        format: VertexFormat,
    },
}

impl CompileError {
    pub fn section(&self) -> Section {
        match self {
            CompileError::CellResolution { section, .. }
            | CompileError::SliceOutOfRange { section, .. }
            | CompileError::SectionIdOutOfRange { section, .. } => *section,
        }
    }
}
