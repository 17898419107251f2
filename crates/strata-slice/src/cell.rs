use std::sync::Arc;

use strata_geom::BlockPos;

pub type BlockId = u16;
pub type BlockState = u16;

/// How the standard model path treats a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RenderKind {
    /// Geometry comes from the model resolver.
    #[default]
    Model,
    /// No model geometry; fluid, attached objects and occlusion still apply.
    Invisible,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FluidState {
    pub fluid: u16,
    /// 1..=8, 8 being a full source cell.
    pub level: u8,
}

impl FluidState {
    pub const SOURCE_LEVEL: u8 = 8;

    #[inline]
    pub const fn source(fluid: u16) -> Self {
        Self {
            fluid,
            level: Self::SOURCE_LEVEL,
        }
    }
}

/// Static description of one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct CellState {
    pub block: BlockId,
    pub state: BlockState,
    pub render: RenderKind,
    pub opaque_full_cube: bool,
    pub has_attached: bool,
    pub fluid: Option<FluidState>,
}

impl CellState {
    pub const AIR: CellState = CellState {
        block: 0,
        state: 0,
        render: RenderKind::Invisible,
        opaque_full_cube: false,
        has_attached: false,
        fluid: None,
    };

    /// A modelled cell that neither occludes nor carries anything extra.
    #[inline]
    pub const fn model(block: BlockId, state: BlockState) -> Self {
        Self {
            block,
            state,
            render: RenderKind::Model,
            opaque_full_cube: false,
            has_attached: false,
            fluid: None,
        }
    }

    /// A modelled full opaque cube.
    #[inline]
    pub const fn opaque_cube(block: BlockId) -> Self {
        Self {
            opaque_full_cube: true,
            ..Self::model(block, 0)
        }
    }

    /// A cell with no model, only fluid.
    #[inline]
    pub const fn fluid_only(block: BlockId, fluid: FluidState) -> Self {
        Self {
            block,
            state: 0,
            render: RenderKind::Invisible,
            opaque_full_cube: false,
            has_attached: false,
            fluid: Some(fluid),
        }
    }

    #[inline]
    pub const fn with_fluid(self, fluid: FluidState) -> Self {
        Self {
            fluid: Some(fluid),
            ..self
        }
    }

    #[inline]
    pub const fn with_attached(self) -> Self {
        Self {
            has_attached: true,
            ..self
        }
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.block == Self::AIR.block
    }

    #[inline]
    pub fn has_model(&self) -> bool {
        self.render == RenderKind::Model
    }
}

/// Opaque per-position model data blob.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuxData(Option<Arc<[u8]>>);

impl AuxData {
    pub const EMPTY: AuxData = AuxData(None);

    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(Some(bytes.into()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.as_ref().is_none_or(|b| b.is_empty())
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.0.as_deref().unwrap_or(&[])
    }
}

/// Renderer-specific kind tag of an attached object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKind(pub u32);

/// A non-grid renderable anchored to a cell (chests, signs, banners, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachedObject {
    pub pos: BlockPos,
    pub kind: ObjectKind,
}

impl AttachedObject {
    #[inline]
    pub const fn new(pos: BlockPos, kind: ObjectKind) -> Self {
        Self { pos, kind }
    }
}
