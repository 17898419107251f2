use std::error::Error;
use std::sync::Arc;

use strata_geom::BlockPos;
use strata_mesh::{Material, Polygon};
use strata_slice::{AttachedObject, AuxData, AuxDataSource, CellState, FluidState, NoAuxData};

/// Fault raised by a model or fluid resolver.
pub type ResolveError = Box<dyn Error + Send + Sync + 'static>;

/// One polygon of a cell's model together with the material it renders with.
///
/// Vertex positions are relative to the cell's minimum corner; the compiler moves them
/// into section space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shape {
    pub material: Material,
    pub polygon: Polygon,
}

impl Shape {
    #[inline]
    pub fn new(material: Material, polygon: Polygon) -> Self {
        Self { material, polygon }
    }
}

/// Turns a cell state into model geometry.
pub trait ModelResolver: Send + Sync {
    /// `seed` is [`crate::variation_seed`] of `pos`; `aux` is the per-position model
    /// data, [`AuxData::EMPTY`] when the source has none.
    fn resolve_shapes(
        &self,
        state: &CellState,
        pos: BlockPos,
        seed: u64,
        aux: &AuxData,
    ) -> Result<Vec<Shape>, ResolveError>;
}

/// Turns a fluid component into geometry. An empty result means nothing to draw.
pub trait FluidResolver: Send + Sync {
    fn fluid_material(&self, fluid: &FluidState) -> Material;

    fn resolve_fluid(
        &self,
        fluid: &FluidState,
        pos: BlockPos,
        aux: &AuxData,
    ) -> Result<Vec<Polygon>, ResolveError>;
}

/// Registry of renderers for attached objects.
pub trait AttachedRenderers: Send + Sync {
    fn has_renderer(&self, object: &AttachedObject) -> bool;

    /// True when the object's renderer may draw past its cell's box.
    fn renders_outside_bounding_box(&self, object: &AttachedObject) -> bool;
}

/// Fluid resolver for worlds without fluids.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFluids;

impl FluidResolver for NoFluids {
    fn fluid_material(&self, _fluid: &FluidState) -> Material {
        Material::TRANSLUCENT
    }

    fn resolve_fluid(
        &self,
        _fluid: &FluidState,
        _pos: BlockPos,
        _aux: &AuxData,
    ) -> Result<Vec<Polygon>, ResolveError> {
        Ok(Vec::new())
    }
}

/// Registry with no renderers; attached objects are never drawn.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAttachedRenderers;

impl AttachedRenderers for NoAttachedRenderers {
    fn has_renderer(&self, _object: &AttachedObject) -> bool {
        false
    }

    fn renders_outside_bounding_box(&self, _object: &AttachedObject) -> bool {
        false
    }
}

/// Every external source a compile queries besides the world slice.
#[derive(Clone)]
pub struct Resolvers {
    pub model: Arc<dyn ModelResolver>,
    pub fluid: Arc<dyn FluidResolver>,
    pub attached: Arc<dyn AttachedRenderers>,
    pub aux: Arc<dyn AuxDataSource>,
}

impl Resolvers {
    /// Model resolver only; no fluids, attached renderers or aux data.
    pub fn new(model: Arc<dyn ModelResolver>) -> Self {
        Self {
            model,
            fluid: Arc::new(NoFluids),
            attached: Arc::new(NoAttachedRenderers),
            aux: Arc::new(NoAuxData),
        }
    }

    pub fn with_fluid(mut self, fluid: Arc<dyn FluidResolver>) -> Self {
        self.fluid = fluid;
        self
    }

    pub fn with_attached(mut self, attached: Arc<dyn AttachedRenderers>) -> Self {
        self.attached = attached;
        self
    }

    pub fn with_aux(mut self, aux: Arc<dyn AuxDataSource>) -> Self {
        self.aux = aux;
        self
    }
}

impl std::fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolvers").finish_non_exhaustive()
    }
}
