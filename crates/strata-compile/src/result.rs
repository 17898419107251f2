use std::fmt;

use strata_geom::SectionPos;
use strata_mesh::{Mesh, OcclusionData, RenderBounds, RenderPass};
use strata_slice::AttachedObject;

/// Identity of the section being compiled. `id` is written into every vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Section {
    pub pos: SectionPos,
    pub id: u32,
}

impl Section {
    #[inline]
    pub const fn new(pos: SectionPos, id: u32) -> Self {
        Self { pos, id }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.pos, self.id)
    }
}

/// An attached object found during the compile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachedEntry {
    pub object: AttachedObject,
    /// The renderer stays within the object's cell, so section culling applies to it.
    pub fully_inside: bool,
}

/// Everything one completed compile produced for one section.
#[derive(Clone, Debug)]
pub struct RenderResult {
    pub section: Section,
    /// Frame the compile was requested on; newer frames supersede older results.
    pub frame: u64,
    pub(crate) meshes: [Option<Mesh>; RenderPass::COUNT],
    pub occlusion: OcclusionData,
    pub bounds: RenderBounds,
    pub attached: Vec<AttachedEntry>,
}

impl RenderResult {
    #[inline]
    pub fn mesh(&self, pass: RenderPass) -> Option<&Mesh> {
        self.meshes[pass.index()].as_ref()
    }

    /// Passes that produced geometry, in pass order.
    pub fn meshes(&self) -> impl Iterator<Item = &Mesh> + '_ {
        self.meshes.iter().flatten()
    }

    /// True when no pass has geometry and no attached object was registered.
    pub fn is_empty(&self) -> bool {
        self.meshes.iter().all(Option::is_none) && self.attached.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes().map(Mesh::vertex_count).sum()
    }
}
