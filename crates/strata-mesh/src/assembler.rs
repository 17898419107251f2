use crate::builder::{BufferError, CapacityPolicy, VertexBufferBuilder};
use crate::format::VertexFormat;
use crate::mesh::Mesh;
use crate::pass::{Material, RenderPass};
use crate::vertex::Vertex;

/// One vertex buffer per render pass, reused across section compiles.
#[derive(Debug)]
pub struct MeshAssembler {
    builders: [VertexBufferBuilder; RenderPass::COUNT],
    section_id: u32,
    clamped: usize,
}

impl MeshAssembler {
    pub fn new(format: VertexFormat, initial_capacity: usize, policy: CapacityPolicy) -> Self {
        Self {
            builders: std::array::from_fn(|_| {
                VertexBufferBuilder::new(format, initial_capacity, policy)
            }),
            section_id: 0,
            clamped: 0,
        }
    }

    /// Starts every pass's buffer for a compile of `section_id`.
    pub fn init(&mut self, section_id: u32) {
        self.section_id = section_id;
        self.clamped = 0;
        for b in &mut self.builders {
            b.start(section_id);
        }
    }

    #[inline]
    pub fn get(&mut self, pass: RenderPass) -> &mut VertexBufferBuilder {
        &mut self.builders[pass.index()]
    }

    #[inline]
    pub fn builder(&self, pass: RenderPass) -> &VertexBufferBuilder {
        &self.builders[pass.index()]
    }

    /// Routes one polygon to the buffer of `material.pass`.
    #[inline]
    pub fn push(&mut self, vertices: &[Vertex], material: Material) -> Result<(), BufferError> {
        let format = self.format();
        self.clamped += vertices
            .iter()
            .filter(|v| !format.represents_position(v.pos))
            .count();
        self.get(material.pass).push(vertices, material)
    }

    /// Vertices pushed since `init` whose position the format had to clamp.
    #[inline]
    pub fn clamped_vertices(&self) -> usize {
        self.clamped
    }

    /// Freezes a pass into a mesh; `None` when nothing was written to it.
    pub fn create_mesh(&self, pass: RenderPass) -> Option<Mesh> {
        let builder = self.builder(pass);
        if builder.is_empty() {
            return None;
        }
        Mesh::from_builder(pass, builder).ok()
    }

    /// True when no pass holds any vertex.
    pub fn is_empty(&self) -> bool {
        self.builders.iter().all(VertexBufferBuilder::is_empty)
    }

    #[inline]
    pub fn section_id(&self) -> u32 {
        self.section_id
    }

    #[inline]
    pub fn format(&self) -> VertexFormat {
        self.builders[0].format()
    }

    /// Releases every pass's allocation.
    pub fn destroy(&mut self) {
        for b in &mut self.builders {
            b.destroy();
        }
    }
}
