use std::sync::Arc;

use crate::builder::{BufferError, VertexBufferBuilder};
use crate::format::VertexFormat;
use crate::pass::RenderPass;

/// Finalized vertex data of one render pass of one section.
///
/// Never mutated after creation; byte length is always `vertex_count * stride`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mesh {
    pass: RenderPass,
    format: VertexFormat,
    vertex_count: usize,
    data: Arc<[u8]>,
    groups: Arc<[u8]>,
}

impl Mesh {
    /// Copies the builder's written bytes into a new immutable mesh.
    pub fn from_builder(pass: RenderPass, builder: &VertexBufferBuilder) -> Result<Self, BufferError> {
        let bytes = builder.slice()?;
        Ok(Self {
            pass,
            format: builder.format(),
            vertex_count: builder.count(),
            data: Arc::from(bytes),
            groups: Arc::from(builder.groups()),
        })
    }

    /// Rebuilds a mesh of the same pass and format from reordered parts.
    pub(crate) fn with_contents(&self, data: Vec<u8>, groups: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        debug_assert_eq!(groups.len(), self.groups.len());
        Self {
            pass: self.pass,
            format: self.format,
            vertex_count: self.vertex_count,
            data: data.into(),
            groups: groups.into(),
        }
    }

    #[inline]
    pub fn pass(&self) -> RenderPass {
        self.pass
    }

    #[inline]
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.format.stride()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Vertices per polygon, in buffer order.
    #[inline]
    pub fn groups(&self) -> &[u8] {
        &self.groups
    }

    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.groups.len()
    }

    /// Encoded bytes of vertex `i`.
    #[inline]
    pub fn vertex(&self, i: usize) -> &[u8] {
        let s = self.stride();
        &self.data[i * s..(i + 1) * s]
    }
}
