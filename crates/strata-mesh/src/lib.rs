//! CPU-side section mesh building: stride-packed vertex buffers per render pass,
//! translucency sorting, and the occlusion/bounds accumulators that travel with a mesh.
#![forbid(unsafe_code)]

mod assembler;
mod bounds;
mod builder;
mod constants;
mod face;
mod format;
mod mesh;
mod occlusion;
mod pass;
mod sort;
mod vertex;

pub use assembler::MeshAssembler;
pub use bounds::{BoundsBuilder, LocalBox, RenderBounds};
pub use builder::{BufferError, CapacityPolicy, VertexBufferBuilder};
pub use face::Face;
pub use format::VertexFormat;
pub use mesh::Mesh;
pub use occlusion::{OcclusionBuilder, OcclusionData};
pub use pass::{AlphaCutoff, Material, RenderPass};
pub use sort::sort_translucent;
pub use vertex::{Polygon, Vertex, box_face};
