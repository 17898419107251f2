//! Section compiler: walks one 16³ section of a world slice, resolves cell geometry and
//! packages per-pass meshes with occlusion and bounds data.
#![forbid(unsafe_code)]

mod compiler;
mod config;
mod error;
mod resolve;
mod result;
mod seed;

pub use compiler::{CancellationSource, CompileRequest, NeverCancelled, SectionCompiler};
pub use config::CompileConfig;
pub use error::{CellFault, CompileError};
pub use resolve::{
    AttachedRenderers, FluidResolver, ModelResolver, NoAttachedRenderers, NoFluids, ResolveError,
    Resolvers, Shape,
};
pub use result::{AttachedEntry, RenderResult, Section};
pub use seed::variation_seed;
