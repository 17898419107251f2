use serde::{Deserialize, Serialize};
use strata_mesh::{CapacityPolicy, VertexFormat};

/// Per-compile knobs, usually read from the `[compile]` table of `strata.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Sort translucent passes back to front after meshing.
    pub translucency_sorting: bool,
    pub vertex_format: VertexFormat,
    /// Starting capacity of every pass buffer, in vertices.
    pub initial_capacity: usize,
    pub capacity_policy: CapacityPolicy,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            translucency_sorting: true,
            vertex_format: VertexFormat::Standard,
            initial_capacity: 4096,
            capacity_policy: CapacityPolicy::ResetToInitial,
        }
    }
}
