use serde::{Deserialize, Serialize};

/// Geometry buckets, each drawn with its own pipeline state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPass {
    Solid = 0,
    Cutout = 1,
    CutoutMipped = 2,
    Translucent = 3,
    Tripwire = 4,
}

impl RenderPass {
    pub const COUNT: usize = 5;
    pub const ALL: [RenderPass; Self::COUNT] = [
        RenderPass::Solid,
        RenderPass::Cutout,
        RenderPass::CutoutMipped,
        RenderPass::Translucent,
        RenderPass::Tripwire,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Passes drawn with blending, whose geometry must be back-to-front ordered.
    #[inline]
    pub fn is_translucent(self) -> bool {
        matches!(self, RenderPass::Translucent | RenderPass::Tripwire)
    }
}

/// Fragment discard threshold applied by cutout materials.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaCutoff {
    #[default]
    None,
    Half,
    Tenth,
}

/// Render pass plus the shading parameters baked into every vertex of a batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Material {
    pub pass: RenderPass,
    pub alpha_cutoff: AlphaCutoff,
    pub mipped: bool,
}

impl Material {
    pub const SOLID: Material = Material::new(RenderPass::Solid, AlphaCutoff::None, true);
    pub const CUTOUT: Material = Material::new(RenderPass::Cutout, AlphaCutoff::Tenth, false);
    pub const CUTOUT_MIPPED: Material =
        Material::new(RenderPass::CutoutMipped, AlphaCutoff::Half, true);
    pub const TRANSLUCENT: Material =
        Material::new(RenderPass::Translucent, AlphaCutoff::None, true);
    pub const TRIPWIRE: Material = Material::new(RenderPass::Tripwire, AlphaCutoff::Tenth, true);

    #[inline]
    pub const fn new(pass: RenderPass, alpha_cutoff: AlphaCutoff, mipped: bool) -> Self {
        Self {
            pass,
            alpha_cutoff,
            mipped,
        }
    }

    /// Default material for a pass.
    pub const fn for_pass(pass: RenderPass) -> Self {
        match pass {
            RenderPass::Solid => Self::SOLID,
            RenderPass::Cutout => Self::CUTOUT,
            RenderPass::CutoutMipped => Self::CUTOUT_MIPPED,
            RenderPass::Translucent => Self::TRANSLUCENT,
            RenderPass::Tripwire => Self::TRIPWIRE,
        }
    }

    /// Packed shader flags: bits 0-1 alpha cutoff, bit 2 mipmapping.
    #[inline]
    pub fn bits(self) -> u8 {
        let cutoff = match self.alpha_cutoff {
            AlphaCutoff::None => 0u8,
            AlphaCutoff::Half => 1,
            AlphaCutoff::Tenth => 2,
        };
        cutoff | (u8::from(self.mipped) << 2)
    }
}
