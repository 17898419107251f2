use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use strata_geom::{BlockPos, LocalPos, SECTION_SIZE, Vec3};
use strata_mesh::{BoundsBuilder, MeshAssembler, OcclusionBuilder, RenderPass, sort_translucent};
use strata_slice::{CellState, WorldSlice};

use crate::config::CompileConfig;
use crate::error::{CellFault, CompileError};
use crate::resolve::Resolvers;
use crate::result::{AttachedEntry, RenderResult, Section};
use crate::seed::variation_seed;

/// Cooperative cancellation flag, polled before every y slice.
pub trait CancellationSource {
    fn is_cancelled(&self) -> bool;
}

impl CancellationSource for AtomicBool {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: CancellationSource + ?Sized> CancellationSource for Arc<T> {
    #[inline]
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Source that is never cancelled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancelled;

impl CancellationSource for NeverCancelled {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// One section compile.
#[derive(Clone, Copy)]
pub struct CompileRequest<'a> {
    pub section: Section,
    pub frame: u64,
    /// World-space camera position, used for translucency sorting.
    pub camera: Vec3,
    pub slice: &'a dyn WorldSlice,
}

/// Turns a world slice into a [`RenderResult`], one section at a time.
///
/// Holds only shared, read-only state; the mutable [`MeshAssembler`] is passed in per
/// compile so a single compiler can serve a whole worker pool.
#[derive(Clone, Debug)]
pub struct SectionCompiler {
    config: CompileConfig,
    resolvers: Resolvers,
}

impl SectionCompiler {
    pub fn new(config: CompileConfig, resolvers: Resolvers) -> Self {
        Self { config, resolvers }
    }

    #[inline]
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// An assembler matching this compiler's vertex format and capacity settings.
    pub fn new_assembler(&self) -> MeshAssembler {
        MeshAssembler::new(
            self.config.vertex_format,
            self.config.initial_capacity,
            self.config.capacity_policy,
        )
    }

    /// Compiles `req.section`. Returns `Ok(None)` when `cancel` fired before the last slice.
    ///
    /// `assembler` is reset at the start, so a compile that was cancelled or failed leaves
    /// nothing behind for the next one.
    pub fn compile(
        &self,
        req: &CompileRequest<'_>,
        assembler: &mut MeshAssembler,
        cancel: &dyn CancellationSource,
    ) -> Result<Option<RenderResult>, CompileError> {
        let t0 = Instant::now();
        let section = req.section;
        let slice = req.slice;
        let format = self.config.vertex_format;
        if !format.stores_section(section.id) {
            return Err(CompileError::SectionIdOutOfRange { section, format });
        }
        let volume = slice.volume();
        if !covers_section(volume, section) {
            return Err(CompileError::SliceOutOfRange { section, volume });
        }

        assembler.init(section.id);
        let mut occlusion = OcclusionBuilder::new();
        let mut bounds = BoundsBuilder::new();
        let mut attached = Vec::new();

        let n = SECTION_SIZE as u8;
        for y in 0..n {
            if cancel.is_cancelled() {
                log::trace!(target: "compile", "section {} cancelled before slice {}", section, y);
                return Ok(None);
            }
            for z in 0..n {
                for x in 0..n {
                    let local = LocalPos::new(x, y, z);
                    let world = local.to_world(section.pos);
                    let state = slice.cell_state(world);
                    if state.is_air() {
                        continue;
                    }

                    let rendered = self
                        .compile_cell(&state, local, world, slice, assembler, &mut attached)
                        .map_err(|source| CompileError::CellResolution {
                            section,
                            local,
                            world,
                            state,
                            volume,
                            source,
                        })?;

                    if state.opaque_full_cube {
                        occlusion.mark_closed(local);
                    }
                    if rendered {
                        bounds.add_block(local);
                    }
                }
            }
        }

        if assembler.clamped_vertices() > 0 {
            log::warn!(
                target: "compile",
                "section {}: {} vertices outside the {:?} position range were clamped",
                section,
                assembler.clamped_vertices(),
                format
            );
        }

        let camera = req.camera - section.pos.origin().as_vec3();
        let meshes = RenderPass::ALL.map(|pass| {
            let mesh = assembler.create_mesh(pass)?;
            if self.config.translucency_sorting && pass.is_translucent() {
                Some(sort_translucent(&mesh, camera))
            } else {
                Some(mesh)
            }
        });

        let result = RenderResult {
            section,
            frame: req.frame,
            meshes,
            occlusion: occlusion.build(),
            bounds: bounds.build(section.pos),
            attached,
        };
        log::debug!(
            target: "compile",
            "ms={} section={} frame={} vertices={} closed={} attached={}",
            t0.elapsed().as_millis(),
            section,
            req.frame,
            result.vertex_count(),
            result.occlusion.closed_count(),
            result.attached.len()
        );
        Ok(Some(result))
    }

    /// Emits every kind of geometry one cell has. Returns whether anything rendered.
    fn compile_cell(
        &self,
        state: &CellState,
        local: LocalPos,
        world: BlockPos,
        slice: &dyn WorldSlice,
        assembler: &mut MeshAssembler,
        attached: &mut Vec<AttachedEntry>,
    ) -> Result<bool, CellFault> {
        let offset = Vec3::new(f32::from(local.x), f32::from(local.y), f32::from(local.z));
        let aux = self.resolvers.aux.aux_data_or_empty(world);
        let mut rendered = false;

        if state.has_model() {
            let seed = variation_seed(world);
            let shapes = self
                .resolvers
                .model
                .resolve_shapes(state, world, seed, &aux)
                .map_err(CellFault::Model)?;
            for shape in &shapes {
                let poly = shape.polygon.translated(offset);
                assembler.push(poly.vertices(), shape.material)?;
            }
            rendered |= !shapes.is_empty();
        }

        if let Some(fluid) = &state.fluid {
            let polys = self
                .resolvers
                .fluid
                .resolve_fluid(fluid, world, &aux)
                .map_err(CellFault::Fluid)?;
            if !polys.is_empty() {
                let material = self.resolvers.fluid.fluid_material(fluid);
                for poly in &polys {
                    assembler.push(poly.translated(offset).vertices(), material)?;
                }
                rendered = true;
            }
        }

        if state.has_attached {
            if let Some(object) = slice.attached_object(world) {
                let renderers = &self.resolvers.attached;
                if renderers.has_renderer(&object) {
                    let fully_inside = !renderers.renders_outside_bounding_box(&object);
                    attached.push(AttachedEntry {
                        object,
                        fully_inside,
                    });
                    rendered = true;
                }
            }
        }

        Ok(rendered)
    }
}

fn covers_section((min, max): (BlockPos, BlockPos), section: Section) -> bool {
    let lo = section.pos.origin();
    let s = SECTION_SIZE as i32;
    let hi = lo.offset(s, s, s);
    min.x <= lo.x && min.y <= lo.y && min.z <= lo.z && max.x >= hi.x && max.y >= hi.y && max.z >= hi.z
}
