//! Noise terrain and simple resolvers used by the CLI to exercise the compiler.

use std::sync::Arc;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_compile::{
    AttachedRenderers, FluidResolver, ModelResolver, ResolveError, Resolvers, Shape,
    variation_seed,
};
use strata_geom::{BlockPos, SectionPos, Vec3};
use strata_mesh::{Face, Material, Polygon, Vertex, box_face};
use strata_slice::{
    AttachedObject, AuxData, BlockId, CellState, FluidState, ObjectKind, RenderKind,
    SectionSnapshot,
};

pub const STONE: BlockId = 1;
pub const DIRT: BlockId = 2;
pub const GRASS: BlockId = 3;
pub const SAND: BlockId = 4;
pub const GLASS: BlockId = 5;
pub const FLOWER: BlockId = 6;
pub const WATER: BlockId = 7;
pub const CHEST: BlockId = 8;

pub const WATER_FLUID: u16 = 1;
pub const CHEST_KIND: ObjectKind = ObjectKind(1);

const BASE_HEIGHT: i32 = 16;
const HEIGHT_AMPLITUDE: f32 = 10.0;
const SEA_LEVEL: i32 = 14;
const FULL_LIGHT: [u8; 2] = [0, 15];

pub struct DemoWorld {
    terrain: FastNoiseLite,
}

impl DemoWorld {
    pub fn new(seed: i32) -> Self {
        let mut terrain = FastNoiseLite::with_seed(seed);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(0.02));
        Self { terrain }
    }

    fn height(&self, x: i32, z: i32) -> i32 {
        let n = self.terrain.get_noise_2d(x as f32, z as f32);
        BASE_HEIGHT + (n * HEIGHT_AMPLITUDE).round() as i32
    }

    pub fn cell_at(&self, pos: BlockPos) -> CellState {
        let h = self.height(pos.x, pos.z);
        let beach = h <= SEA_LEVEL + 1;
        if pos.y < h - 3 {
            CellState::opaque_cube(STONE)
        } else if pos.y < h {
            CellState::opaque_cube(if beach { SAND } else { DIRT })
        } else if pos.y == h {
            CellState::opaque_cube(if beach { SAND } else { GRASS })
        } else if pos.y <= SEA_LEVEL {
            CellState::fluid_only(WATER, FluidState::source(WATER_FLUID))
        } else if pos.y == h + 1 {
            decoration(variation_seed(pos))
        } else {
            CellState::AIR
        }
    }

    /// Captures `section` plus its margin, with chests registered as attached objects.
    pub fn snapshot(&self, section: SectionPos) -> SectionSnapshot {
        let mut chests = Vec::new();
        let mut snap = SectionSnapshot::from_fn(section, |p| {
            let c = self.cell_at(p);
            if c.has_attached {
                chests.push(p);
            }
            c
        });
        for pos in chests {
            snap.insert_attached(AttachedObject::new(pos, CHEST_KIND));
        }
        snap
    }
}

fn decoration(seed: u64) -> CellState {
    match seed % 211 {
        0..=9 => CellState::model(FLOWER, (seed >> 8) as u16 & 3),
        10 => CellState {
            block: CHEST,
            render: RenderKind::Invisible,
            has_attached: true,
            ..CellState::AIR
        },
        11 | 12 => CellState::model(GLASS, 0),
        _ => CellState::AIR,
    }
}

fn face_shade(face: Face) -> f32 {
    match face {
        Face::PosY => 1.0,
        Face::NegY => 0.5,
        Face::PosX | Face::NegX => 0.6,
        Face::PosZ | Face::NegZ => 0.8,
    }
}

fn shaded(rgb: [u8; 3], alpha: u8, face: Face) -> [u8; 4] {
    let s = face_shade(face);
    let c = |v: u8| (f32::from(v) * s) as u8;
    [c(rgb[0]), c(rgb[1]), c(rgb[2]), alpha]
}

fn neighbour(pos: BlockPos, face: Face) -> BlockPos {
    let (dx, dy, dz) = face.delta();
    pos.offset(dx, dy, dz)
}

const UNIT_MIN: Vec3 = Vec3::ZERO;
const UNIT_MAX: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// Cube and cross models; faces against opaque neighbours are culled.
pub struct DemoModels {
    world: Arc<DemoWorld>,
}

impl DemoModels {
    pub fn new(world: Arc<DemoWorld>) -> Self {
        Self { world }
    }

    fn cube(&self, pos: BlockPos, block: BlockId) -> Vec<Shape> {
        let mut out = Vec::with_capacity(Face::COUNT);
        for face in Face::ALL {
            let n = self.world.cell_at(neighbour(pos, face));
            if n.opaque_full_cube {
                continue;
            }
            let (rgb, material, alpha) = match block {
                GRASS if face == Face::PosY => ([96, 168, 64], Material::SOLID, 255),
                GRASS | DIRT => ([134, 96, 67], Material::SOLID, 255),
                SAND => ([219, 207, 163], Material::SOLID, 255),
                GLASS => {
                    if n.block == GLASS {
                        continue;
                    }
                    ([200, 230, 255], Material::TRANSLUCENT, 96)
                }
                _ => ([128, 128, 128], Material::SOLID, 255),
            };
            out.push(Shape::new(
                material,
                box_face(face, UNIT_MIN, UNIT_MAX, shaded(rgb, alpha, face), FULL_LIGHT),
            ));
        }
        out
    }

    fn cross(seed: u64, variant: u16) -> Vec<Shape> {
        // Random horizontal jitter in [-0.25, 0.25]
        let jitter = |bits: u64| ((bits & 0xf) as f32 / 15.0 - 0.5) * 0.5;
        let (ox, oz) = (jitter(seed >> 16), jitter(seed >> 24));
        let rgb: [[u8; 3]; 4] = [[220, 40, 40], [240, 220, 60], [160, 80, 220], [250, 250, 250]];
        let color = {
            let c = rgb[usize::from(variant & 3)];
            [c[0], c[1], c[2], 255]
        };
        let v = |x: f32, y: f32, z: f32, u: f32, w: f32| {
            Vertex::new(Vec3::new(x + ox, y, z + oz), color, [u, w], FULL_LIGHT)
        };
        let a = Polygon::quad([
            v(0.15, 1.0, 0.15, 0.0, 0.0),
            v(0.15, 0.0, 0.15, 0.0, 1.0),
            v(0.85, 0.0, 0.85, 1.0, 1.0),
            v(0.85, 1.0, 0.85, 1.0, 0.0),
        ]);
        let b = Polygon::quad([
            v(0.15, 1.0, 0.85, 0.0, 0.0),
            v(0.15, 0.0, 0.85, 0.0, 1.0),
            v(0.85, 0.0, 0.15, 1.0, 1.0),
            v(0.85, 1.0, 0.15, 1.0, 0.0),
        ]);
        vec![
            Shape::new(Material::CUTOUT_MIPPED, a),
            Shape::new(Material::CUTOUT_MIPPED, b),
        ]
    }
}

impl ModelResolver for DemoModels {
    fn resolve_shapes(
        &self,
        state: &CellState,
        pos: BlockPos,
        seed: u64,
        _aux: &AuxData,
    ) -> Result<Vec<Shape>, ResolveError> {
        match state.block {
            STONE | DIRT | GRASS | SAND | GLASS => Ok(self.cube(pos, state.block)),
            FLOWER => Ok(Self::cross(seed, state.state)),
            other => Err(format!("no model for block {other}").into()),
        }
    }
}

/// Flat water surfaces at a height set by the fluid level.
pub struct DemoFluids {
    world: Arc<DemoWorld>,
}

impl DemoFluids {
    pub fn new(world: Arc<DemoWorld>) -> Self {
        Self { world }
    }
}

impl FluidResolver for DemoFluids {
    fn fluid_material(&self, _fluid: &FluidState) -> Material {
        Material::TRANSLUCENT
    }

    fn resolve_fluid(
        &self,
        fluid: &FluidState,
        pos: BlockPos,
        _aux: &AuxData,
    ) -> Result<Vec<Polygon>, ResolveError> {
        let covered = self.world.cell_at(neighbour(pos, Face::PosY)).fluid.is_some();
        let top = if covered {
            1.0
        } else {
            f32::from(fluid.level) / f32::from(FluidState::SOURCE_LEVEL) * 0.875
        };
        let max = Vec3::new(1.0, top, 1.0);
        let mut out = Vec::new();
        for face in Face::ALL {
            let n = self.world.cell_at(neighbour(pos, face));
            if n.opaque_full_cube || n.fluid.is_some() {
                continue;
            }
            out.push(box_face(face, UNIT_MIN, max, shaded([48, 96, 220], 160, face), FULL_LIGHT));
        }
        Ok(out)
    }
}

pub struct DemoRenderers;

impl AttachedRenderers for DemoRenderers {
    fn has_renderer(&self, object: &AttachedObject) -> bool {
        object.kind == CHEST_KIND
    }

    fn renders_outside_bounding_box(&self, _object: &AttachedObject) -> bool {
        false
    }
}

pub fn resolvers(world: Arc<DemoWorld>) -> Resolvers {
    Resolvers::new(Arc::new(DemoModels::new(world.clone())))
        .with_fluid(Arc::new(DemoFluids::new(world)))
        .with_attached(Arc::new(DemoRenderers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_layered() {
        let world = DemoWorld::new(1337);
        for (x, z) in [(0, 0), (40, -17), (-300, 5)] {
            let h = world.height(x, z);
            let top = world.cell_at(BlockPos::new(x, h, z));
            assert!(top.opaque_full_cube);
            assert!(matches!(top.block, GRASS | SAND));
            assert_eq!(world.cell_at(BlockPos::new(x, h - 10, z)).block, STONE);
            let above = world.cell_at(BlockPos::new(x, h + 2, z));
            assert!(above.is_air() || above.fluid.is_some());
        }
    }

    #[test]
    fn snapshot_registers_every_chest() {
        let world = DemoWorld::new(7);
        let snap = world.snapshot(SectionPos::new(0, 1, 0));
        let (min, max) = strata_slice::WorldSlice::volume(&snap);
        let mut chests = 0;
        for y in min.y..max.y {
            for z in min.z..max.z {
                for x in min.x..max.x {
                    if world.cell_at(BlockPos::new(x, y, z)).has_attached {
                        chests += 1;
                    }
                }
            }
        }
        assert_eq!(snap.attached_count(), chests);
    }

    #[test]
    fn buried_stone_is_fully_culled() {
        let world = Arc::new(DemoWorld::new(99));
        let models = DemoModels::new(world.clone());
        let h = world.height(3, 3);
        let pos = BlockPos::new(3, h - 8, 3);
        let state = world.cell_at(pos);
        let shapes = models
            .resolve_shapes(&state, pos, variation_seed(pos), &AuxData::EMPTY)
            .unwrap();
        assert!(shapes.is_empty());
    }

    #[test]
    fn flowers_are_two_cutout_quads() {
        let shapes = DemoModels::cross(0xDEAD_BEEF, 1);
        assert_eq!(shapes.len(), 2);
        for s in &shapes {
            assert_eq!(s.material, Material::CUTOUT_MIPPED);
            assert_eq!(s.polygon.vertices().len(), 4);
        }
    }

    #[test]
    fn unknown_block_is_an_error() {
        let models = DemoModels::new(Arc::new(DemoWorld::new(0)));
        let res = models.resolve_shapes(
            &CellState::model(200, 0),
            BlockPos::new(0, 0, 0),
            0,
            &AuxData::EMPTY,
        );
        assert!(res.is_err());
    }
}
