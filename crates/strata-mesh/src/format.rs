use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use strata_geom::Vec3;

use crate::constants::{COMPACT_POS_MIN, COMPACT_POS_RANGE};
use crate::pass::Material;
use crate::vertex::Vertex;

/// Byte layout of the vertex records written into section buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexFormat {
    /// Full-precision floats, 32 bytes per vertex.
    #[default]
    Standard,
    /// Quantized positions and UVs, 20 bytes per vertex. Positions must lie in
    /// `[-8, 24)` section-local units; UVs are clamped to `[0, 1]`.
    Compact,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct StandardVertex {
    pub pos: [f32; 3],
    pub color: [u8; 4],
    pub uv: [f32; 2],
    pub light: [u8; 2],
    pub material: u8,
    pub _pad: u8,
    pub section: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub(crate) struct CompactVertex {
    pub pos: [u16; 3],
    /// Low 16 bits of the section id.
    pub section: u16,
    pub color: [u8; 4],
    pub uv: [u16; 2],
    pub light: [u8; 2],
    pub material: u8,
    pub _pad: u8,
}

#[inline]
fn quantize_pos(v: f32) -> u16 {
    let t = (v - COMPACT_POS_MIN) / COMPACT_POS_RANGE;
    (t * f32::from(u16::MAX)).round().clamp(0.0, f32::from(u16::MAX)) as u16
}

#[inline]
fn dequantize_pos(q: u16) -> f32 {
    f32::from(q) / f32::from(u16::MAX) * COMPACT_POS_RANGE + COMPACT_POS_MIN
}

#[inline]
fn quantize_unit(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * f32::from(u16::MAX)).round() as u16
}

impl VertexFormat {
    /// Bytes per vertex record.
    #[inline]
    pub const fn stride(self) -> usize {
        match self {
            VertexFormat::Standard => size_of::<StandardVertex>(),
            VertexFormat::Compact => size_of::<CompactVertex>(),
        }
    }

    /// Appends exactly `self.stride()` bytes encoding `v` to `out`.
    pub fn encode(self, v: &Vertex, material: Material, section: u32, out: &mut Vec<u8>) {
        match self {
            VertexFormat::Standard => {
                let rec = StandardVertex {
                    pos: v.pos.into(),
                    color: v.color,
                    uv: v.uv,
                    light: v.light,
                    material: material.bits(),
                    _pad: 0,
                    section,
                };
                out.extend_from_slice(bytemuck::bytes_of(&rec));
            }
            VertexFormat::Compact => {
                let rec = CompactVertex {
                    pos: [
                        quantize_pos(v.pos.x),
                        quantize_pos(v.pos.y),
                        quantize_pos(v.pos.z),
                    ],
                    section: (section & self.section_mask()) as u16,
                    color: v.color,
                    uv: [quantize_unit(v.uv[0]), quantize_unit(v.uv[1])],
                    light: v.light,
                    material: material.bits(),
                    _pad: 0,
                };
                out.extend_from_slice(bytemuck::bytes_of(&rec));
            }
        }
    }

    /// Section-local position of one encoded record. `record` must be one stride long.
    pub fn decode_position(self, record: &[u8]) -> Vec3 {
        match self {
            VertexFormat::Standard => {
                let rec: StandardVertex = bytemuck::pod_read_unaligned(record);
                Vec3::from(rec.pos)
            }
            VertexFormat::Compact => {
                let rec: CompactVertex = bytemuck::pod_read_unaligned(record);
                Vec3::new(
                    dequantize_pos(rec.pos[0]),
                    dequantize_pos(rec.pos[1]),
                    dequantize_pos(rec.pos[2]),
                )
            }
        }
    }

    /// Section id tag of one encoded record, truncated to the width the format stores.
    pub fn decode_section(self, record: &[u8]) -> u32 {
        match self {
            VertexFormat::Standard => {
                let rec: StandardVertex = bytemuck::pod_read_unaligned(record);
                rec.section
            }
            VertexFormat::Compact => {
                let rec: CompactVertex = bytemuck::pod_read_unaligned(record);
                u32::from(rec.section)
            }
        }
    }

    /// Mask applied to section ids by this format.
    #[inline]
    pub const fn section_mask(self) -> u32 {
        match self {
            VertexFormat::Standard => u32::MAX,
            VertexFormat::Compact => u16::MAX as u32,
        }
    }

    /// True when `id` survives encoding without truncation.
    #[inline]
    pub const fn stores_section(self, id: u32) -> bool {
        id & !self.section_mask() == 0
    }

    /// True when `p` encodes without clamping.
    pub fn represents_position(self, p: Vec3) -> bool {
        match self {
            VertexFormat::Standard => true,
            VertexFormat::Compact => {
                let range = COMPACT_POS_MIN..COMPACT_POS_MIN + COMPACT_POS_RANGE;
                range.contains(&p.x) && range.contains(&p.y) && range.contains(&p.z)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::Material;

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), [10, 20, 30, 40], [0.25, 0.75], [7, 15])
    }

    #[test]
    fn strides_are_packed() {
        assert_eq!(VertexFormat::Standard.stride(), 32);
        assert_eq!(VertexFormat::Compact.stride(), 20);
    }

    #[test]
    fn standard_round_trips_position_and_tag() {
        let mut out = Vec::new();
        let f = VertexFormat::Standard;
        f.encode(&vertex(1.5, -2.0, 15.25), Material::SOLID, 0xDEAD_BEEF, &mut out);
        assert_eq!(out.len(), f.stride());
        assert_eq!(f.decode_position(&out), Vec3::new(1.5, -2.0, 15.25));
        assert_eq!(f.decode_section(&out), 0xDEAD_BEEF);
    }

    #[test]
    fn compact_position_error_is_bounded() {
        let f = VertexFormat::Compact;
        let step = COMPACT_POS_RANGE / f32::from(u16::MAX);
        for &(x, y, z) in &[(0.0, 0.0, 0.0), (16.0, 16.0, 16.0), (7.3, 0.1, 12.9), (-8.0, 23.9, 3.0)] {
            let mut out = Vec::new();
            f.encode(&vertex(x, y, z), Material::TRANSLUCENT, 0x1_2345, &mut out);
            assert_eq!(out.len(), f.stride());
            let p = f.decode_position(&out);
            assert!((p.x - x).abs() <= step);
            assert!((p.y - y).abs() <= step);
            assert!((p.z - z).abs() <= step);
            assert_eq!(f.decode_section(&out), 0x2345);
        }
    }

    #[test]
    fn compact_section_ids_are_sixteen_bits() {
        assert!(VertexFormat::Compact.stores_section(0xFFFF));
        assert!(!VertexFormat::Compact.stores_section(0x1_0011));
        assert!(VertexFormat::Standard.stores_section(u32::MAX));
    }

    #[test]
    fn compact_position_range_is_half_open() {
        let f = VertexFormat::Compact;
        assert!(f.represents_position(Vec3::new(-8.0, 0.0, 23.99)));
        assert!(!f.represents_position(Vec3::new(0.0, 27.0, 0.0)));
        assert!(!f.represents_position(Vec3::new(-8.5, 0.0, 0.0)));
        assert!(VertexFormat::Standard.represents_position(Vec3::new(1e6, -1e6, 0.0)));
    }
}
