//! Building footprint placement
//!
//! Alternate generation pipeline reusing the identical streaming protocol:
//! grid-aligned footprints at much lower density than scattered decoration,
//! grouped into settlements by coarse noise and restricted to flat ground.

use noise::{NoiseFn, Perlin};
use rayon::prelude::*;

use bytemuck::{Pod, Zeroable};

use crate::decor::config::DecorConfig;
use crate::decor::pipeline::{hash_2d, is_clipped, terrain_height, GenerationPipeline};
use crate::decor::uniform::DecorStreamParams;

/// Per-instance record for building footprints (32 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BuildingInstance {
    pub position: [f32; 3],
    /// Rotation around Y, always a quarter-turn multiple
    pub yaw: f32,
    /// Footprint half-extents along the local X/Z axes
    pub extent: [f32; 2],
    pub levels: u32,
    pub variant: u32,
}

/// Settlement noise above which a cell may host a building
const SETTLEMENT_THRESHOLD: f64 = 0.1;

/// Base placement probability inside a settlement
const PLACEMENT_PROBABILITY: f32 = 0.35;

/// Maximum corner-to-corner height difference for buildable ground
const FLAT_TOLERANCE: f32 = 1.5;

/// Grid-aligned building placement
pub struct BuildingPipeline {
    max_radius: u32,
    settlement: Perlin,
}

impl BuildingPipeline {
    pub fn new(config: &DecorConfig) -> Self {
        Self {
            max_radius: config.radius,
            settlement: Perlin::new(config.decor_seed.wrapping_add(0xB11D)),
        }
    }

    fn populate_cell(
        &self,
        params: &DecorStreamParams,
        cx: i32,
        cz: i32,
    ) -> Option<BuildingInstance> {
        let spacing = params.spacing[0];
        let center_x = (cx as f32 + 0.5) * spacing;
        let center_z = (cz as f32 + 0.5) * spacing;

        let settlement = self
            .settlement
            .get([center_x as f64 * 0.008, center_z as f64 * 0.008]);
        if settlement < SETTLEMENT_THRESHOLD {
            return None;
        }

        let roll = hash_2d(cx, cz, params.decor_seed.wrapping_add(0x5EED));
        if roll > PLACEMENT_PROBABILITY {
            return None;
        }

        let half = spacing * 0.5;
        let h = |dx: f32, dz: f32| {
            terrain_height(center_x + dx, center_z + dz, params.terrain_seed)
        };
        let corners = [
            h(-half, -half),
            h(half, -half),
            h(-half, half),
            h(half, half),
        ];
        let lowest = corners.iter().copied().fold(f32::INFINITY, f32::min);
        let highest = corners.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        if highest - lowest > FLAT_TOLERANCE {
            // Too steep to build on
            return None;
        }

        let py = lowest;
        if is_clipped([center_x, py, center_z], &params.clipping) {
            return None;
        }

        let turn = (hash_2d(cx, cz, params.decor_seed.wrapping_add(17)) * 4.0) as u32 % 4;
        let yaw = turn as f32 * std::f32::consts::FRAC_PI_2;
        let extent_x = (0.25 + hash_2d(cx, cz, params.decor_seed.wrapping_add(31)) * 0.15) * spacing;
        let extent_z = (0.25 + hash_2d(cx, cz, params.decor_seed.wrapping_add(43)) * 0.15) * spacing;
        let levels = 1 + (hash_2d(cx, cz, params.decor_seed.wrapping_add(59)) * 3.0) as u32;
        let variant = (hash_2d(cx, cz, params.decor_seed.wrapping_add(71)) * 255.0) as u32;

        Some(BuildingInstance {
            position: [center_x, py, center_z],
            yaw,
            extent: [extent_x, extent_z],
            levels,
            variant,
        })
    }
}

impl GenerationPipeline for BuildingPipeline {
    type Instance = BuildingInstance;

    fn label(&self) -> &'static str {
        "building"
    }

    fn max_instances(&self) -> u32 {
        let cells = 2 * self.max_radius + 1;
        cells * cells
    }

    fn populate(&self, params: &DecorStreamParams, radius: u32) -> Vec<BuildingInstance> {
        let spacing = params.spacing[0];
        if spacing <= 0.0 {
            log::warn!("building generation skipped: degenerate spacing {spacing}");
            return Vec::new();
        }
        let radius = radius.min(self.max_radius) as i32;

        let anchor_cx = (params.anchor[0] / spacing).round() as i32;
        let anchor_cz = (params.anchor[1] / spacing).round() as i32;

        (-radius..=radius)
            .into_par_iter()
            .flat_map_iter(|ix| {
                (-radius..=radius).filter_map(move |iz| {
                    self.populate_cell(params, anchor_cx + ix, anchor_cz + iz)
                })
            })
            .collect()
    }
}
