//! Scattered decoration placement (vegetation, debris)
//!
//! Places jittered instances per grid cell, gated by cluster noise so
//! growth comes in natural patches instead of a uniform carpet. Placement
//! hashes absolute cell indices, so existing instances stay put when the
//! anchor moves and the surrounding ring regenerates.

use noise::{NoiseFn, Perlin};
use rayon::prelude::*;

use bytemuck::{Pod, Zeroable};

use crate::decor::config::DecorConfig;
use crate::decor::pipeline::{hash_2d, is_clipped, terrain_height, GenerationPipeline};
use crate::decor::uniform::DecorStreamParams;

/// Per-instance record for scattered decoration (32 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ScatterInstance {
    pub position: [f32; 3],
    /// Rotation around Y in radians
    pub yaw: f32,
    pub scale: f32,
    pub variant: u32,
    pub _pad: [f32; 2],
}

/// Cluster density below which a cell is skipped entirely
const CLUSTER_FLOOR: f64 = -0.55;

/// Jittered vegetation-style placement
pub struct ScatterPipeline {
    density: u32,
    max_radius: u32,
    cluster: Perlin,
}

impl ScatterPipeline {
    pub fn new(config: &DecorConfig) -> Self {
        Self {
            density: config.density,
            max_radius: config.radius,
            cluster: Perlin::new(config.decor_seed),
        }
    }

    /// Cluster field in [0, 1]: Perlin patches blended with fine hash noise
    fn cluster_at(&self, x: f32, z: f32, terrain_seed: u32) -> f32 {
        let patches = self.cluster.get([x as f64 * 0.03, z as f64 * 0.03]) as f32;
        let fine = crate::decor::pipeline::smooth_noise(x, z, 8.0, terrain_seed);
        let blended = (patches * 0.5 + 0.5) * 0.6 + fine * 0.4;
        blended.clamp(0.0, 1.0)
    }

    fn populate_cell(
        &self,
        params: &DecorStreamParams,
        cx: i32,
        cz: i32,
        out: &mut Vec<ScatterInstance>,
    ) {
        let spacing = params.spacing[0];
        let cell_x = cx as f32 * spacing;
        let cell_z = cz as f32 * spacing;

        let raw = self.cluster.get([cell_x as f64 * 0.03, cell_z as f64 * 0.03]);
        if raw < CLUSTER_FLOOR {
            // Bare patch
            return;
        }
        let cluster = self.cluster_at(cell_x, cell_z, params.terrain_seed);

        for slot in 0..params.density as u32 {
            let salt = params.decor_seed.wrapping_add(slot.wrapping_mul(1000));

            let place_roll = hash_2d(cx, cz, salt);
            if place_roll > cluster * 1.2 {
                continue;
            }

            let jx = hash_2d(cx, cz, salt.wrapping_add(13));
            let jz = hash_2d(cx, cz, salt.wrapping_add(29));
            let px = cell_x + jx * spacing;
            let pz = cell_z + jz * spacing;
            let py = terrain_height(px, pz, params.terrain_seed);

            if is_clipped([px, py, pz], &params.clipping) {
                continue;
            }

            let yaw = hash_2d(cx, cz, salt.wrapping_add(47)) * std::f32::consts::TAU;
            let scale = 0.75 + hash_2d(cx, cz, salt.wrapping_add(61)) * 0.5;
            let variant = (hash_2d(cx, cz, salt.wrapping_add(83)) * 255.0) as u32;

            out.push(ScatterInstance {
                position: [px, py, pz],
                yaw,
                scale,
                variant,
                _pad: [0.0; 2],
            });
        }
    }
}

impl GenerationPipeline for ScatterPipeline {
    type Instance = ScatterInstance;

    fn label(&self) -> &'static str {
        "scatter"
    }

    fn max_instances(&self) -> u32 {
        let cells = 2 * self.max_radius + 1;
        cells * cells * self.density
    }

    fn populate(&self, params: &DecorStreamParams, radius: u32) -> Vec<ScatterInstance> {
        let spacing = params.spacing[0];
        if spacing <= 0.0 {
            log::warn!("scatter generation skipped: degenerate spacing {spacing}");
            return Vec::new();
        }
        let radius = radius.min(self.max_radius) as i32;

        // The anchor is a spacing multiple; hash on absolute cell indices
        // so instances stay put as the anchor moves
        let anchor_cx = (params.anchor[0] / spacing).round() as i32;
        let anchor_cz = (params.anchor[1] / spacing).round() as i32;

        let mut instances: Vec<ScatterInstance> = (-radius..=radius)
            .into_par_iter()
            .flat_map_iter(|ix| {
                let mut row = Vec::new();
                for iz in -radius..=radius {
                    self.populate_cell(params, anchor_cx + ix, anchor_cz + iz, &mut row);
                }
                row
            })
            .collect();

        let cap = self.max_instances() as usize;
        if instances.len() > cap {
            log::warn!(
                "scatter generation produced {} instances, truncating to {cap}",
                instances.len()
            );
            instances.truncate(cap);
        }
        instances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decor::uniform::{ClippingPlane, ClippingPlanes};
    use crate::core::types::{Vec2, Vec3};

    fn params(anchor: Vec2, config: &DecorConfig) -> DecorStreamParams {
        DecorStreamParams::new(anchor, config, &ClippingPlanes::default())
    }

    fn as_bytes(instances: &[ScatterInstance]) -> &[u8] {
        bytemuck::cast_slice(instances)
    }

    #[test]
    fn test_deterministic() {
        let config = DecorConfig::default();
        let pipeline = ScatterPipeline::new(&config);
        let p = params(Vec2::ZERO, &config);

        let a = pipeline.populate(&p, 4);
        let b = pipeline.populate(&p, 4);
        assert!(!a.is_empty());
        assert_eq!(as_bytes(&a), as_bytes(&b));
    }

    #[test]
    fn test_respects_capacity() {
        let config = DecorConfig {
            density: 8,
            radius: 3,
            ..DecorConfig::default()
        };
        let pipeline = ScatterPipeline::new(&config);
        let p = params(Vec2::ZERO, &config);

        let instances = pipeline.populate(&p, 3);
        assert!(instances.len() as u32 <= pipeline.max_instances());

        // Requests beyond the configured radius are clamped
        let clamped = pipeline.populate(&p, 100);
        assert!(clamped.len() as u32 <= pipeline.max_instances());
    }

    #[test]
    fn test_instances_within_extent() {
        let config = DecorConfig::default();
        let pipeline = ScatterPipeline::new(&config);
        let anchor = Vec2::new(160.0, -80.0);
        let p = params(anchor, &config);

        let radius = 4u32;
        let extent = (radius as f32 + 1.0) * config.spacing;
        for instance in pipeline.populate(&p, radius) {
            assert!((instance.position[0] - anchor.x).abs() <= extent);
            assert!((instance.position[2] - anchor.y).abs() <= extent);
        }
    }

    #[test]
    fn test_seed_changes_layout() {
        let config = DecorConfig::default();
        let other = DecorConfig {
            decor_seed: config.decor_seed + 1,
            ..config.clone()
        };
        let a = ScatterPipeline::new(&config).populate(&params(Vec2::ZERO, &config), 4);
        let b = ScatterPipeline::new(&other).populate(&params(Vec2::ZERO, &other), 4);
        assert_ne!(as_bytes(&a), as_bytes(&b));
    }

    #[test]
    fn test_stable_across_anchor_moves() {
        let config = DecorConfig::default();
        let pipeline = ScatterPipeline::new(&config);
        let s = config.spacing;

        let a = pipeline.populate(&params(Vec2::ZERO, &config), 3);
        let b = pipeline.populate(&params(Vec2::new(2.0 * s, 0.0), &config), 3);

        // Instances in the overlapping region must be identical
        let overlap = |i: &&ScatterInstance| {
            i.position[0] >= -s && i.position[0] < 2.0 * s && i.position[2].abs() <= 3.0 * s
        };
        let in_a: Vec<_> = a.iter().filter(overlap).copied().collect();
        let in_b: Vec<_> = b.iter().filter(overlap).copied().collect();
        assert!(!in_a.is_empty());
        assert_eq!(as_bytes(&in_a), as_bytes(&in_b));
    }

    #[test]
    fn test_clipping_plane_prunes() {
        let config = DecorConfig::default();
        let pipeline = ScatterPipeline::new(&config);

        let open = pipeline.populate(&params(Vec2::ZERO, &config), 4);

        let mut planes = ClippingPlanes::default();
        planes[0] = ClippingPlane {
            origin: Vec3::ZERO,
            normal: Vec3::X,
        };
        let p = DecorStreamParams::new(Vec2::ZERO, &config, &planes);
        let clipped = pipeline.populate(&p, 4);

        assert!(clipped.len() < open.len());
        for instance in &clipped {
            assert!(instance.position[0] >= 0.0);
        }
    }

    #[test]
    fn test_zero_density_is_empty() {
        let config = DecorConfig {
            density: 0,
            ..DecorConfig::default()
        };
        let pipeline = ScatterPipeline::new(&config);
        assert!(pipeline.populate(&params(Vec2::ZERO, &config), 4).is_empty());
    }

    #[test]
    fn test_degenerate_spacing_is_empty() {
        let config = DecorConfig {
            spacing: 0.0,
            ..DecorConfig::default()
        };
        let pipeline = ScatterPipeline::new(&config);
        assert!(pipeline.populate(&params(Vec2::ZERO, &config), 4).is_empty());
    }
}
