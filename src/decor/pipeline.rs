//! Generation pipeline strategy for decoration streaming
//!
//! A streamer is parameterized by a [`GenerationPipeline`]: the strategy
//! supplies the per-instance record layout, the instance buffer capacity,
//! and the placement routine. The buffering and supersession protocol is
//! identical for every strategy.

use bytemuck::Pod;

use crate::decor::uniform::{DecorStreamParams, GpuClippingPlane};

/// Placement strategy invoked by the regeneration worker.
///
/// `populate` runs off the frame thread and must be deterministic for a
/// given payload so superseded and repeated requests agree.
pub trait GenerationPipeline: Send + Sync + 'static {
    /// Per-instance record uploaded to the instance buffer
    type Instance: Pod + Send + Sync;

    /// Label used for buffer names and log lines
    fn label(&self) -> &'static str;

    /// Capacity the instance buffers are allocated for.
    /// `populate` never returns more than this.
    fn max_instances(&self) -> u32;

    /// Generate instances for the payload within `radius` cells of the anchor
    fn populate(&self, params: &DecorStreamParams, radius: u32) -> Vec<Self::Instance>;
}

/// Integer hash producing a value in [0, 1].
pub(crate) fn hash_2d(ix: i32, iz: i32, seed: u32) -> f32 {
    let mut h = (ix as u32)
        .wrapping_mul(374761393)
        .wrapping_add((iz as u32).wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

/// Smooth 2D value noise with bilinear interpolation.
pub(crate) fn smooth_noise(x: f32, z: f32, scale: f32, seed: u32) -> f32 {
    let sx = x / scale;
    let sz = z / scale;

    let ix = sx.floor() as i32;
    let iz = sz.floor() as i32;
    let fx = sx - sx.floor();
    let fz = sz - sz.floor();

    let fx = fx * fx * (3.0 - 2.0 * fx);
    let fz = fz * fz * (3.0 - 2.0 * fz);

    let h00 = hash_2d(ix, iz, seed);
    let h10 = hash_2d(ix + 1, iz, seed);
    let h01 = hash_2d(ix, iz + 1, seed);
    let h11 = hash_2d(ix + 1, iz + 1, seed);

    let a = h00 + (h10 - h00) * fx;
    let b = h01 + (h11 - h01) * fx;
    a + (b - a) * fz
}

/// Shared terrain height field derived from the terrain seed.
/// Keeps decoration vertically coherent with terrain built from the same seed.
pub(crate) fn terrain_height(x: f32, z: f32, terrain_seed: u32) -> f32 {
    let broad = smooth_noise(x, z, 64.0, terrain_seed);
    let detail = smooth_noise(x, z, 16.0, terrain_seed.wrapping_add(7));
    (broad - 0.5) * 12.0 + (detail - 0.5) * 2.0
}

/// Whether a point falls behind any non-degenerate clipping plane.
/// Points are kept when on or inside every plane (inward normals).
pub(crate) fn is_clipped(point: [f32; 3], planes: &[GpuClippingPlane; 6]) -> bool {
    for plane in planes {
        let n = plane.normal;
        if n[0] == 0.0 && n[1] == 0.0 && n[2] == 0.0 {
            continue;
        }
        let d = n[0] * (point[0] - plane.origin[0])
            + n[1] * (point[1] - plane.origin[1])
            + n[2] * (point[2] - plane.origin[2]);
        if d < 0.0 {
            return true;
        }
    }
    false
}
