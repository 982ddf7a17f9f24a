//! GPU uniform payload for decoration generation
//!
//! Rebuilt whenever the anchor or clipping planes change. The anchor is
//! stored quantized to the spacing grid so fractional camera motion does
//! not re-snap the decoration lattice every frame.

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Vec2, Vec3};
use crate::decor::config::DecorConfig;

/// One convex clipping plane: a point on the plane and its inward normal.
/// A zero normal marks the plane degenerate (no clipping).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClippingPlane {
    pub origin: Vec3,
    pub normal: Vec3,
}

/// Six planes defining an optional convex clip region.
/// The default is six degenerate planes meaning "no clipping".
pub type ClippingPlanes = [ClippingPlane; 6];

/// Plane layout for the GPU. WGSL vec3 has 16-byte alignment.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuClippingPlane {
    pub origin: [f32; 3],
    pub _pad0: f32,
    pub normal: [f32; 3],
    pub _pad1: f32,
}

impl From<ClippingPlane> for GpuClippingPlane {
    fn from(plane: ClippingPlane) -> Self {
        Self {
            origin: plane.origin.to_array(),
            _pad0: 0.0,
            normal: plane.normal.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Uniform payload consumed by decoration generation and per-frame clipping.
/// Must match the generation shader struct exactly.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DecorStreamParams {
    /// Anchor quantized to the lower spacing multiple per axis (8 bytes)
    pub anchor: [f32; 2],
    /// Cell size per axis (8 bytes)
    pub spacing: [f32; 2],
    // -- 16 bytes --
    pub density: f32,
    pub terrain_seed: u32,
    pub decor_seed: u32,
    pub _pad: f32,
    // -- 16 bytes --
    pub clipping: [GpuClippingPlane; 6],
    // Total: 224 bytes
}

impl DecorStreamParams {
    /// Build the payload from a quantized anchor, stream config, and planes
    pub fn new(anchor_quantized: Vec2, config: &DecorConfig, planes: &ClippingPlanes) -> Self {
        Self {
            anchor: anchor_quantized.to_array(),
            spacing: [config.spacing, config.spacing],
            density: config.density as f32,
            terrain_seed: config.terrain_seed,
            decor_seed: config.decor_seed,
            _pad: 0.0,
            clipping: [
                planes[0].into(),
                planes[1].into(),
                planes[2].into(),
                planes[3].into(),
                planes[4].into(),
                planes[5].into(),
            ],
        }
    }
}

/// GPU buffer wrapper for the decoration uniform
pub struct DecorUniformBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl DecorUniformBuffer {
    /// Create the uniform buffer and its bind group
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("decor_stream_params"),
            size: std::mem::size_of::<DecorStreamParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("decor_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE
                    | wgpu::ShaderStages::VERTEX
                    | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("decor_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Upload a rebuilt payload
    pub fn update(&self, queue: &wgpu::Queue, params: &DecorStreamParams) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(params));
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_size() {
        assert_eq!(std::mem::size_of::<DecorStreamParams>(), 224);
    }

    #[test]
    fn test_params_alignment() {
        assert_eq!(std::mem::size_of::<DecorStreamParams>() % 16, 0);
        assert_eq!(std::mem::size_of::<GpuClippingPlane>(), 32);
    }

    #[test]
    fn test_bytemuck_cast() {
        let params = DecorStreamParams::zeroed();
        assert_eq!(bytemuck::bytes_of(&params).len(), 224);
    }

    #[test]
    fn test_default_planes_degenerate() {
        let planes = ClippingPlanes::default();
        for plane in &planes {
            assert_eq!(plane.normal, Vec3::ZERO);
            assert_eq!(plane.origin, Vec3::ZERO);
        }
    }

    #[test]
    fn test_payload_carries_quantized_anchor() {
        let config = DecorConfig {
            spacing: 10.0,
            ..DecorConfig::default()
        };
        let params = DecorStreamParams::new(Vec2::new(20.0, 0.0), &config, &ClippingPlanes::default());
        assert_eq!(params.anchor, [20.0, 0.0]);
        assert_eq!(params.spacing, [10.0, 10.0]);
    }

    #[test]
    fn test_plane_conversion() {
        let plane = ClippingPlane {
            origin: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::new(0.0, 1.0, 0.0),
        };
        let gpu: GpuClippingPlane = plane.into();
        assert_eq!(gpu.origin, [1.0, 2.0, 3.0]);
        assert_eq!(gpu.normal, [0.0, 1.0, 0.0]);
    }
}
