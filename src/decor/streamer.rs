//! Double-buffered streaming of decoration instances
//!
//! Owns a front instance buffer (presented) and a back buffer (written).
//! `move_to` decides whether regeneration is warranted and issues it
//! asynchronously; `poll` observes completions and publishes the newest
//! complete set with an atomic swap. The renderer reads [`DecorDraw`] once
//! per frame and never sees a half-written buffer.

use std::sync::Arc;

use crate::core::types::{Result, Vec2};
use crate::decor::config::DecorConfig;
use crate::decor::pipeline::GenerationPipeline;
use crate::decor::uniform::{ClippingPlanes, DecorStreamParams, DecorUniformBuffer};
use crate::streaming::anchor::StreamAnchor;
use crate::streaming::double_buffer::BufferPair;
use crate::streaming::regen::{Completion, RegenState, RegenWorker};

/// Per-frame snapshot handed to the renderer.
///
/// Borrowed for one frame only; must not be held across `poll`.
pub struct DecorDraw<'a> {
    /// Current front instance buffer
    pub instances: &'a wgpu::Buffer,
    /// Valid instance count in the front buffer
    pub instance_count: u32,
    /// Uniform payload buffer applied during draw
    pub uniform: &'a wgpu::Buffer,
}

/// Streams decoration instances around a moving anchor.
///
/// Parameterized by the generation pipeline; `DecorStreamer<ScatterPipeline>`
/// and `DecorStreamer<BuildingPipeline>` share the buffering, thresholding,
/// and supersession protocol unchanged.
pub struct DecorStreamer<P: GenerationPipeline> {
    pipeline: Arc<P>,
    config: DecorConfig,
    anchor: StreamAnchor,
    clipping: ClippingPlanes,
    params: DecorStreamParams,
    uniform: DecorUniformBuffer,
    buffers: BufferPair<wgpu::Buffer>,
    state: RegenState,
    worker: RegenWorker<P::Instance>,
    radius: u32,
}

impl<P: GenerationPipeline> DecorStreamer<P> {
    /// Create a streamer and issue the initial fill for the starting anchor.
    ///
    /// Backend failures (instance buffer allocation, worker startup) are
    /// propagated to the caller.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: P,
        config: DecorConfig,
        position: Vec2,
    ) -> Result<Self> {
        let pipeline = Arc::new(pipeline);
        let buffers = BufferPair::new(
            Self::create_instance_buffer(device, &pipeline, 0),
            Self::create_instance_buffer(device, &pipeline, 1),
        );
        let uniform = DecorUniformBuffer::new(device);

        let anchor = StreamAnchor::new(position);
        let clipping = ClippingPlanes::default();
        let params = DecorStreamParams::new(anchor.quantized(config.spacing), &config, &clipping);
        uniform.update(queue, &params);

        let radius = config.radius;
        let worker = RegenWorker::new(pipeline.clone())?;
        let mut state = RegenState::new();

        // Initial fill so decoration exists before the first qualifying move
        let token = state.issue();
        worker.request(token, params, radius);
        log::debug!(
            "{} streamer created at {:?}, initial regeneration issued",
            pipeline.label(),
            position
        );

        Ok(Self {
            pipeline,
            config,
            anchor,
            clipping,
            params,
            uniform,
            buffers,
            state,
            worker,
            radius,
        })
    }

    fn create_instance_buffer(device: &wgpu::Device, pipeline: &Arc<P>, slot: usize) -> wgpu::Buffer {
        let stride = std::mem::size_of::<P::Instance>() as u64;
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{}_instances_{slot}", pipeline.label())),
            size: stride * pipeline.max_instances() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Move the anchor. Moves below the threshold on both axes are no-ops;
    /// qualifying moves rebuild the uniform payload and issue exactly one
    /// asynchronous regeneration, superseding any still in flight.
    pub fn move_to(&mut self, queue: &wgpu::Queue, x: f32, y: f32) {
        if !self.anchor.try_move(x, y) {
            return;
        }
        self.rebuild_params(queue);
        self.request_regen();
    }

    /// Force regeneration at the current anchor, bypassing the movement
    /// threshold. Hook for orientation-driven refresh.
    pub fn refresh(&mut self, queue: &wgpu::Queue) {
        self.rebuild_params(queue);
        self.request_regen();
    }

    /// Replace the clipping planes and rebuild the uniform payload.
    ///
    /// Does not regenerate by itself: clipping is applied per frame against
    /// the existing buffer; call [`DecorStreamer::refresh`] to also prune
    /// instance data.
    pub fn set_clipping_planes(&mut self, queue: &wgpu::Queue, planes: ClippingPlanes) {
        self.clipping = planes;
        self.rebuild_params(queue);
    }

    fn rebuild_params(&mut self, queue: &wgpu::Queue) {
        self.params = DecorStreamParams::new(
            self.anchor.quantized(self.config.spacing),
            &self.config,
            &self.clipping,
        );
        self.uniform.update(queue, &self.params);
    }

    fn request_regen(&mut self) {
        let token = self.state.issue();
        self.worker.request(token, self.params, self.radius);
    }

    /// Drain completed regenerations and publish the newest complete set.
    ///
    /// Call once per frame before reading [`DecorStreamer::draw_data`].
    /// Superseded and empty results are discarded; a publishing result is
    /// written to the back buffer and swapped in as one transition.
    pub fn poll(&mut self, queue: &wgpu::Queue) {
        for result in self.worker.poll_results() {
            let count = result.instances.len() as u32;
            match self.state.complete(result.token, count) {
                Completion::Stale => {
                    log::trace!("{}: stale regeneration {} discarded", self.pipeline.label(), result.token);
                }
                Completion::Empty => {
                    log::debug!("{}: empty regeneration kept previous buffer", self.pipeline.label());
                }
                Completion::Publish => {
                    queue.write_buffer(
                        self.buffers.back(),
                        0,
                        bytemuck::cast_slice(&result.instances),
                    );
                    self.buffers.publish(count);
                    log::trace!("{}: published {count} instances", self.pipeline.label());
                }
            }
        }
    }

    /// Per-frame read access for the renderer
    pub fn draw_data(&self) -> DecorDraw<'_> {
        DecorDraw {
            instances: self.buffers.front(),
            instance_count: self.buffers.instance_count(),
            uniform: self.uniform.buffer(),
        }
    }

    /// Uniform bind group for draw integration
    pub fn uniform_bind_group(&self) -> &wgpu::BindGroup {
        self.uniform.bind_group()
    }

    /// Uniform bind group layout for pipeline creation
    pub fn uniform_bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        self.uniform.bind_group_layout()
    }

    /// Current (unquantized) anchor position
    pub fn anchor(&self) -> Vec2 {
        self.anchor.position()
    }

    /// Current uniform payload
    pub fn params(&self) -> &DecorStreamParams {
        &self.params
    }

    /// Whether a regeneration is in flight
    pub fn is_regenerating(&self) -> bool {
        self.state.is_regenerating()
    }

    /// Generation extent in cells used for subsequent requests
    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius;
    }
}
