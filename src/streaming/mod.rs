//! Streaming protocol for GPU-resident decoration instances
//!
//! Pure protocol logic (anchor thresholding, double buffering, generation
//! tokens) plus the async regeneration worker. The GPU-facing composition
//! lives in [`crate::decor::streamer`].

pub mod anchor;
pub mod double_buffer;
pub mod regen;

pub use anchor::{StreamAnchor, MOVE_THRESHOLD};
pub use double_buffer::BufferPair;
pub use regen::{Completion, RegenRequest, RegenResult, RegenState, RegenWorker};

#[cfg(test)]
mod tests {
    //! Protocol-level tests composing the anchor, token, and buffer pieces
    //! the way the streamer does, without a GPU device.

    use super::*;
    use crate::core::types::Vec2;
    use crate::decor::config::DecorConfig;
    use crate::decor::pipeline::GenerationPipeline;
    use crate::decor::uniform::{ClippingPlanes, DecorStreamParams};
    use std::sync::Arc;
    use std::time::Duration;

    /// Generates one marker instance per request, tagged with the anchor X
    struct MarkerPipeline;

    impl GenerationPipeline for MarkerPipeline {
        type Instance = u32;

        fn label(&self) -> &'static str {
            "marker"
        }

        fn max_instances(&self) -> u32 {
            16
        }

        fn populate(&self, params: &DecorStreamParams, _radius: u32) -> Vec<u32> {
            if params.anchor[0] < 0.0 {
                // Degenerate region produces nothing
                return Vec::new();
            }
            vec![params.anchor[0] as u32]
        }
    }

    /// CPU-side mirror of the streamer protocol
    struct Harness {
        config: DecorConfig,
        anchor: StreamAnchor,
        state: RegenState,
        buffers: BufferPair<Vec<u32>>,
        worker: RegenWorker<u32>,
    }

    impl Harness {
        fn new(position: Vec2) -> Self {
            let config = DecorConfig::default();
            Self {
                config,
                anchor: StreamAnchor::new(position),
                state: RegenState::new(),
                buffers: BufferPair::new(Vec::new(), Vec::new()),
                worker: RegenWorker::new_with_current_runtime(Arc::new(MarkerPipeline)),
            }
        }

        fn move_to(&mut self, x: f32, y: f32) -> bool {
            if !self.anchor.try_move(x, y) {
                return false;
            }
            let params = DecorStreamParams::new(
                self.anchor.quantized(self.config.spacing),
                &self.config,
                &ClippingPlanes::default(),
            );
            let token = self.state.issue();
            self.worker.request(token, params, 1);
            true
        }

        fn poll(&mut self) -> usize {
            let mut published = 0;
            for result in self.worker.poll_results() {
                let count = result.instances.len() as u32;
                match self.state.complete(result.token, count) {
                    Completion::Stale | Completion::Empty => {}
                    Completion::Publish => {
                        *self.buffers.back_mut() = result.instances;
                        self.buffers.publish(count);
                        published += 1;
                    }
                }
            }
            published
        }

        async fn settle(&mut self) {
            for _ in 0..400 {
                self.poll();
                if !self.state.is_regenerating() {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            panic!("regeneration never settled");
        }
    }

    #[tokio::test]
    async fn test_move_publishes_quantized_result() {
        let mut harness = Harness::new(Vec2::ZERO);
        // Spacing 8: anchor 23 quantizes to cell 16
        assert!(harness.move_to(23.0, 4.0));
        harness.settle().await;

        assert_eq!(harness.buffers.instance_count(), 1);
        assert_eq!(harness.buffers.front(), &vec![16u32]);
    }

    #[tokio::test]
    async fn test_below_threshold_issues_nothing() {
        let mut harness = Harness::new(Vec2::ZERO);
        assert!(!harness.move_to(15.0, 15.0));
        assert!(!harness.state.is_regenerating());
    }

    #[tokio::test]
    async fn test_superseding_publishes_only_newest() {
        let mut harness = Harness::new(Vec2::ZERO);
        assert!(harness.move_to(24.0, 0.0));
        assert!(harness.move_to(48.0, 0.0));
        harness.settle().await;

        // Only the second move's result is ever visible
        assert_eq!(harness.buffers.front(), &vec![48u32]);
        assert_eq!(harness.buffers.instance_count(), 1);

        // Late-arriving leftovers must not overwrite it
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(harness.poll(), 0);
        assert_eq!(harness.buffers.front(), &vec![48u32]);
    }

    #[tokio::test]
    async fn test_empty_result_keeps_previous_front() {
        let mut harness = Harness::new(Vec2::ZERO);
        assert!(harness.move_to(32.0, 0.0));
        harness.settle().await;
        assert_eq!(harness.buffers.front(), &vec![32u32]);

        // Negative anchors generate zero instances
        assert!(harness.move_to(-64.0, 0.0));
        harness.settle().await;
        assert_eq!(harness.buffers.front(), &vec![32u32]);
        assert_eq!(harness.buffers.instance_count(), 1);
    }
}
