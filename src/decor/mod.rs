//! Streamed instanced decoration
//!
//! Scattered small objects (vegetation, debris, building placements) kept
//! GPU-resident and regenerated asynchronously as the viewpoint moves.
//! Placement strategies plug into one streamer type; see
//! [`streamer::DecorStreamer`].

pub mod config;
pub mod uniform;
pub mod pipeline;
pub mod scatter;
pub mod building;
pub mod streamer;

pub use building::{BuildingInstance, BuildingPipeline};
pub use config::DecorConfig;
pub use pipeline::GenerationPipeline;
pub use scatter::{ScatterInstance, ScatterPipeline};
pub use streamer::{DecorDraw, DecorStreamer};
pub use uniform::{ClippingPlane, ClippingPlanes, DecorStreamParams, DecorUniformBuffer};

/// Streamer over the scattered-decoration pipeline
pub type ScatterStreamer = streamer::DecorStreamer<ScatterPipeline>;

/// Streamer over the building-footprint pipeline
pub type BuildingStreamer = streamer::DecorStreamer<BuildingPipeline>;
