//! Rendering system and GPU interfaces

pub mod context;

pub use context::GpuContext;
