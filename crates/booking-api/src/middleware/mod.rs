//! Cross-cutting request layers.

pub mod metrics;
pub mod tracing_layer;
