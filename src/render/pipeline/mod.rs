//! Render pipelines

pub mod batch;

pub use batch::{BatchPipeline, PipelineKey};
