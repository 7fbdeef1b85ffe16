pub mod pipeline;

pub use pipeline::{run_pipeline, PipelineExt};
