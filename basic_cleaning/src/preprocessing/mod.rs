pub mod pipeline;

pub use pipeline::{
    clean, CleanRequest, CleaningPipeline, CleaningReport, PipelineConfig, StepOutcome, JOB_TYPE,
};
