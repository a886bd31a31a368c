// Export modules for library usage
pub mod checks;
pub mod cli;
pub mod collaborators;
pub mod commands;
pub mod config;
pub mod errors;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod rating;
pub mod report;
pub mod results;
pub mod testkit;
pub mod working_set;

// Re-export commonly used types
pub use crate::checks::default_pipeline;

pub use crate::collaborators::Collaborators;

pub use crate::config::{load_config, load_config_from, SiteRateConfig};

pub use crate::errors::{CheckException, ExceptionKind, PipelineError};

pub use crate::output::{create_writer, OutputFormat, ReportWriter};

pub use crate::pipeline::{Check, CheckContext, CheckKind, Pipeline, PipelineBuilder, PipelineRun};

pub use crate::rating::{total_score, Rater, RatingEngine, RatingRecord, RatingValue, Ratings};

pub use crate::report::{check_and_rate_site, Job, JobMeta, Report};

pub use crate::results::{CheckName, CheckOutput, ResultStore};

pub use crate::working_set::WorkingSet;
