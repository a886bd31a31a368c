//! URL-set resolution pipeline.
//!
//! A [`Pipeline`] runs a statically ordered list of [`Check`]s against one
//! input URL. Expanders grow the working set with URL variants, pruners
//! narrow it down to the URLs that actually serve the site, and observers
//! record facts about the survivors. Every check writes one named entry into
//! the [`crate::results::ResultStore`].

pub mod builder;
pub mod check;

pub use builder::{
    normalize_input_url, CheckTiming, Pipeline, PipelineBuilder, PipelineRun, SkippedCheck,
};
pub use check::{Check, CheckContext, CheckKind};
