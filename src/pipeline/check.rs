//! The `Check` abstraction.
//!
//! A check reads the working set and earlier results, may add or remove
//! URLs, and returns one [`CheckOutput`] that the driver stores under the
//! check's name. Checks catch per-URL failures themselves and record them
//! in their output; returning `Err` aborts the whole run for the site.

use crate::collaborators::Collaborators;
use crate::config::SiteRateConfig;
use crate::errors::PipelineError;
use crate::results::{CheckName, CheckOutput, ResultStore};
use crate::working_set::WorkingSet;
use std::fmt;

/// What a check does to the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Only adds URLs
    Expander,
    /// Only removes (or renames) URLs
    Pruner,
    /// Leaves the set untouched
    Observer,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expander => write!(f, "expander"),
            Self::Pruner => write!(f, "pruner"),
            Self::Observer => write!(f, "observer"),
        }
    }
}

/// Everything a check may see during `run`.
///
/// The working set is borrowed mutably for the duration of the call only;
/// the result store is read-only because the driver alone writes to it.
pub struct CheckContext<'a> {
    pub urls: &'a mut WorkingSet,
    pub results: &'a ResultStore,
    pub config: &'a SiteRateConfig,
    pub services: &'a Collaborators,
}

impl CheckContext<'_> {
    /// User agent sent with every request of this run.
    pub fn user_agent(&self) -> &str {
        &self.config.user_agent
    }
}

pub trait Check: Send + Sync {
    fn name(&self) -> CheckName;

    fn kind(&self) -> CheckKind;

    /// Result entries that must be present and non-empty for this check to run.
    fn depends_on_results(&self) -> &'static [CheckName] {
        &[]
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError>;

    /// Called with the stored output right after `run`. A returned value
    /// replaces the stored one.
    fn post_hook(&self, _output: &CheckOutput) -> Option<CheckOutput> {
        None
    }
}
