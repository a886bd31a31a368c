//! Thread-local context tracking for crash reports.
//!
//! Records which site and which check the current thread is working on.
//! Batch runs evaluate sites on rayon worker threads, so the context is
//! thread-local while the site counters are global atomics.

use crate::results::CheckName;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

static SITES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static SITES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<SiteContext> = const { RefCell::new(SiteContext::new()) };
}

/// What the current thread was doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteContext {
    pub phase: Option<Phase>,
    /// Input URL of the site under evaluation
    pub site: Option<String>,
    pub check: Option<CheckName>,
}

impl SiteContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            site: None,
            check: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Checking,
    Rating,
    Reporting,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checking => write!(f, "checking"),
            Self::Rating => write!(f, "rating"),
            Self::Reporting => write!(f, "reporting"),
        }
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: SiteContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut SiteContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

#[must_use]
pub fn set_phase(phase: Phase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_site(url: impl Into<String>) -> ContextGuard {
    let url = url.into();
    update(|ctx| ctx.site = Some(url))
}

#[must_use]
pub fn set_current_check(check: CheckName) -> ContextGuard {
    update(|ctx| ctx.check = Some(check))
}

pub fn set_progress(processed: usize, total: usize) {
    SITES_PROCESSED.store(processed, Ordering::Relaxed);
    SITES_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    SITES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> SiteContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        SITES_PROCESSED.load(Ordering::Relaxed),
        SITES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = SiteContext::new();
    });
}
