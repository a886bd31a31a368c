//! Logging setup and crash-report context.
//!
//! Install the panic hook and logger at startup:
//!
//! ```ignore
//! use siterate::observability::{init_logging, install_panic_hook};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_logging(1, false);
//! }
//! ```
//!
//! The pipeline driver keeps the thread-local context current, so a panic
//! inside a check reports the site and the check that were running.

pub mod context;
pub mod logging;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_check,
    set_current_site, set_phase, set_progress, ContextGuard, Phase, SiteContext,
};
pub use logging::init_logging;
pub use panic_hook::install_panic_hook;
