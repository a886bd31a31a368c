use super::browser::{Browser, BrowserMeasurement};
use crate::config::Viewport;
use crate::errors::CheckException;

/// Stand-in for a capability this deployment does not provide.
///
/// Every call fails with an `unavailable` exception, which checks record per
/// URL like any other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl Browser for Unavailable {
    fn load_and_measure(
        &self,
        _url: &str,
        _viewports: &[Viewport],
    ) -> Result<BrowserMeasurement, CheckException> {
        Err(CheckException::unavailable("headless browser"))
    }
}
