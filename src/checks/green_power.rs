use super::hostname;
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, GreenPowerRecord};
use log::debug;
use std::collections::BTreeMap;

/// Asks the green web lookup whether each host runs on renewable energy.
pub struct GreenPower;

impl Check for GreenPower {
    fn name(&self) -> CheckName {
        CheckName::GreenPower
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let mut records = BTreeMap::new();
        for url in ctx.urls.list() {
            let Some(host) = hostname(url) else {
                continue;
            };
            let record = match ctx.services.green_power.is_green(&host) {
                Ok(green) => GreenPowerRecord {
                    green,
                    exception: None,
                },
                Err(exception) => {
                    debug!("Green power lookup for {} failed: {}", host, exception);
                    GreenPowerRecord {
                        green: false,
                        exception: Some(exception),
                    }
                }
            };
            records.insert(url.to_string(), record);
        }
        Ok(CheckOutput::GreenPower(records))
    }
}
