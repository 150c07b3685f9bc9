// router-probe: Probe Cisco IOS routers over SSH
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Run all checks of the lab configuration, one after the other.

use ios_driver::{
    config::{Check, LabConfig, RouterProperties},
    get_network_driver, DriverError, NetworkDriver,
};
use itertools::Itertools;
use serde::Serialize;
use time::{format_description, OffsetDateTime};

use crate::checks::{collect_ospf_areas, ping, validate_loopback_ip};

/// Status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The check passed.
    Pass,
    /// The check was executed, but the result is not the expected one.
    Fail,
    /// The check could not be executed.
    Error,
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Name of the check
    pub name: String,
    /// Router on which the check was executed
    pub router: String,
    /// Status of the check
    pub status: Status,
    /// Details, i.e., the observed value or the error message.
    pub detail: String,
}

/// Results of all checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Local time at which the checks were started.
    pub started: String,
    /// The result of each check, in the order of the lab configuration.
    pub outcomes: Vec<CheckOutcome>,
}

impl Report {
    /// Check if all checks have passed.
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.status == Status::Pass)
    }

    /// Get the number of checks with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

/// Create the driver for a router in the inventory, using the driver of its platform.
pub fn connect(router: &RouterProperties) -> Result<Box<dyn NetworkDriver>, DriverError> {
    let driver = get_network_driver(&router.platform.to_string())?;
    Ok(driver(router.device()))
}

/// Run all checks of the lab, in order. The function `connect` creates the driver for a router
/// (see [`connect`]). A failing check does not stop the remaining ones.
pub async fn run_checks<F>(lab: &LabConfig, mut connect: F) -> Report
where
    F: FnMut(&RouterProperties) -> Result<Box<dyn NetworkDriver>, DriverError>,
{
    let started = timestamp();
    let mut outcomes = Vec::with_capacity(lab.checks.len());

    for check in lab.checks.iter() {
        log::info!("[{}] running check: {}", check.router(), check.name());
        let outcome = match lab.router(check.router()) {
            Ok(router) => match connect(router) {
                Ok(mut driver) => run_check(driver.as_mut(), check).await,
                Err(e) => outcome(check, Status::Error, e.to_string()),
            },
            Err(e) => outcome(check, Status::Error, e.to_string()),
        };
        match outcome.status {
            Status::Pass => log::debug!("[{}] {}: {}", outcome.router, outcome.name, outcome.detail),
            _ => log::warn!("[{}] {}: {}", outcome.router, outcome.name, outcome.detail),
        }
        outcomes.push(outcome);
    }

    Report { started, outcomes }
}

/// Execute a single check on the given driver.
pub async fn run_check(driver: &mut dyn NetworkDriver, check: &Check) -> CheckOutcome {
    match check {
        Check::LoopbackAddress {
            interface,
            expected,
            ..
        } => match validate_loopback_ip(driver, interface).await {
            Ok(addr) if addr == *expected => outcome(check, Status::Pass, addr.to_string()),
            Ok(addr) => outcome(check, Status::Fail, format!("expected {expected}, got {addr}")),
            Err(e) => outcome(check, Status::Error, e.to_string()),
        },
        Check::SingleOspfArea { .. } => match collect_ospf_areas(driver).await {
            Ok(areas) if areas.len() == 1 => {
                outcome(check, Status::Pass, format!("area {}", areas.iter().join(", ")))
            }
            Ok(areas) if areas.is_empty() => {
                outcome(check, Status::Fail, String::from("no OSPF area configured"))
            }
            Ok(areas) => outcome(
                check,
                Status::Fail,
                format!("{} areas: {}", areas.len(), areas.iter().join(", ")),
            ),
            Err(e) => outcome(check, Status::Error, e.to_string()),
        },
        Check::Ping {
            destination,
            options,
            ..
        } => match ping(driver, *destination, options).await {
            Ok(result) => {
                let status = if result.is_reachable() {
                    Status::Pass
                } else {
                    Status::Fail
                };
                outcome(check, status, crate::formatter::ping_summary(&result))
            }
            Err(e) => outcome(check, Status::Error, e.to_string()),
        },
    }
}

/// Build the outcome of a check.
fn outcome(check: &Check, status: Status, detail: String) -> CheckOutcome {
    CheckOutcome {
        name: check.name(),
        router: check.router().to_string(),
        status,
        detail,
    }
}

/// Get the current local time (or UTC if the local offset is unknown) as a string.
fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]")
        .ok()
        .and_then(|fmt| now.format(&fmt).ok())
        .unwrap_or_else(|| now.to_string())
}
