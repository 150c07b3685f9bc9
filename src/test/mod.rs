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

//! Tests running the checks against a simulated router.

use std::{
    net::Ipv4Addr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use ios_driver::{
    router::{strip_preamble, PingOptions, PingResult},
    Config, ConfigKind, DriverError, NetworkDriver,
};


/// Running configuration of a router with a single OSPF area and `Loopback99`.
pub(crate) const R3_CONFIG: &str = include_str!("../../ios-driver/src/test/files/show_run_r3.txt");
/// Running configuration of a router with two OSPF areas and no `Loopback99`.
pub(crate) const R1_CONFIG: &str = include_str!("../../ios-driver/src/test/files/show_run_r1.txt");
/// Successful ping with five replies.
pub(crate) const PING_SUCCESS: &str = include_str!("../../ios-driver/src/test/files/ping_success.txt");
/// Ping without any reply.
pub(crate) const PING_TIMEOUT: &str = include_str!("../../ios-driver/src/test/files/ping_timeout.txt");

/// Router that answers with fixed outputs, and records all calls in a shared log.
#[derive(Debug, Clone)]
pub(crate) struct MockDriver {
    /// Name of the router
    pub name: String,
    /// Running configuration returned by `get_config`
    pub running: String,
    /// Output of the `ping` command
    pub ping_output: String,
    /// Fail when opening the session
    pub fail_open: bool,
    /// Whether the session is open
    pub is_open: bool,
    /// All calls to the driver
    pub log: Arc<Mutex<Vec<String>>>,
}

impl MockDriver {
    /// Create a new router with the given running configuration.
    pub fn new(name: &str, running: &str) -> Self {
        Self {
            name: name.to_string(),
            running: running.to_string(),
            ping_output: PING_SUCCESS.to_string(),
            fail_open: false,
            is_open: false,
            log: Default::default(),
        }
    }

    /// Set the output of `ping`.
    pub fn with_ping(mut self, output: &str) -> Self {
        self.ping_output = output.to_string();
        self
    }

    /// Make `open` fail.
    pub fn unreachable(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Get all calls recorded so far.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Record a call.
    fn record(&self, call: String) {
        self.log.lock().unwrap().push(call);
    }

    /// Fail if the session was not opened.
    fn check_open(&self) -> Result<(), DriverError> {
        if self.is_open {
            Ok(())
        } else {
            Err(DriverError::NotOpen(self.name.clone()))
        }
    }
}

#[async_trait]
impl NetworkDriver for MockDriver {
    fn hostname(&self) -> &str {
        &self.name
    }

    async fn open(&mut self) -> Result<(), DriverError> {
        self.record(format!("{} open", self.name));
        if self.fail_open {
            return Err(DriverError::Ssh(ios_driver::ssh::SshError::Timeout));
        }
        self.is_open = true;
        Ok(())
    }

    async fn get_config(&mut self, retrieve: ConfigKind) -> Result<Config, DriverError> {
        self.record(format!("{} get_config {retrieve:?}", self.name));
        self.check_open()?;
        Ok(Config {
            running: strip_preamble(&self.running).to_string(),
            startup: String::new(),
        })
    }

    async fn ping(
        &mut self,
        destination: Ipv4Addr,
        options: &PingOptions,
    ) -> Result<PingResult, DriverError> {
        self.record(format!("{} {}", self.name, options.command(destination)));
        self.check_open()?;
        Ok(PingResult::from_output(&self.ping_output, destination)?)
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.record(format!("{} close", self.name));
        self.is_open = false;
        Ok(())
    }
}
