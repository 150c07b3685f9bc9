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

//! Module to build the `ping` command and to parse its output on IOS devices.

use std::{fmt::Write, net::Ipv4Addr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ParseError;

lazy_static! {
    static ref SUCCESS_RATE_RE: Regex =
        Regex::new(r"Success rate is (\d+) percent \((\d+)/(\d+)\)").unwrap();
    static ref RTT_RE: Regex =
        Regex::new(r"round-trip min/avg/max = (\d+)/(\d+)/(\d+) ms").unwrap();
}

/// Optional arguments of the `ping` command. Fields that are `None` are left at the device
/// default (5 probes of 100 bytes, 2 seconds timeout).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PingOptions {
    /// Source address of the probes
    pub source: Option<Ipv4Addr>,
    /// Time-to-live of the probes
    pub ttl: Option<u8>,
    /// Timeout in seconds
    pub timeout: Option<u8>,
    /// Datagram size in bytes
    pub size: Option<u16>,
    /// Number of probes
    pub count: Option<u16>,
    /// VRF in which to send the probes
    pub vrf: Option<String>,
}

impl PingOptions {
    /// Build the IOS command:
    ///
    /// ```text
    /// ping [vrf VRF] DEST [source SRC] [ttl TTL] [timeout T] [size N] [repeat N]
    /// ```
    pub fn command(&self, destination: Ipv4Addr) -> String {
        let mut cmd = String::from("ping");
        // Writing into a String cannot fail.
        if let Some(vrf) = self.vrf.as_ref() {
            let _ = write!(cmd, " vrf {vrf}");
        }
        let _ = write!(cmd, " {destination}");
        if let Some(source) = self.source {
            let _ = write!(cmd, " source {source}");
        }
        if let Some(ttl) = self.ttl {
            let _ = write!(cmd, " ttl {ttl}");
        }
        if let Some(timeout) = self.timeout {
            let _ = write!(cmd, " timeout {timeout}");
        }
        if let Some(size) = self.size {
            let _ = write!(cmd, " size {size}");
        }
        if let Some(count) = self.count {
            let _ = write!(cmd, " repeat {count}");
        }
        cmd
    }
}

/// A single successful probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub ip_address: Ipv4Addr,
    /// Round-trip time in milliseconds
    pub rtt: f64,
}

/// Summary of a completed ping. All round-trip times are in milliseconds. IOS does not report
/// individual round-trip times, so `rtt_stddev` is always 0, and each probe in `results` carries
/// the average round-trip time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PingSummary {
    pub probes_sent: u32,
    pub packet_loss: u32,
    pub rtt_min: f64,
    pub rtt_max: f64,
    pub rtt_avg: f64,
    pub rtt_stddev: f64,
    pub results: Vec<ProbeResult>,
}

impl PingSummary {
    /// Number of probes that were answered.
    pub fn received(&self) -> u32 {
        self.probes_sent.saturating_sub(self.packet_loss)
    }
}

/// Result of a ping executed on the device.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PingResult {
    /// The ping completed (possibly without any answer).
    Success(PingSummary),
    /// The device refused to send the ping, e.g. `% Unrecognized host or address`.
    Error(String),
}

impl PingResult {
    /// Parse the output of the IOS `ping` command:
    ///
    /// ```text
    /// Type escape sequence to abort.
    /// Sending 5, 100-byte ICMP Echos to 198.51.100.15, timeout is 2 seconds:
    /// !!!!!
    /// Success rate is 100 percent (5/5), round-trip min/avg/max = 1/2/4 ms
    /// ```
    pub fn from_output(output: &str, destination: Ipv4Addr) -> Result<Self, ParseError> {
        if let Some(err) = output.lines().map(str::trim).find(|l| l.starts_with('%')) {
            log::debug!("ping {destination} failed: {err}");
            return Ok(Self::Error(err.to_string()));
        }

        let caps = SUCCESS_RATE_RE
            .captures(output)
            .ok_or_else(|| ParseError::UnexpectedPingOutput(output.to_string()))?;
        let received: u32 = caps[2].parse()?;
        let probes_sent: u32 = caps[3].parse()?;

        let (rtt_min, rtt_avg, rtt_max) = match RTT_RE.captures(output) {
            Some(rtt) => (
                rtt[1].parse::<u32>()? as f64,
                rtt[2].parse::<u32>()? as f64,
                rtt[3].parse::<u32>()? as f64,
            ),
            None => (0.0, 0.0, 0.0),
        };

        let results = (0..received)
            .map(|_| ProbeResult {
                ip_address: destination,
                rtt: rtt_avg,
            })
            .collect();

        Ok(Self::Success(PingSummary {
            probes_sent,
            packet_loss: probes_sent.saturating_sub(received),
            rtt_min,
            rtt_max,
            rtt_avg,
            rtt_stddev: 0.0,
            results,
        }))
    }

    /// Check if at least one probe was answered.
    pub fn is_reachable(&self) -> bool {
        match self {
            PingResult::Success(summary) => summary.received() > 0,
            PingResult::Error(_) => false,
        }
    }
}
