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

//! Formatting things.

use std::{collections::BTreeSet, net::Ipv4Addr};

use ios_driver::router::{PingResult, PingSummary};
use itertools::Itertools;

use crate::suite::{CheckOutcome, Report, Status};

/// Trait to format things using appropriate indentation.
pub trait IndentedFormatter {
    /// Format something using some specific indent.
    fn fmt(&self, indent: usize) -> String;
}

impl IndentedFormatter for Status {
    fn fmt(&self, _indent: usize) -> String {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Error => "ERROR",
        }
        .to_string()
    }
}

impl IndentedFormatter for CheckOutcome {
    fn fmt(&self, indent: usize) -> String {
        let tab: String = " ".repeat(indent);
        format!(
            "{tab}{:<5} [{}] {}: {}",
            self.status.fmt(0),
            self.router,
            self.name,
            self.detail
        )
    }
}

impl IndentedFormatter for Report {
    fn fmt(&self, indent: usize) -> String {
        let tab: String = " ".repeat(indent);
        format!(
            "{tab}Checks started at {}\n{}\n{tab}{} passed, {} failed, {} errors",
            self.started,
            self.outcomes.iter().map(|o| o.fmt(indent + 2)).join("\n"),
            self.count(Status::Pass),
            self.count(Status::Fail),
            self.count(Status::Error),
        )
    }
}

impl IndentedFormatter for PingSummary {
    fn fmt(&self, indent: usize) -> String {
        let tab: String = " ".repeat(indent);
        format!(
            "{tab}probes sent: {}\n{tab}packet loss: {}\n{tab}rtt min/avg/max: {}/{}/{} ms",
            self.probes_sent, self.packet_loss, self.rtt_min, self.rtt_avg, self.rtt_max,
        )
    }
}

impl IndentedFormatter for PingResult {
    fn fmt(&self, indent: usize) -> String {
        match self {
            PingResult::Success(summary) => summary.fmt(indent),
            PingResult::Error(e) => format!("{}error: {e}", " ".repeat(indent)),
        }
    }
}

impl IndentedFormatter for BTreeSet<Ipv4Addr> {
    fn fmt(&self, indent: usize) -> String {
        let tab: String = " ".repeat(indent);
        if self.is_empty() {
            format!("{tab}no OSPF area")
        } else {
            self.iter().map(|a| format!("{tab}area {a}")).join("\n")
        }
    }
}

/// One-line summary of a ping result, e.g., `5/5 replies, rtt avg 2 ms`.
pub fn ping_summary(result: &PingResult) -> String {
    match result {
        PingResult::Success(s) if s.received() == 0 => {
            format!("0/{} replies", s.probes_sent)
        }
        PingResult::Success(s) => format!(
            "{}/{} replies, rtt avg {} ms",
            s.received(),
            s.probes_sent,
            s.rtt_avg
        ),
        PingResult::Error(e) => e.clone(),
    }
}
