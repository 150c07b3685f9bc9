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

//! # router-probe: Probe Cisco IOS routers over SSH
//!
//! This crate runs a small set of checks against live routers in a lab:
//!
//! - Is the address of an interface (by default `Loopback99`) the expected one?
//! - Is exactly one OSPF area configured on a router?
//! - Can a router reach a given destination with `ping`?
//!
//! Each check opens a session to the router, performs a single remote call, closes the session,
//! and returns the parsed result.
//!
//! ## Structure
//! - The crate [`ios_driver`] contains the SSH sessions, the [`ios_driver::NetworkDriver`] trait,
//!   and the parsers for the router output.
//! - The module [`checks`] implements the individual checks on top of any
//!   [`ios_driver::NetworkDriver`].
//! - The module [`suite`] runs all checks listed in the lab configuration, and collects the
//!   results in a [`suite::Report`].
//! - The module [`formatter`] renders reports and results for the terminal.

#![deny(
    missing_docs,
    clippy::missing_docs_in_private_items,
    missing_debug_implementations,
    rust_2018_idioms
)]

pub mod checks;
pub mod formatter;
pub mod suite;
#[cfg(test)]
mod test;

pub use checks::CheckError;
pub use suite::{run_checks, Report};
