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

use std::{net::Ipv4Addr, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use ios_driver::{
    config::{LabConfig, DEFAULT_INTERFACE},
    router::PingOptions,
    ConfigKind,
};

use router_probe::{
    checks,
    formatter::IndentedFormatter,
    suite::{self, run_checks},
};

/// Probe Cisco IOS routers over SSH.
#[derive(Debug, Parser)]
struct Cli {
    /// Lab configuration listing all routers and checks.
    #[clap(
        long = "config",
        short = 'c',
        env = "ROUTER_PROBE_CONFIG",
        default_value = "router-probe.toml"
    )]
    config: PathBuf,
    /// Print the result as JSON.
    #[clap(long)]
    json: bool,
    /// What to do.
    #[clap(subcommand)]
    command: Command,
}

/// Commands of the CLI.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run all checks of the lab configuration.
    Run,
    /// Print the configuration of a router.
    Config {
        /// Name of the router
        #[clap(long, short)]
        router: String,
        /// Print the startup configuration instead of the running configuration.
        #[clap(long)]
        startup: bool,
    },
    /// Print the address of an interface.
    Loopback {
        /// Name of the router
        #[clap(long, short)]
        router: String,
        /// Interface name
        #[clap(long, short, default_value = DEFAULT_INTERFACE)]
        interface: String,
    },
    /// Print all OSPF areas of a router.
    Areas {
        /// Name of the router
        #[clap(long, short)]
        router: String,
    },
    /// Ping a destination from a router.
    Ping {
        /// Name of the router
        #[clap(long, short)]
        router: String,
        /// Destination address
        destination: Ipv4Addr,
        /// Number of probes
        #[clap(long)]
        count: Option<u16>,
        /// Source address
        #[clap(long)]
        source: Option<Ipv4Addr>,
        /// Time-to-live
        #[clap(long)]
        ttl: Option<u8>,
        /// Timeout in seconds
        #[clap(long)]
        timeout: Option<u8>,
        /// Datagram size in bytes
        #[clap(long)]
        size: Option<u16>,
        /// VRF name
        #[clap(long)]
        vrf: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();
    let lab = LabConfig::from_file(&args.config)?;

    match args.command {
        Command::Run => {
            let report = run_checks(&lab, suite::connect).await;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.fmt(0));
            }
            return Ok(if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Command::Config { router, startup } => {
            let mut driver = suite::connect(lab.router(&router)?)?;
            let kind = if startup {
                ConfigKind::Startup
            } else {
                ConfigKind::Running
            };
            let config = checks::get_config(driver.as_mut(), kind).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else if startup {
                println!("{}", config.startup);
            } else {
                println!("{}", config.running);
            }
        }
        Command::Loopback { router, interface } => {
            let mut driver = suite::connect(lab.router(&router)?)?;
            let addr = checks::validate_loopback_ip(driver.as_mut(), &interface).await?;
            if args.json {
                println!("{}", serde_json::to_string(&addr.to_string())?);
            } else {
                println!("{interface}: {addr}");
            }
        }
        Command::Areas { router } => {
            let mut driver = suite::connect(lab.router(&router)?)?;
            let areas = checks::collect_ospf_areas(driver.as_mut()).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&areas)?);
            } else {
                println!("{}\nsingle area: {}", areas.fmt(0), areas.len() == 1);
            }
        }
        Command::Ping {
            router,
            destination,
            count,
            source,
            ttl,
            timeout,
            size,
            vrf,
        } => {
            let mut driver = suite::connect(lab.router(&router)?)?;
            let options = PingOptions {
                source,
                ttl,
                timeout,
                size,
                count,
                vrf,
            };
            let result = checks::ping(driver.as_mut(), destination, &options).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.fmt(0));
            }
            if !result.is_reachable() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
