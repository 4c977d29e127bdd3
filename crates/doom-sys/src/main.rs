// main.rs - Startup: parse the command line, load the WADs and run the host

/*
Copyright (C) 1993-1996 Id Software, Inc.

This program is free software; you can redistribute it and/or
modify it under the terms of the GNU General Public License
as published by the Free Software Foundation; either version 2
of the License, or (at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.

See the GNU General Public License for more details.
*/

use anyhow::Result;
use clap::Parser;
use log::info;

use doom_common::tables;
use doom_sys::{load_wads, logging, Host, HostConfig};

fn main() -> Result<()> {
    let cfg = HostConfig::parse();
    logging::init(cfg.verbose);

    tables::init_tables();
    let wad = load_wads(&cfg)?;
    let host = Host::new(wad, &cfg)?;
    let report = host.run()?;

    info!(
        "{} tics in {:.2}s ({:.1} fps), {} sounds",
        report.tics,
        report.realtime.as_secs_f64(),
        report.fps(),
        report.sounds
    );
    println!("{:08x}", report.capture.run_crc);
    Ok(())
}
