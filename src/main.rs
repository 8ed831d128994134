// Copyright (C) 2025 HVSClib contributors
// HVSClib - High Voltage SID Collection library
// This file is part of HVSClib.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-2.0-or-later

// Print header, digest and song lengths of PSID files.
use anyhow::{Context, bail};
use clap::Parser;
use hvsc_core::{Hvsc, Md5Digest, PsidHeader, format_timestamp};

#[derive(Parser, Debug)]
#[command(name = "hvsc-info", version, about = "Show HVSC information for PSID files")]
struct Args {
    /// HVSC root directory (the one containing DOCUMENTS/)
    #[arg(long, env = "HVSC_BASE")]
    hvsc_root: Option<String>,

    /// PSID/RSID files to inspect
    #[arg(required = true)]
    files: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut hvsc = Hvsc::new();
    if let Some(root) = &args.hvsc_root {
        hvsc.set_root(root.trim_end_matches(['/', '\\']));
    }

    let mut failures = 0;
    for file in &args.files {
        if let Err(err) = show(&mut hvsc, file) {
            eprintln!("{file}: {err:#}");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} file(s) could not be read", args.files.len());
    }
    Ok(())
}

fn show(hvsc: &mut Hvsc, file: &str) -> anyhow::Result<()> {
    let data = hvsc
        .read_file(file)
        .with_context(|| format!("cannot load {file}"))?;
    let header = PsidHeader::parse(&data).context("not a PSID file")?;
    let digest = Md5Digest::of_bytes(&data);

    println!("{file}");
    println!("  format:   {} v{}", header.magic, header.version);
    println!("  name:     {}", header.name);
    println!("  author:   {}", header.author);
    println!("  released: {}", header.released);
    println!("  songs:    {} (start {})", header.songs, header.start_song);
    println!("  md5:      {digest}");

    if hvsc.root().is_none() {
        println!("  lengths:  unavailable, no HVSC root configured");
        return Ok(());
    }
    if hvsc.is_under_root(file) {
        println!("  hvsc:     {}", hvsc.strip_root(file));
    }

    match hvsc.song_lengths(file) {
        Ok(lengths) => {
            for (i, ms) in lengths.lengths.iter().enumerate() {
                println!("  song {:>3}: {}", i + 1, format_timestamp(*ms));
            }
        }
        Err(_) => hvsc.perror(Some(file)),
    }
    Ok(())
}
