// Copyright (C) 2025 HVSClib contributors
// HVSClib - High Voltage SID Collection library
// This file is part of HVSClib.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-2.0-or-later

//! Line-oriented reader for the HVSC text databases.
//!
//! The file is opened in binary mode and line endings are handled here: `\n`
//! terminates a line and an immediately preceding `\r` is stripped. The line
//! read before the current one stays available through
//! [`TextFile::previous_line`], which the SLDB lookup uses to find the path
//! comment above a digest entry.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::{HvscError, Result};

/// Initial capacity of the line buffers.
pub const INITIAL_LINE_CAPACITY: usize = 1024;

/// Handle to an open text file.
///
/// `TextFile::default()` is the closed state; [`TextFile::close`] returns a
/// handle to it and may be called any number of times.
#[derive(Debug, Default)]
pub struct TextFile {
    reader: Option<BufReader<File>>,
    path: Option<PathBuf>,
    lineno: usize,
    raw: Vec<u8>,
    // the two decoded lines swap roles on every read, so a scan reuses them
    current: String,
    previous: String,
    has_current: bool,
    has_previous: bool,
    /// Shared by the current and previous line buffers; grows only.
    capacity: usize,
}

impl TextFile {
    /// Open `path` for line reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("opening '{}'", path.display());

        let file = File::open(path).map_err(|e| HvscError::io(path, e))?;
        Ok(Self {
            reader: Some(BufReader::new(file)),
            path: Some(path.to_path_buf()),
            lineno: 0,
            raw: Vec::with_capacity(INITIAL_LINE_CAPACITY),
            current: String::with_capacity(INITIAL_LINE_CAPACITY),
            previous: String::with_capacity(INITIAL_LINE_CAPACITY),
            has_current: false,
            has_previous: false,
            capacity: INITIAL_LINE_CAPACITY,
        })
    }

    /// Read the next line, without its terminator.
    ///
    /// Returns `Ok(None)` on a clean end of file. A final line without a
    /// trailing newline is returned once, but does not advance
    /// [`TextFile::line_number`]. The line read last stays available as
    /// [`TextFile::previous_line`] after end of file or a read error.
    pub fn read_line(&mut self) -> Result<Option<&str>> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(HvscError::Invalid("read from a closed text file".into()));
        };

        std::mem::swap(&mut self.current, &mut self.previous);
        self.has_previous = self.has_current;
        self.has_current = false;
        self.raw.clear();

        let count = reader.read_until(b'\n', &mut self.raw).map_err(|e| {
            HvscError::io(self.path.clone().unwrap_or_default(), e)
        })?;
        if count == 0 {
            return Ok(None);
        }

        let terminated = self.raw.last() == Some(&b'\n');
        if terminated {
            self.raw.pop();
        }
        self.grow_to_fit(self.raw.len());

        if terminated {
            if self.raw.last() == Some(&b'\r') {
                self.raw.pop();
            }
            self.lineno += 1;
        }

        decode_line(&self.raw, &mut self.current);
        self.has_current = true;
        Ok(Some(self.current.as_str()))
    }

    /// The line returned by the read before the most recent one.
    pub fn previous_line(&self) -> Option<&str> {
        self.has_previous.then_some(self.previous.as_str())
    }

    /// Number of newline-terminated lines read so far (1-based).
    pub fn line_number(&self) -> usize {
        self.lineno
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Release the stream and buffers, returning to the closed state.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    fn grow_to_fit(&mut self, len: usize) {
        // a line needs one spare byte for its terminator
        while len >= self.capacity - 1 {
            self.capacity *= 2;
            trace!(
                "growing line buffers to {} bytes at line {}",
                self.capacity,
                self.lineno + 1
            );
        }
        if self.raw.capacity() < self.capacity {
            self.raw.reserve(self.capacity - self.raw.len());
        }
    }
}

/// Decode a database line into `out`: UTF-8 when valid, Latin-1 otherwise.
fn decode_line(bytes: &[u8], out: &mut String) {
    out.clear();
    match std::str::from_utf8(bytes) {
        Ok(text) => out.push_str(text),
        Err(_) => out.extend(bytes.iter().map(|&b| char::from(b))),
    }
}
