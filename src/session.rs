// Copyright (C) 2025 HVSClib contributors
// HVSClib - High Voltage SID Collection library
// This file is part of HVSClib.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-2.0-or-later

//! Session context tying the library together
//!
//! An [`Hvsc`] owns the configured root paths and the last-error slot. Each
//! fallible method returns its `Result` as usual and also records a failure in
//! the slot, so callers can check the return value first and then ask the
//! session what went wrong. Separate sessions share no state.

use std::path::Path;

use log::debug;

use crate::core::{TextFile, read_file};
use crate::digest::{self, Md5Digest};
use crate::error::{ErrorCode, ErrorState, HvscError, Result};
use crate::paths::{RootPaths, normalize_separators};
use crate::sldb::SongLengths;
use crate::timestamp::{self, Timestamp};

/// HVSC library session
#[derive(Debug, Default)]
pub struct Hvsc {
    paths: Option<RootPaths>,
    errors: ErrorState,
}

impl Hvsc {
    /// Create a session without a configured root
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session rooted at `root`
    pub fn with_root(root: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set_root(root);
        session
    }

    /// Configure the HVSC root, replacing any previous configuration
    pub fn set_root(&mut self, root: impl Into<String>) {
        self.paths = Some(RootPaths::new(root));
    }

    /// Forget the configured root
    pub fn clear_root(&mut self) {
        if self.paths.take().is_some() {
            debug!("HVSC root cleared");
        }
    }

    pub fn paths(&self) -> Option<&RootPaths> {
        self.paths.as_ref()
    }

    pub fn root(&self) -> Option<&str> {
        self.paths.as_ref().map(RootPaths::root)
    }

    /// Sticky record of the most recent failure
    pub fn last_error(&self) -> &ErrorState {
        &self.errors
    }

    /// Code of the most recent failure, `Ok` if nothing has failed yet
    pub fn errno(&self) -> ErrorCode {
        self.errors.code()
    }

    pub fn clear_error(&mut self) {
        self.errors.clear();
    }

    /// Print the last error on stderr
    pub fn perror(&self, prefix: Option<&str>) {
        self.errors.perror(prefix);
    }

    /// `path` relative to the root, or unchanged when it lies outside it
    pub fn strip_root(&self, path: &str) -> String {
        match &self.paths {
            Some(paths) => paths.strip_root(path),
            None => path.to_owned(),
        }
    }

    pub fn is_under_root(&self, path: &str) -> bool {
        self.paths.as_ref().is_some_and(|p| p.is_under_root(path))
    }

    pub fn open_text(&mut self, path: impl AsRef<Path>) -> Result<TextFile> {
        let result = TextFile::open(path);
        self.record(result)
    }

    pub fn read_line<'a>(&mut self, file: &'a mut TextFile) -> Result<Option<&'a str>> {
        match file.read_line() {
            Err(err) => {
                self.errors.record(&err);
                Err(err)
            }
            ok => ok,
        }
    }

    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let result = read_file(path);
        self.record(result)
    }

    pub fn md5_digest(&mut self, path: impl AsRef<Path>) -> Result<Md5Digest> {
        let result = digest::md5_digest(path);
        self.record(result)
    }

    pub fn parse_timestamp(&mut self, text: &str) -> Result<Timestamp> {
        let result = timestamp::parse_timestamp(text);
        self.record(result)
    }

    /// Look up the song lengths of the PSID file at `psid_path`
    ///
    /// Files under the root are looked up by their HVSC path first; anything
    /// else, or a path that is not listed, is looked up by MD5 digest.
    pub fn song_lengths(&mut self, psid_path: &str) -> Result<SongLengths> {
        let result = self.lookup_song_lengths(psid_path);
        self.record(result)
    }

    fn lookup_song_lengths(&self, psid_path: &str) -> Result<SongLengths> {
        let paths = self
            .paths
            .as_ref()
            .ok_or_else(|| HvscError::Invalid("HVSC root is not set".into()))?;

        if paths.is_under_root(psid_path) {
            let mut relative = paths.strip_root(psid_path);
            normalize_separators(&mut relative);
            match SongLengths::find_by_path(paths.sldb(), &relative) {
                Err(HvscError::NotFound(_)) => {
                    debug!("{relative} not listed in SLDB, trying digest");
                }
                found => return found,
            }
        }

        let digest = digest::md5_digest(psid_path)?;
        SongLengths::find_by_digest(paths.sldb(), &digest)
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.errors.record(err);
        }
        result
    }
}
