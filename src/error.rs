// Copyright (C) 2025 HVSClib contributors
// HVSClib - High Voltage SID Collection library
// This file is part of HVSClib.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-2.0-or-later

//! Error codes, the library error type and the sticky last-error slot.
//!
//! Every fallible function in the crate returns [`Result`]. Callers that want
//! the classic "check the return value, then inspect the last error" flow go
//! through [`crate::Hvsc`], which records each failure in an [`ErrorState`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Message returned by [`strerror`] for codes outside the known range.
pub const UNKNOWN_ERROR_MESSAGE: &str = "<unknown error code>";

/// Closed set of library error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ErrorCode {
    #[default]
    Ok = 0,
    Io = 1,
    FileTooLarge = 2,
    Digest = 3,
    Timestamp = 4,
    NotFound = 5,
    Invalid = 6,
}

impl ErrorCode {
    /// Number of codes, `Ok` included.
    pub const COUNT: i32 = 7;

    const ALL: [ErrorCode; Self::COUNT as usize] = [
        ErrorCode::Ok,
        ErrorCode::Io,
        ErrorCode::FileTooLarge,
        ErrorCode::Digest,
        ErrorCode::Timestamp,
        ErrorCode::NotFound,
        ErrorCode::Invalid,
    ];

    pub fn from_i32(n: i32) -> Option<Self> {
        usize::try_from(n).ok().and_then(|i| Self::ALL.get(i)).copied()
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Ok => "OK",
            ErrorCode::Io => "I/O error",
            ErrorCode::FileTooLarge => "file too large error",
            ErrorCode::Digest => "digest error",
            ErrorCode::Timestamp => "malformed timestamp",
            ErrorCode::NotFound => "object not found",
            ErrorCode::Invalid => "invalid data or operation",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Map a numeric error code to its fixed message.
pub fn strerror(n: i32) -> &'static str {
    ErrorCode::from_i32(n).map_or(UNKNOWN_ERROR_MESSAGE, ErrorCode::message)
}

/// Errors produced by the HVSC library.
#[derive(Debug, Error)]
pub enum HvscError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file '{}' exceeds {limit} bytes", .path.display())]
    FileTooLarge { path: PathBuf, limit: usize },
    #[error("digest error: {0}")]
    Digest(String),
    #[error("malformed timestamp at offset {position}")]
    Timestamp { position: usize },
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("invalid data or operation: {0}")]
    Invalid(String),
}

impl HvscError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HvscError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            HvscError::Io { .. } => ErrorCode::Io,
            HvscError::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            HvscError::Digest(_) => ErrorCode::Digest,
            HvscError::Timestamp { .. } => ErrorCode::Timestamp,
            HvscError::NotFound(_) => ErrorCode::NotFound,
            HvscError::Invalid(_) => ErrorCode::Invalid,
        }
    }

    /// Underlying OS error number, for I/O errors that carry one.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            HvscError::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HvscError>;

/// Sticky record of the most recent failure.
///
/// Successful operations never reset it, so an `Ok` code only means nothing
/// has failed since the state was created or [`ErrorState::clear`]ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    code: ErrorCode,
    os_error: Option<i32>,
    detail: Option<String>,
}

impl ErrorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, err: &HvscError) {
        self.code = err.code();
        self.os_error = err.raw_os_error();
        self.detail = Some(err.to_string());
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn os_error(&self) -> Option<i32> {
        self.os_error
    }

    /// Full text of the last recorded error, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Render the diagnostic line written by [`ErrorState::perror`].
    ///
    /// I/O errors get the OS error number and its description appended.
    pub fn format(&self, prefix: Option<&str>) -> String {
        let mut line = String::new();
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            line.push_str(prefix);
            line.push_str(": ");
        }
        line.push_str(&format!("{}: {}", self.code.as_i32(), self.code.message()));
        if self.code == ErrorCode::Io {
            if let Some(errno) = self.os_error {
                let description = io::Error::from_raw_os_error(errno);
                line.push_str(&format!(" ({errno}: {description})"));
            }
        }
        line
    }

    /// Print the last error on stderr, optionally prefixed.
    pub fn perror(&self, prefix: Option<&str>) {
        eprintln!("{}", self.format(prefix));
    }
}
