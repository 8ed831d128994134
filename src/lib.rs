// Copyright (C) 2025 HVSClib contributors
// HVSClib - High Voltage SID Collection library
// This file is part of HVSClib.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-2.0-or-later

//! HVSClib: High Voltage SID Collection database support
//!
//! This library provides the base layer for working with the HVSC text
//! databases (song lengths, STIL, BUGlist): line reading, timestamp and field
//! tag parsing, root path handling and MD5 digests of PSID files.

pub mod core;
pub mod digest;
pub mod error;
pub mod field;
pub mod paths;
pub mod psid;
pub mod session;
pub mod sldb;
pub mod timestamp;

// Re-export commonly used types
pub use crate::core::{TextFile, read_file};
pub use digest::{Md5Digest, md5_digest};
pub use error::{ErrorCode, ErrorState, HvscError, Result, strerror};
pub use field::FieldType;
pub use paths::RootPaths;
pub use psid::PsidHeader;
pub use session::Hvsc;
pub use sldb::SongLengths;
pub use timestamp::{Timestamp, format_timestamp, parse_timestamp};
