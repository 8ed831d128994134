// Copyright (C) 2025 HVSClib contributors
// HVSClib - High Voltage SID Collection library
// This file is part of HVSClib.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-2.0-or-later

pub mod loader;
pub mod reader;

// Re-export commonly used core types here
pub use loader::read_file;
pub use reader::TextFile;
