// Copyright (C) 2025 HVSClib contributors
// HVSClib - High Voltage SID Collection library
// This file is part of HVSClib.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 2 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-2.0-or-later

//! Whole-file loader used for PSID files and other binary data.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use log::trace;

use crate::error::{HvscError, Result};

/// Size of the chunks handed to `read`.
pub const READ_CHUNK_SIZE: usize = 65536;

/// Largest file the loader accepts (2 GiB - 1).
pub const MAX_FILE_SIZE: usize = i32::MAX as usize;

/// Read the whole of `path` into memory.
///
/// The buffer starts at one chunk and doubles whenever it is full. Nothing is
/// returned on failure; partially read data is dropped.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| HvscError::io(path, e))?;
    read_stream(file, path, MAX_FILE_SIZE)
}

fn read_stream<R: Read>(mut source: R, path: &Path, limit: usize) -> Result<Vec<u8>> {
    let mut size = READ_CHUNK_SIZE;
    let mut data = vec![0u8; size];
    let mut offset = 0;

    loop {
        if offset == size {
            size *= 2;
            trace!("growing load buffer for '{}' to {size} bytes", path.display());
            data.resize(size, 0);
        }

        let chunk = &mut data[offset..offset + READ_CHUNK_SIZE];
        let got = read_chunk(&mut source, chunk).map_err(|e| HvscError::io(path, e))?;
        let total = offset + got;
        if total > limit {
            return Err(HvscError::FileTooLarge {
                path: path.to_path_buf(),
                limit,
            });
        }
        if got < READ_CHUNK_SIZE {
            // a short chunk is the end of the stream
            data.truncate(total);
            return Ok(data);
        }
        offset = total;
    }
}

/// Fill `buf` as far as the stream allows.
fn read_chunk<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn load(contents: &[u8]) -> Vec<u8> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, contents).unwrap();
        read_file(&path).unwrap()
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn empty_file_loads_as_empty_buffer() {
        assert!(load(&[]).is_empty());
    }

    #[test]
    fn exact_chunk_has_no_trailing_garbage() {
        let data = pattern(READ_CHUNK_SIZE);
        let loaded = load(&data);
        assert_eq!(loaded.len(), READ_CHUNK_SIZE);
        assert!(loaded == data);
    }

    #[test]
    fn multi_chunk_file_loads_completely() {
        let data = pattern(READ_CHUNK_SIZE * 3 + 123);
        let loaded = load(&data);
        assert_eq!(loaded.len(), data.len());
        assert!(loaded == data);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_file(dir.path().join("absent.sid")).unwrap_err();
        assert!(matches!(err, HvscError::Io { .. }));
    }

    struct Trickle<'a> {
        data: &'a [u8],
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            // never more than 7 bytes per call
            let n = self.data.len().min(buf.len()).min(7);
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn short_reads_do_not_end_the_stream_early() {
        let data = pattern(READ_CHUNK_SIZE + 50);
        let loaded = read_stream(Trickle { data: &data }, Path::new("trickle"), MAX_FILE_SIZE)
            .unwrap();
        assert!(loaded == data);
    }

    struct Broken {
        remaining: usize,
    }

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::other("device gone"));
            }
            let n = self.remaining.min(buf.len());
            buf[..n].fill(0xAA);
            self.remaining -= n;
            Ok(n)
        }
    }

    #[test]
    fn read_error_discards_partial_data() {
        let result = read_stream(
            Broken {
                remaining: READ_CHUNK_SIZE + 10,
            },
            Path::new("broken"),
            MAX_FILE_SIZE,
        );
        assert!(matches!(result, Err(HvscError::Io { .. })));
    }

    #[test]
    fn oversized_stream_is_rejected() {
        let data = pattern(READ_CHUNK_SIZE * 2);
        let err = read_stream(&data[..], Path::new("big"), READ_CHUNK_SIZE).unwrap_err();
        assert!(matches!(
            err,
            HvscError::FileTooLarge {
                limit: READ_CHUNK_SIZE,
                ..
            }
        ));
    }
}
