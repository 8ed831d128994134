//! MD5 digests of PSID files.
//!
//! The SLDB is keyed by the MD5 of the complete PSID file, which lets song
//! lengths be found for files that live outside the HVSC directory tree.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::core::loader::READ_CHUNK_SIZE;
use crate::error::{HvscError, Result};

/// Size of a binary MD5 digest.
pub const DIGEST_SIZE: usize = 16;
/// Length of the hexadecimal rendering.
pub const DIGEST_HEX_LEN: usize = DIGEST_SIZE * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Md5Digest([u8; DIGEST_SIZE]);

impl Md5Digest {
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(data);
        Self::finish(hasher)
    }

    /// Parse a 32 character hex digest as found in the SLDB.
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != DIGEST_HEX_LEN {
            return Err(HvscError::Digest(format!(
                "expected {DIGEST_HEX_LEN} hex digits, got {}",
                bytes.len()
            )));
        }

        let mut out = [0u8; DIGEST_SIZE];
        for (slot, pair) in out.iter_mut().zip(bytes.chunks_exact(2)) {
            let hi = hex_value(pair[0]);
            let lo = hex_value(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => *slot = (hi << 4) | lo,
                _ => return Err(HvscError::Digest(format!("invalid hex digest '{text}'"))),
            }
        }
        Ok(Self(out))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Lowercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    fn finish(hasher: Md5) -> Self {
        let mut out = [0u8; DIGEST_SIZE];
        out.copy_from_slice(&hasher.finalize());
        Self(out)
    }
}

impl fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Stream `path` through MD5.
pub fn md5_digest(path: impl AsRef<Path>) -> Result<Md5Digest> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| HvscError::io(path, e))?;
    hash_stream(file).map_err(|e| HvscError::io(path, e))
}

fn hash_stream<R: Read>(mut source: R) -> io::Result<Md5Digest> {
    let mut hasher = Md5::new();
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    loop {
        match source.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => hasher.update(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(Md5Digest::finish(hasher))
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
