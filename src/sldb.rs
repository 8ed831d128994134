//! Song length database (`DOCUMENTS/Songlengths.md5`) lookups.
//!
//! The file is a flat list of entries, each a path comment followed by a
//! digest line:
//!
//! ```text
//! [Database]
//! ; /MUSICIANS/H/Hubbard_Rob/Commando.sid
//! 2e7b3f4e4e6c5a0f4c1b5e2d3a7c9b11=4:07 0:06 0:05.5
//! ```
//!
//! Timestamps may carry an attribute in parentheses, e.g. `1:02(G)`, which is
//! skipped.

use std::path::Path;

use log::{debug, warn};

use crate::core::TextFile;
use crate::digest::{DIGEST_HEX_LEN, Md5Digest};
use crate::error::{HvscError, Result};
use crate::paths::normalize_separators;
use crate::timestamp::parse_timestamp;

/// Song lengths of one PSID file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongLengths {
    pub digest: Md5Digest,
    /// HVSC-relative path from the comment above the entry, when present.
    pub path: Option<String>,
    /// Length of each subtune in milliseconds.
    pub lengths: Vec<u64>,
}

impl SongLengths {
    /// Find the entry for `digest`.
    pub fn find_by_digest(sldb: impl AsRef<Path>, digest: &Md5Digest) -> Result<Self> {
        let hex = digest.to_hex();
        let mut file = TextFile::open(sldb)?;

        loop {
            let parsed = match file.read_line()? {
                None => break,
                Some(line) if is_entry_for(line, &hex) => Self::parse_entry(line),
                Some(_) => continue,
            };
            let (digest, lengths) = parsed.inspect_err(|e| {
                warn!("malformed SLDB entry at line {}: {e}", file.line_number());
            })?;
            let path = file.previous_line().and_then(comment_path);
            debug!("SLDB hit for {hex} at line {}", file.line_number());
            return Ok(Self {
                digest,
                path,
                lengths,
            });
        }
        Err(HvscError::NotFound(format!("no SLDB entry for digest {hex}")))
    }

    /// Find the entry listed under the HVSC-relative `path`.
    pub fn find_by_path(sldb: impl AsRef<Path>, path: &str) -> Result<Self> {
        let mut wanted = path.to_owned();
        normalize_separators(&mut wanted);
        if !wanted.starts_with('/') {
            wanted.insert(0, '/');
        }

        let mut file = TextFile::open(sldb)?;
        loop {
            let found = match file.read_line()? {
                None => break,
                Some(line) => comment_path(line).is_some_and(|p| p == wanted),
            };
            if !found {
                continue;
            }

            let parsed = match file.read_line()? {
                Some(line) => Self::parse_entry(line),
                None => {
                    return Err(HvscError::Invalid(format!(
                        "SLDB ends after the comment for {wanted}"
                    )));
                }
            };
            let (digest, lengths) = parsed.inspect_err(|e| {
                warn!("malformed SLDB entry at line {}: {e}", file.line_number());
            })?;
            return Ok(Self {
                digest,
                path: Some(wanted),
                lengths,
            });
        }
        Err(HvscError::NotFound(format!("no SLDB entry for {wanted}")))
    }

    /// Parse a `digest=lengths` line.
    pub fn parse_entry(line: &str) -> Result<(Md5Digest, Vec<u64>)> {
        let Some((hex, times)) = line.split_once('=') else {
            return Err(HvscError::Invalid(format!("SLDB entry without '=': {line}")));
        };
        let digest = Md5Digest::from_hex(hex.trim())?;

        let base = hex.len() + 1;
        let mut lengths = Vec::new();
        let mut pos = 0;
        loop {
            pos += leading_whitespace(&times[pos..]);
            if pos >= times.len() {
                break;
            }

            let ts = parse_timestamp(&times[pos..]).map_err(|e| match e {
                HvscError::Timestamp { position } => HvscError::Timestamp {
                    position: base + pos + position,
                },
                other => other,
            })?;
            lengths.push(ts.millis);
            pos += ts.consumed;

            if times[pos..].starts_with('(') {
                match times[pos..].find(')') {
                    Some(close) => pos += close + 1,
                    None => {
                        return Err(HvscError::Invalid(format!(
                            "unterminated attribute in SLDB entry: {line}"
                        )));
                    }
                }
            }
        }
        Ok((digest, lengths))
    }

    /// Length of subtune `song` (1-based).
    pub fn song(&self, song: usize) -> Option<u64> {
        song.checked_sub(1).and_then(|i| self.lengths.get(i)).copied()
    }
}

fn is_entry_for(line: &str, hex: &str) -> bool {
    line.len() > DIGEST_HEX_LEN
        && line.as_bytes()[DIGEST_HEX_LEN] == b'='
        && line[..DIGEST_HEX_LEN].eq_ignore_ascii_case(hex)
}

fn comment_path(line: &str) -> Option<String> {
    line.strip_prefix(';').map(|rest| rest.trim().to_owned())
}

fn leading_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    pub(crate) fn write_sldb(dir: &Path, entries: &[(&str, &Md5Digest, &str)]) -> PathBuf {
        let mut text = String::from("[Database]\r\n");
        for (path, digest, times) in entries {
            text.push_str(&format!("; {path}\r\n{digest}={times}\r\n"));
        }
        let sldb = dir.join("Songlengths.md5");
        fs::write(&sldb, text).unwrap();
        sldb
    }

    #[test]
    fn parses_entry_with_attributes() {
        let digest = Md5Digest::of_bytes(b"tune");
        let line = format!("{digest}=4:07 0:06(G) 0:05.5(M)  1:00");
        let (parsed, lengths) = SongLengths::parse_entry(&line).unwrap();
        assert_eq!(parsed, digest);
        assert_eq!(lengths, vec![247_000, 6_000, 5_500, 60_000]);
    }

    #[test]
    fn bad_timestamp_position_is_line_relative() {
        let digest = Md5Digest::of_bytes(b"tune");
        let line = format!("{digest}=1:00 1:75");
        let err = SongLengths::parse_entry(&line).unwrap_err();
        assert!(matches!(err, HvscError::Timestamp { position } if position == DIGEST_HEX_LEN + 9));
    }

    #[test]
    fn entry_without_equals_is_invalid() {
        assert!(matches!(
            SongLengths::parse_entry("; /just/a/comment"),
            Err(HvscError::Invalid(_))
        ));
    }

    #[test]
    fn finds_by_digest_with_path_from_comment() {
        let dir = TempDir::new().unwrap();
        let commando = Md5Digest::of_bytes(b"commando");
        let delta = Md5Digest::of_bytes(b"delta");
        let sldb = write_sldb(
            dir.path(),
            &[
                ("/MUSICIANS/H/Hubbard_Rob/Commando.sid", &commando, "4:07 0:06 0:05"),
                ("/MUSICIANS/G/Galway_Martin/Delta.sid", &delta, "12:01.250"),
            ],
        );

        let found = SongLengths::find_by_digest(&sldb, &delta).unwrap();
        assert_eq!(
            found,
            SongLengths {
                digest: delta,
                path: Some("/MUSICIANS/G/Galway_Martin/Delta.sid".into()),
                lengths: vec![721_250],
            }
        );
        assert_eq!(found.song(1), Some(721_250));
        assert_eq!(found.song(0), None);
        assert_eq!(found.song(2), None);
    }

    #[test]
    fn finds_by_path_with_backslashes() {
        let dir = TempDir::new().unwrap();
        let commando = Md5Digest::of_bytes(b"commando");
        let sldb = write_sldb(
            dir.path(),
            &[("/MUSICIANS/H/Hubbard_Rob/Commando.sid", &commando, "4:07 0:06 0:05")],
        );

        let found =
            SongLengths::find_by_path(&sldb, r"\MUSICIANS\H\Hubbard_Rob\Commando.sid").unwrap();
        assert_eq!(found.digest, commando);
        assert_eq!(found.lengths, vec![247_000, 6_000, 5_000]);

        let relative = SongLengths::find_by_path(&sldb, "MUSICIANS/H/Hubbard_Rob/Commando.sid");
        assert!(relative.is_ok());
    }

    #[test]
    fn misses_are_not_found() {
        let dir = TempDir::new().unwrap();
        let commando = Md5Digest::of_bytes(b"commando");
        let sldb = write_sldb(dir.path(), &[("/A.sid", &commando, "1:00")]);

        let other = Md5Digest::of_bytes(b"other");
        assert!(matches!(
            SongLengths::find_by_digest(&sldb, &other),
            Err(HvscError::NotFound(_))
        ));
        assert!(matches!(
            SongLengths::find_by_path(&sldb, "/B.sid"),
            Err(HvscError::NotFound(_))
        ));
    }

    #[test]
    fn malformed_matching_entry_is_reported() {
        let dir = TempDir::new().unwrap();
        let commando = Md5Digest::of_bytes(b"commando");
        let sldb = write_sldb(dir.path(), &[("/A.sid", &commando, "1:00 9:99")]);
        assert!(matches!(
            SongLengths::find_by_digest(&sldb, &commando),
            Err(HvscError::Timestamp { .. })
        ));
    }
}
