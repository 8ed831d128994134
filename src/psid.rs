//! PSID/RSID header fields needed to present an HVSC entry.

use crate::error::{HvscError, Result};

/// Smallest valid header (version 1).
pub const MIN_HEADER_SIZE: usize = 0x76;

const OFFSET_VERSION: usize = 0x04;
const OFFSET_DATA: usize = 0x06;
const OFFSET_LOAD: usize = 0x08;
const OFFSET_INIT: usize = 0x0A;
const OFFSET_PLAY: usize = 0x0C;
const OFFSET_SONGS: usize = 0x0E;
const OFFSET_START: usize = 0x10;
const OFFSET_SPEED: usize = 0x12;
const OFFSET_NAME: usize = 0x16;
const OFFSET_AUTHOR: usize = 0x36;
const OFFSET_RELEASED: usize = 0x56;
const STRING_FIELD_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsidHeader {
    /// `PSID` or `RSID`
    pub magic: String,
    pub version: u16,
    pub data_offset: u16,
    pub load_address: u16,
    pub init_address: u16,
    pub play_address: u16,
    pub songs: u16,
    pub start_song: u16,
    pub speed: u32,
    pub name: String,
    pub author: String,
    pub released: String,
}

impl PsidHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_HEADER_SIZE {
            return Err(HvscError::Invalid(format!(
                "PSID header needs {MIN_HEADER_SIZE} bytes, got {}",
                data.len()
            )));
        }
        let magic = &data[0..4];
        if magic != b"PSID" && magic != b"RSID" {
            return Err(HvscError::Invalid("missing PSID/RSID magic".into()));
        }

        Ok(Self {
            magic: String::from_utf8_lossy(magic).into_owned(),
            version: word_be(&data[OFFSET_VERSION..]),
            data_offset: word_be(&data[OFFSET_DATA..]),
            load_address: word_be(&data[OFFSET_LOAD..]),
            init_address: word_be(&data[OFFSET_INIT..]),
            play_address: word_be(&data[OFFSET_PLAY..]),
            songs: word_be(&data[OFFSET_SONGS..]),
            start_song: word_be(&data[OFFSET_START..]),
            speed: longword_be(&data[OFFSET_SPEED..]),
            name: latin1_field(&data[OFFSET_NAME..OFFSET_NAME + STRING_FIELD_SIZE]),
            author: latin1_field(&data[OFFSET_AUTHOR..OFFSET_AUTHOR + STRING_FIELD_SIZE]),
            released: latin1_field(&data[OFFSET_RELEASED..OFFSET_RELEASED + STRING_FIELD_SIZE]),
        })
    }

    pub fn is_rsid(&self) -> bool {
        self.magic == "RSID"
    }

    /// Real load address, taken from the data when the header field is zero.
    pub fn effective_load_address(&self, data: &[u8]) -> Option<u16> {
        if self.load_address != 0 {
            return Some(self.load_address);
        }
        let offset = usize::from(self.data_offset);
        data.get(offset..offset + 2).map(word_le)
    }
}

/// Big endian 16-bit word at the start of `src`.
pub fn word_be(src: &[u8]) -> u16 {
    u16::from_be_bytes([src[0], src[1]])
}

/// Little endian 16-bit word at the start of `src`.
pub fn word_le(src: &[u8]) -> u16 {
    u16::from_le_bytes([src[0], src[1]])
}

/// Big endian 32-bit word at the start of `src`.
pub fn longword_be(src: &[u8]) -> u32 {
    u32::from_be_bytes([src[0], src[1], src[2], src[3]])
}

fn latin1_field(raw: &[u8]) -> String {
    raw.iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Minimal version 2 PSID image with the payload loaded from its first two bytes.
    pub(crate) fn sample_psid(name: &str, songs: u16) -> Vec<u8> {
        let mut data = vec![0u8; 0x7C];
        data[0..4].copy_from_slice(b"PSID");
        data[0x04..0x06].copy_from_slice(&2u16.to_be_bytes());
        data[0x06..0x08].copy_from_slice(&0x7Cu16.to_be_bytes());
        data[0x0A..0x0C].copy_from_slice(&0x1000u16.to_be_bytes());
        data[0x0C..0x0E].copy_from_slice(&0x1003u16.to_be_bytes());
        data[0x0E..0x10].copy_from_slice(&songs.to_be_bytes());
        data[0x10..0x12].copy_from_slice(&1u16.to_be_bytes());
        data[0x16..0x16 + name.len()].copy_from_slice(name.as_bytes());
        data[0x36..0x36 + 11].copy_from_slice(b"Rob Hubbard");
        data[0x56..0x56 + 9].copy_from_slice(b"1985 Elit");
        data.extend_from_slice(&[0x00, 0x10, 0x60]);
        data
    }

    #[test]
    fn parses_header_fields() {
        let data = sample_psid("Commando", 3);
        let header = PsidHeader::parse(&data).unwrap();

        assert_eq!(
            header,
            PsidHeader {
                magic: "PSID".into(),
                version: 2,
                data_offset: 0x7C,
                load_address: 0,
                init_address: 0x1000,
                play_address: 0x1003,
                songs: 3,
                start_song: 1,
                speed: 0,
                name: "Commando".into(),
                author: "Rob Hubbard".into(),
                released: "1985 Elit".into(),
            }
        );
        assert!(!header.is_rsid());
        assert_eq!(header.effective_load_address(&data), Some(0x1000));
    }

    #[test]
    fn rejects_short_or_foreign_data() {
        assert!(matches!(PsidHeader::parse(&[0u8; 10]), Err(HvscError::Invalid(_))));
        let mut data = sample_psid("x", 1);
        data[0..4].copy_from_slice(b"MThd");
        assert!(matches!(PsidHeader::parse(&data), Err(HvscError::Invalid(_))));
    }

    #[test]
    fn word_readers() {
        let bytes = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(word_be(&bytes), 0x1234);
        assert_eq!(word_le(&bytes), 0x3412);
        assert_eq!(longword_be(&bytes), 0x1234_5678);
    }
}
