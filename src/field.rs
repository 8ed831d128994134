//! Field tags used by STIL.txt and BUGlist.txt.
//!
//! Both files put a right-justified, eight character tag at the start of each
//! field line (`  TITLE:`, `COMMENT:`); continuation lines are indented by
//! a full tag width or more. Classification is a fixed-column prefix match,
//! not a general `key: value` parser; the only slack allowed is a tag pushed
//! a few columns right of its fixed layout.

/// Width of a field tag, colon included.
pub const TAG_WIDTH: usize = 8;

/// Index reported for lines that carry no field tag.
pub const FIELD_INVALID: i32 = -1;

/// Display string for an out of range field index.
pub const INVALID_DISPLAY: &str = "<invalid>";

/// Known STIL/BUGlist fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Artist,
    Author,
    /// Only found in BUGlist.txt.
    Bug,
    Comment,
    Name,
    Title,
}

struct FieldSpec {
    kind: FieldType,
    tag: &'static str,
    display: &'static str,
}

impl FieldSpec {
    fn keyword(&self) -> &'static str {
        self.tag.trim_start_matches(' ')
    }
}

// Order is the match order and follows the `FieldType` discriminants.
static FIELDS: [FieldSpec; FieldType::COUNT] = [
    FieldSpec {
        kind: FieldType::Artist,
        tag: " ARTIST:",
        display: " {artist}",
    },
    FieldSpec {
        kind: FieldType::Author,
        tag: " AUTHOR:",
        display: " {author}",
    },
    FieldSpec {
        kind: FieldType::Bug,
        tag: "    BUG:",
        display: "    {bug}",
    },
    FieldSpec {
        kind: FieldType::Comment,
        tag: "COMMENT:",
        display: "{comment}",
    },
    FieldSpec {
        kind: FieldType::Name,
        tag: "   NAME:",
        display: "   {name}",
    },
    FieldSpec {
        kind: FieldType::Title,
        tag: "  TITLE:",
        display: "  {title}",
    },
];

impl FieldType {
    pub const COUNT: usize = 6;

    /// Classify `line` by its first [`TAG_WIDTH`] bytes. First match wins.
    ///
    /// A tag indented further than its fixed layout, but by less than a full
    /// tag width, is also accepted. A tag left of its column never is.
    pub fn classify(line: &str) -> Option<Self> {
        let bytes = line.as_bytes();
        if let Some(field) = FIELDS
            .iter()
            .find(|field| bytes.starts_with(field.tag.as_bytes()))
        {
            return Some(field.kind);
        }

        // continuation lines are indented a full tag width
        let indent = bytes.iter().take_while(|&&b| b == b' ').count();
        if indent >= TAG_WIDTH {
            return None;
        }
        FIELDS
            .iter()
            .find(|field| {
                let keyword = field.keyword();
                indent + keyword.len() >= TAG_WIDTH
                    && bytes[indent..].starts_with(keyword.as_bytes())
            })
            .map(|field| field.kind)
    }

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| FIELDS.get(i))
            .map(|field| field.kind)
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    /// The tag as it appears in the database, e.g. `"  TITLE:"`.
    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    /// Label used when dumping parsed entries, e.g. `"  {title}"`.
    pub fn display(self) -> &'static str {
        self.spec().display
    }

    /// Text following the tag on a line classified as this field.
    pub fn value(self, line: &str) -> &str {
        line.trim_start_matches(' ')
            .strip_prefix(self.spec().keyword())
            .unwrap_or("")
    }

    fn spec(self) -> &'static FieldSpec {
        &FIELDS[self as usize]
    }
}

/// Field index of `line`, or [`FIELD_INVALID`].
pub fn field_type_index(line: &str) -> i32 {
    FieldType::classify(line).map_or(FIELD_INVALID, FieldType::index)
}

/// Display string for a field index.
pub fn field_display(index: i32) -> &'static str {
    FieldType::from_index(index).map_or(INVALID_DISPLAY, FieldType::display)
}

/// True if `line` holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b.is_ascii_whitespace())
}

/// True if the first non-whitespace character of `line` is `#`.
pub fn is_comment(line: &str) -> bool {
    line.trim_start_matches(|c: char| c.is_ascii_whitespace())
        .starts_with('#')
}
