use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("unsupported model version {version}")]
    UnsupportedVersion { version: u32 },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    UnexpectedEof {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("{table} table at offset {offset:#x} runs past end of file (need {need} bytes, have {have})")]
    TableOutOfBounds {
        table: &'static str,
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("string at offset {offset:#x} is not valid UTF-8: {source}")]
    InvalidString {
        offset: usize,
        source: std::string::FromUtf8Error,
    },

    /// Caller misuse on write, not bad input data: the value does not fit
    /// its fixed-width field. Writes are rejected, never truncated.
    #[error("string {value:?} is {len} bytes, exceeding the {width}-byte field")]
    FieldTooLong {
        value: String,
        len: usize,
        width: usize,
    },

    #[error("{table} index {index} out of range (table has {len} entries)")]
    BadIndex {
        table: &'static str,
        index: i64,
        len: usize,
    },

    #[error("{table} range {start}..{start}+{count} out of range (table has {len} entries)")]
    BadRange {
        table: &'static str,
        start: u32,
        count: u32,
        len: usize,
    },

    #[error("invalid {field} value {value} at offset {offset:#x}")]
    InvalidValue {
        field: &'static str,
        value: u32,
        offset: usize,
    },

    #[error("polygon {polygon} has {count} vertices, minimum is 3")]
    DegeneratePolygon { polygon: usize, count: usize },

    /// Contract error on write: the polygon's vertex list does not fit the
    /// u8 count field.
    #[error("polygon {polygon} has {count} vertices, exceeding the u8 count field")]
    TooManyVertices { polygon: usize, count: usize },

    /// Contract error on write: the index does not fit the 16-bit index
    /// width used by pre-v6 formats.
    #[error("index {index} does not fit the 16-bit index width of version {version}")]
    IndexTooWide { index: u32, version: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
