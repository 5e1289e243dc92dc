use std::io;

use indexmap::IndexMap;
use thiserror::Error;

use crate::constants::encoding_type;

#[derive(Error, Debug)]
pub enum RdbError {
    #[error("IO error: {0}")]
    Io(io::Error),
    #[error("input ended while reading {0}")]
    Truncated(&'static str),
    #[error("bad {context}: {message}")]
    Format {
        context: &'static str,
        message: String,
    },
    #[error("unsupported encoding type: {0}")]
    UnsupportedEncoding(u8),
    #[error("lzf decompression failed: {0:?}")]
    Decompression(lzf::LzfError),
    #[error("corrupt {context}: {message}")]
    Corruption {
        context: &'static str,
        message: String,
    },
    #[error("cursor is no longer valid")]
    InvalidCursor,
}

impl From<io::Error> for RdbError {
    fn from(e: io::Error) -> RdbError {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            RdbError::Truncated("input")
        } else {
            RdbError::Io(e)
        }
    }
}

pub type RdbResult<T> = Result<T, RdbError>;

pub type RdbOk = RdbResult<()>;

/// Logical object kind behind a value-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    String,
    List,
    Set,
    SortedSet,
    Hash,
    Stream,
    Module,
    /// Forward-compatibility placeholder carrying the raw tag byte.
    Unrecognized(u8),
}

impl RecordKind {
    pub fn from_encoding(enc_type: u8) -> RecordKind {
        match enc_type {
            encoding_type::STRING => RecordKind::String,
            encoding_type::LIST | encoding_type::LIST_ZIPLIST | encoding_type::LIST_QUICKLIST => {
                RecordKind::List
            }
            encoding_type::SET | encoding_type::SET_INTSET => RecordKind::Set,
            encoding_type::ZSET | encoding_type::ZSET_2 | encoding_type::ZSET_ZIPLIST => {
                RecordKind::SortedSet
            }
            encoding_type::HASH | encoding_type::HASH_ZIPMAP | encoding_type::HASH_ZIPLIST => {
                RecordKind::Hash
            }
            encoding_type::STREAM_LIST_PACKS => RecordKind::Stream,
            encoding_type::MODULE | encoding_type::MODULE_2 => RecordKind::Module,
            unknown => RecordKind::Unrecognized(unknown),
        }
    }
}

impl Default for RecordKind {
    fn default() -> RecordKind {
        RecordKind::Unrecognized(0)
    }
}

/// Decoded payload of one entry. Exactly one variant is populated per entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Stream, module and unrecognized entries carry no decoded payload.
    #[default]
    Empty,
    String(Vec<u8>),
    List(Vec<Vec<u8>>),
    Set(Vec<Vec<u8>>),
    Hash(IndexMap<Vec<u8>, Vec<u8>>),
    SortedSet(Vec<(f64, Vec<u8>)>),
}

/// One decoded entry of the snapshot.
///
/// The storage is owned by the cursor and reused across steps; copy out
/// anything that must survive the next step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub database: u64,
    pub kind: RecordKind,
    /// Absolute expiry in seconds.
    pub expire_at: Option<u64>,
    pub idle: Option<u64>,
    pub freq: Option<u8>,
    pub key: Vec<u8>,
    pub value: Value,
}

impl Record {
    pub(crate) fn reset(&mut self) {
        self.kind = RecordKind::default();
        self.expire_at = None;
        self.idle = None;
        self.freq = None;
        self.key.clear();
        self.value = Value::Empty;
    }
}
