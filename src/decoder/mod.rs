mod common;
mod hash;
mod list;
mod rdb;
mod set;
mod sorted_set;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;

use self::rdb::{DecoderState, Step};
use crate::constants::version;
use crate::reader::ChecksumReader;
use crate::types::{RdbError, RdbOk, RdbResult, Record};

/// Forward-only cursor over the entries of a snapshot.
///
/// The cursor starts valid; each `step` either loads the next entry into
/// [`current_record`](RdbParser::current_record), or consumes the end
/// marker and goes invalid. Any decode error is terminal.
pub struct RdbParser<R: Read> {
    input: ChecksumReader<R>,
    state: DecoderState,
    record: Record,
    status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ready,
    Loaded,
    Done,
    Failed,
}

/// Opens a snapshot file and verifies its header.
pub fn open<P: AsRef<Path>>(path: P) -> RdbResult<RdbParser<BufReader<File>>> {
    let file = File::open(path)?;
    RdbParser::new(BufReader::new(file))
}

impl<R: Read> RdbParser<R> {
    /// Wraps any byte source, verifying the magic tag and version.
    pub fn new(input: R) -> RdbResult<RdbParser<R>> {
        let mut input = ChecksumReader::new(input);
        let file_version = rdb::verify_header(&mut input)?;
        if file_version < version::CHECKSUM_MINIMUM {
            input.disable_checksum();
        }

        Ok(RdbParser {
            input,
            state: DecoderState::new(file_version),
            record: Record::default(),
            status: Status::Ready,
        })
    }

    /// Advances by exactly one entry, or consumes the end marker.
    ///
    /// Stepping a cursor that is no longer valid is a caller error and
    /// fails with [`RdbError::InvalidCursor`].
    pub fn step(&mut self) -> RdbOk {
        match self.status {
            Status::Done | Status::Failed => return Err(RdbError::InvalidCursor),
            Status::Ready | Status::Loaded => {}
        }

        match rdb::next_record(&mut self.input, &mut self.state, &mut self.record) {
            Ok(Step::Entry) => {
                self.status = Status::Loaded;
                Ok(())
            }
            Ok(Step::Eof) => {
                self.status = Status::Done;
                Ok(())
            }
            Err(e) => {
                self.status = Status::Failed;
                Err(e)
            }
        }
    }

    /// False once the end marker is consumed or a step has failed.
    pub fn valid(&self) -> bool {
        matches!(self.status, Status::Ready | Status::Loaded)
    }

    /// Entry loaded by the most recent successful step. Contents are
    /// unspecified before the first step and after the cursor goes
    /// invalid; the storage is reused on the next step.
    pub fn current_record(&self) -> &Record {
        &self.record
    }

    /// Format version declared in the file header.
    pub fn version(&self) -> u32 {
        self.state.version
    }

    /// Running checksum over the bytes consumed so far.
    pub fn checksum(&self) -> u64 {
        self.input.checksum()
    }

    /// Auxiliary key/value metadata seen so far, in file order.
    pub fn aux_fields(&self) -> &IndexMap<Vec<u8>, Vec<u8>> {
        &self.state.aux_fields
    }
}
