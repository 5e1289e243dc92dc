use std::io::Read;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use indexmap::IndexMap;

use super::common::utils::{
    read_blob, read_length, read_length_with_encoding, verify_magic, verify_version,
};
use super::{hash, list, set, sorted_set};
use crate::constants::{encoding, encoding_type, module_op_code, op_code, version};
use crate::reader::ChecksumReader;
use crate::types::{RdbError, RdbOk, RdbResult, Record, RecordKind, Value};

pub(crate) struct DecoderState {
    pub version: u32,
    pub current_database: u64,
    pub aux_fields: IndexMap<Vec<u8>, Vec<u8>>,
}

impl DecoderState {
    pub fn new(version: u32) -> DecoderState {
        DecoderState {
            version,
            current_database: 0,
            aux_fields: IndexMap::new(),
        }
    }
}

pub(crate) enum Step {
    Entry,
    Eof,
}

pub(crate) fn verify_header<R: Read>(input: &mut R) -> RdbResult<u32> {
    verify_magic(input)?;
    verify_version(input)
}

/// Walks framing records until one entry is produced or the end marker is
/// consumed. Expire, idle and frequency opcodes bind to the entry that
/// follows them, so they populate the record and keep reading.
pub(crate) fn next_record<R: Read>(
    input: &mut ChecksumReader<R>,
    state: &mut DecoderState,
    record: &mut Record,
) -> RdbResult<Step> {
    record.reset();

    loop {
        let next_op = input.read_u8()?;

        match next_op {
            op_code::EOF => {
                verify_checksum(input, state.version)?;
                return Ok(Step::Eof);
            }
            op_code::SELECTDB => {
                state.current_database = read_length(input)?;
            }
            op_code::RESIZEDB => {
                let db_size = read_length(input)?;
                let expires_size = read_length(input)?;
                log::debug!("resize hint: {} keys, {} expires", db_size, expires_size);
            }
            op_code::AUX => {
                let aux_key = read_blob(input)?;
                let aux_value = read_blob(input)?;
                state.aux_fields.insert(aux_key, aux_value);
            }
            op_code::MODULE_AUX => {
                skip_module(input)?;
            }
            op_code::EXPIRETIME_MS => {
                let expiretime_ms = input.read_u64::<LittleEndian>()?;
                record.expire_at = Some(expiretime_ms / 1000);
            }
            op_code::EXPIRETIME => {
                let expiretime = input.read_u32::<LittleEndian>()?;
                record.expire_at = Some(expiretime as u64);
            }
            op_code::IDLE => {
                record.idle = Some(read_length(input)?);
            }
            op_code::FREQ => {
                record.freq = Some(input.read_u8()?);
            }
            value_type => {
                record.key = read_blob(input)?;
                record.database = state.current_database;
                record.kind = RecordKind::from_encoding(value_type);
                read_value(input, value_type, record)?;
                return Ok(Step::Entry);
            }
        }
    }
}

fn read_value<R: Read>(
    input: &mut ChecksumReader<R>,
    value_type: u8,
    record: &mut Record,
) -> RdbOk {
    record.value = match value_type {
        encoding_type::STRING => Value::String(read_blob(input)?),
        encoding_type::LIST => Value::List(list::read_linked_list(input)?),
        encoding_type::SET => Value::Set(set::read_set(input)?),
        encoding_type::ZSET => Value::SortedSet(sorted_set::read_sorted_set(input, false)?),
        encoding_type::ZSET_2 => Value::SortedSet(sorted_set::read_sorted_set(input, true)?),
        encoding_type::HASH => Value::Hash(hash::read_hash(input)?),
        encoding_type::HASH_ZIPMAP => Value::Hash(hash::read_hash_zipmap(input)?),
        encoding_type::HASH_ZIPLIST => Value::Hash(hash::read_hash_ziplist(input)?),
        encoding_type::LIST_ZIPLIST => Value::List(list::read_list_ziplist(input)?),
        encoding_type::SET_INTSET => Value::Set(set::read_set_intset(input)?),
        encoding_type::ZSET_ZIPLIST => {
            Value::SortedSet(sorted_set::read_sorted_set_ziplist(input)?)
        }
        encoding_type::LIST_QUICKLIST => Value::List(list::read_quicklist(input)?),
        // Pre-GA module payloads carry no framing and cannot be skipped.
        encoding_type::MODULE => return Err(RdbError::UnsupportedEncoding(value_type)),
        encoding_type::MODULE_2 => {
            skip_module(input)?;
            Value::Empty
        }
        encoding_type::STREAM_LIST_PACKS => {
            skip_stream(input)?;
            Value::Empty
        }
        unknown_type => {
            log::debug!("unrecognized value type {}, payload left empty", unknown_type);
            Value::Empty
        }
    };
    Ok(())
}

fn verify_checksum<R: Read>(input: &mut ChecksumReader<R>, file_version: u32) -> RdbOk {
    if file_version < version::CHECKSUM_MINIMUM {
        return Ok(());
    }

    let computed = input.checksum();
    let mut trailer = [0; 8];
    input.read_raw(&mut trailer).map_err(RdbError::from)?;
    let stored = LittleEndian::read_u64(&trailer);

    // An all-zero trailer means checksumming was disabled at write time.
    if stored != 0 && stored != computed {
        return Err(RdbError::Corruption {
            context: "checksum",
            message: format!("stored {:#018x}, computed {:#018x}", stored, computed),
        });
    }
    Ok(())
}

/// Module payloads are a typed-field stream terminated by an end marker;
/// each field is skipped by shape without interpreting it.
fn skip_module<R: Read>(input: &mut ChecksumReader<R>) -> RdbOk {
    let _module_id = read_length(input)?;

    loop {
        let field_op = read_length(input)?;
        match field_op {
            module_op_code::EOF => return Ok(()),
            module_op_code::SINT | module_op_code::UINT => {
                read_length(input)?;
            }
            module_op_code::FLOAT => input.skip(4)?,
            module_op_code::DOUBLE => input.skip(8)?,
            module_op_code::STRING => skip_blob(input)?,
            other => {
                return Err(RdbError::Corruption {
                    context: "module payload",
                    message: format!("unknown field opcode: {}", other),
                });
            }
        }
    }
}

/// Skips a stream payload: the node listpacks, the stream metadata and the
/// consumer groups with their pending-entry lists.
fn skip_stream<R: Read>(input: &mut ChecksumReader<R>) -> RdbOk {
    let listpacks = read_length(input)?;
    for _ in 0..listpacks {
        skip_blob(input)?; // node key, a raw stream id
        skip_blob(input)?; // packed entries
    }

    read_length(input)?; // element count
    read_length(input)?; // last id, milliseconds
    read_length(input)?; // last id, sequence

    let groups = read_length(input)?;
    for _ in 0..groups {
        skip_blob(input)?; // group name
        read_length(input)?; // group last id, milliseconds
        read_length(input)?; // group last id, sequence

        let pending = read_length(input)?;
        for _ in 0..pending {
            input.skip(16)?; // entry id
            input.skip(8)?; // delivery time
            read_length(input)?; // delivery count
        }

        let consumers = read_length(input)?;
        for _ in 0..consumers {
            skip_blob(input)?; // consumer name
            input.skip(8)?; // seen time

            let pending = read_length(input)?;
            for _ in 0..pending {
                input.skip(16)?; // entry id
            }
        }
    }
    Ok(())
}

fn skip_blob<R: Read>(input: &mut ChecksumReader<R>) -> RdbOk {
    let (len, is_encoded) = read_length_with_encoding(input)?;

    let skip_bytes = if is_encoded {
        match len {
            encoding::INT8 => 1,
            encoding::INT16 => 2,
            encoding::INT32 => 4,
            encoding::LZF => {
                let compressed_length = read_length(input)?;
                let _real_length = read_length(input)?;
                compressed_length
            }
            _ => {
                return Err(RdbError::Format {
                    context: "string",
                    message: format!("unknown string encoding: {}", len),
                });
            }
        }
    } else {
        len
    };

    input.skip(skip_bytes)
}
