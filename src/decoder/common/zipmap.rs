use super::blob::Blob;
use crate::types::{RdbError, RdbResult};

const ZIPMAP_END: u8 = 0xFF;
const ZIPMAP_BIGLEN: u8 = 254;

/// Decodes the legacy packed map into key/value pairs in stored order.
pub fn decode_map(data: &[u8]) -> RdbResult<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut blob = Blob::new(data, "zipmap");

    // Leading entry count is only trustworthy below 254; the walk ends at
    // the terminator either way.
    let _zmlen = blob.u8()?;

    let mut pairs = Vec::new();
    loop {
        if blob.peek_u8()? == ZIPMAP_END {
            blob.skip(1)?;
            break;
        }

        let key_len = read_entry_length(&mut blob)?;
        let key = blob.bytes(key_len)?.to_vec();

        let value_len = read_entry_length(&mut blob)?;
        let free = blob.u8()? as usize;
        let value = blob.bytes(value_len)?.to_vec();
        // Free bytes pad the tail of the value slot.
        blob.skip(free)?;

        pairs.push((key, value));
    }
    Ok(pairs)
}

fn read_entry_length(blob: &mut Blob) -> RdbResult<usize> {
    let first = blob.u8()?;
    match first {
        ZIPMAP_BIGLEN => Ok(blob.u32_le()? as usize),
        ZIPMAP_END => Err(RdbError::Corruption {
            context: "zipmap",
            message: "end marker inside an entry".to_string(),
        }),
        _ => Ok(first as usize),
    }
}
