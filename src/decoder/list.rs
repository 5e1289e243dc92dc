use std::io::Read;

use super::common::utils::{read_blob, read_length, read_sequence};
use super::common::ziplist;
use crate::types::RdbResult;

pub fn read_linked_list<R: Read>(input: &mut R) -> RdbResult<Vec<Vec<u8>>> {
    read_sequence(input, read_blob)
}

pub fn read_list_ziplist<R: Read>(input: &mut R) -> RdbResult<Vec<Vec<u8>>> {
    let data = read_blob(input)?;
    ziplist::decode_list(&data)
}

/// A quicklist is a length-prefixed run of packed-sequence blobs; the
/// decoded elements concatenate into one flat list.
pub fn read_quicklist<R: Read>(input: &mut R) -> RdbResult<Vec<Vec<u8>>> {
    let len = read_length(input)?;
    let mut values = Vec::new();

    for _ in 0..len {
        let data = read_blob(input)?;
        values.extend(ziplist::decode_list(&data)?);
    }

    Ok(values)
}
