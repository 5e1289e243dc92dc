use std::io::Read;

use indexmap::IndexMap;

use super::common::utils::{read_blob, read_length};
use super::common::{ziplist, zipmap};
use crate::types::RdbResult;

pub fn read_hash<R: Read>(input: &mut R) -> RdbResult<IndexMap<Vec<u8>, Vec<u8>>> {
    let mut hash_items = read_length(input)?;
    let mut values = IndexMap::new();

    while hash_items > 0 {
        let field = read_blob(input)?;
        let value = read_blob(input)?;
        values.insert(field, value);
        hash_items -= 1;
    }

    Ok(values)
}

pub fn read_hash_ziplist<R: Read>(input: &mut R) -> RdbResult<IndexMap<Vec<u8>, Vec<u8>>> {
    let data = read_blob(input)?;
    let pairs = ziplist::decode_pairs(&data, "hash ziplist")?;

    Ok(pairs.into_iter().collect())
}

pub fn read_hash_zipmap<R: Read>(input: &mut R) -> RdbResult<IndexMap<Vec<u8>, Vec<u8>>> {
    let data = read_blob(input)?;
    let pairs = zipmap::decode_map(&data)?;

    Ok(pairs.into_iter().collect())
}
