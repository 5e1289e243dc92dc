use std::io::Read;

use super::common::intset;
use super::common::utils::{read_blob, read_sequence};
use crate::types::RdbResult;

pub fn read_set<R: Read>(input: &mut R) -> RdbResult<Vec<Vec<u8>>> {
    read_sequence(input, read_blob)
}

pub fn read_set_intset<R: Read>(input: &mut R) -> RdbResult<Vec<Vec<u8>>> {
    let data = read_blob(input)?;
    intset::decode(&data)
}
