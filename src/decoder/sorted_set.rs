use std::io::Read;
use std::str;

use super::common::utils::{read_binary_double, read_blob, read_double, read_length};
use super::common::ziplist;
use crate::types::{RdbError, RdbResult};

/// Scores are textual in the legacy encoding and binary doubles in the
/// newer one; the caller picks by value-type tag.
pub fn read_sorted_set<R: Read>(
    input: &mut R,
    binary_scores: bool,
) -> RdbResult<Vec<(f64, Vec<u8>)>> {
    let mut set_items = read_length(input)?;
    let mut values = Vec::with_capacity(set_items as usize);

    while set_items > 0 {
        let member = read_blob(input)?;
        let score = if binary_scores {
            read_binary_double(input)?
        } else {
            read_double(input)?
        };
        values.push((score, member));
        set_items -= 1;
    }

    Ok(values)
}

pub fn read_sorted_set_ziplist<R: Read>(input: &mut R) -> RdbResult<Vec<(f64, Vec<u8>)>> {
    let data = read_blob(input)?;
    let pairs = ziplist::decode_pairs(&data, "zset ziplist")?;

    pairs
        .into_iter()
        .map(|(member, score)| {
            let score = str::from_utf8(&score)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| RdbError::Corruption {
                    context: "zset ziplist",
                    message: format!(
                        "unparseable score: {:?}",
                        String::from_utf8_lossy(&score)
                    ),
                })?;
            Ok((score, member))
        })
        .collect()
}
