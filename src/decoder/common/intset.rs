use super::blob::Blob;
use crate::types::{RdbError, RdbResult};

/// Decodes a packed integer set, rendering each element as decimal text in
/// stored order.
pub fn decode(data: &[u8]) -> RdbResult<Vec<Vec<u8>>> {
    let mut blob = Blob::new(data, "intset");
    let width = blob.u32_le()? as usize;
    let length = blob.u32_le()? as usize;

    if !matches!(width, 2 | 4 | 8) {
        return Err(RdbError::Corruption {
            context: "intset",
            message: format!("unknown element width: {}", width),
        });
    }
    if length
        .checked_mul(width)
        .map_or(true, |total| total > blob.remaining())
    {
        return Err(RdbError::Corruption {
            context: "intset",
            message: format!("{} elements of {} bytes exceed the blob", length, width),
        });
    }

    let mut members = Vec::with_capacity(length);
    for _ in 0..length {
        let value = match width {
            2 => blob.i16_le()? as i64,
            4 => blob.i32_le()? as i64,
            _ => blob.i64_le()?,
        };
        members.push(value.to_string().into_bytes());
    }
    Ok(members)
}
