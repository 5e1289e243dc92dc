use std::io::Read;
use std::str;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::constants::{constant, encoding, version};
use crate::types::{RdbError, RdbOk, RdbResult};

/// Decodes one length. The returned flag is true when the value is not a
/// length but a follow-up encoding selector.
pub fn read_length_with_encoding<R: Read>(input: &mut R) -> RdbResult<(u64, bool)> {
    let enc_type = input.read_u8()?;

    match (enc_type & 0xC0) >> 6 {
        constant::RDB_ENCVAL => Ok(((enc_type & 0x3F) as u64, true)),
        constant::RDB_6BITLEN => Ok(((enc_type & 0x3F) as u64, false)),
        constant::RDB_14BITLEN => {
            let next_byte = input.read_u8()?;
            Ok(((((enc_type & 0x3F) as u64) << 8) | next_byte as u64, false))
        }
        _ => match enc_type {
            constant::RDB_32BITLEN => Ok((input.read_u32::<BigEndian>()? as u64, false)),
            constant::RDB_64BITLEN => Ok((input.read_u64::<BigEndian>()?, false)),
            _ => Err(RdbError::Format {
                context: "length",
                message: format!("unknown length marker: {:#04x}", enc_type),
            }),
        },
    }
}

pub fn read_length<R: Read>(input: &mut R) -> RdbResult<u64> {
    let (length, _) = read_length_with_encoding(input)?;
    Ok(length)
}

pub fn verify_magic<R: Read>(input: &mut R) -> RdbOk {
    let mut magic = [0; 5];
    input.read_exact(&mut magic)?;

    if magic == constant::RDB_MAGIC.as_bytes() {
        Ok(())
    } else {
        Err(RdbError::Format {
            context: "header",
            message: "invalid magic string".to_string(),
        })
    }
}

pub fn verify_version<R: Read>(input: &mut R) -> RdbResult<u32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;

    for &byte in &buf {
        if !byte.is_ascii_digit() {
            return Err(RdbError::Format {
                context: "header",
                message: "non-numeric version".to_string(),
            });
        }
    }

    // All four bytes are ASCII digits, so this cannot fail.
    let version = str::from_utf8(&buf).unwrap().parse::<u32>().unwrap();

    if version < version::SUPPORTED_MINIMUM {
        return Err(RdbError::Format {
            context: "header",
            message: format!("unsupported version: {}", version),
        });
    }

    Ok(version)
}

/// Reads one string payload: raw, integer-encoded or lzf-compressed.
pub fn read_blob<R: Read>(input: &mut R) -> RdbResult<Vec<u8>> {
    let (length, is_encoded) = read_length_with_encoding(input)?;

    if is_encoded {
        let result = match length {
            encoding::INT8 => int_to_vec(i64::from(input.read_i8()?)),
            encoding::INT16 => int_to_vec(i64::from(input.read_i16::<LittleEndian>()?)),
            encoding::INT32 => int_to_vec(i64::from(input.read_i32::<LittleEndian>()?)),
            encoding::LZF => {
                let compressed_length = read_length(input)?;
                let real_length = read_length(input)?;
                let data = read_exact(input, compressed_length as usize)?;
                lzf::decompress(&data, real_length as usize)
                    .map_err(RdbError::Decompression)?
            }
            _ => {
                return Err(RdbError::Format {
                    context: "string",
                    message: format!("unknown string encoding: {}", length),
                });
            }
        };

        Ok(result)
    } else {
        read_exact(input, length as usize)
    }
}

pub fn int_to_vec(number: i64) -> Vec<u8> {
    number.to_string().into_bytes()
}

pub fn read_exact<R: Read>(input: &mut R, len: usize) -> RdbResult<Vec<u8>> {
    let mut buf = vec![0; len];
    input.read_exact(&mut buf)?;

    Ok(buf)
}

/// Textual double: one length byte with reserved values for the specials,
/// otherwise that many ASCII bytes holding a decimal float.
pub fn read_double<R: Read>(input: &mut R) -> RdbResult<f64> {
    let length = input.read_u8()?;
    match length {
        253 => Ok(f64::NAN),
        254 => Ok(f64::NEG_INFINITY),
        255 => Ok(f64::INFINITY),
        _ => {
            let buf = read_exact(input, length as usize)?;
            str::from_utf8(&buf)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| RdbError::Corruption {
                    context: "double",
                    message: format!("unparseable value: {:?}", String::from_utf8_lossy(&buf)),
                })
        }
    }
}

/// Fixed 8-byte IEEE-754 double, little-endian on the wire.
pub fn read_binary_double<R: Read>(input: &mut R) -> RdbResult<f64> {
    Ok(input.read_f64::<LittleEndian>()?)
}

pub fn read_sequence<R: Read, T, F>(input: &mut R, mut transform: F) -> RdbResult<Vec<T>>
where
    F: FnMut(&mut R) -> RdbResult<T>,
{
    let mut len = read_length(input)?;
    let mut values = Vec::with_capacity(len as usize);

    while len > 0 {
        values.push(transform(input)?);
        len -= 1;
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Cursor;

    #[rstest]
    #[case(&[0x00], (0, false), 1)]
    #[case(&[0x3F], (63, false), 1)]
    #[case(&[0x40, 0x40], (64, false), 2)]
    #[case(&[0x7F, 0xFF], (16383, false), 2)]
    #[case(&[0x80, 0x00, 0x00, 0x40, 0x00], (16384, false), 5)]
    #[case(&[0x80, 0xFF, 0xFF, 0xFF, 0xFF], (4294967295, false), 5)]
    #[case(&[0x81, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00], (4294967296, false), 9)]
    #[case(&[0xC0], (0, true), 1)]
    #[case(&[0xC3], (3, true), 1)]
    fn test_read_length(
        #[case] input: &[u8],
        #[case] expected: (u64, bool),
        #[case] expected_position: u64,
    ) {
        let mut cursor = Cursor::new(Vec::from(input));
        assert_eq!(expected, read_length_with_encoding(&mut cursor).unwrap());
        assert_eq!(expected_position, cursor.position());
    }

    #[test]
    fn test_read_length_rejects_unknown_marker() {
        let result = read_length_with_encoding(&mut Cursor::new(vec![0x82]));
        assert!(matches!(result, Err(RdbError::Format { .. })));
    }

    #[test]
    fn test_read_length_truncated() {
        let result = read_length_with_encoding(&mut Cursor::new(vec![0x80, 0xFF]));
        assert!(matches!(result, Err(RdbError::Truncated(_))));
    }

    #[test]
    fn test_read_blob_plain() {
        assert_eq!(
            vec![0x61, 0x62, 0x63, 0x64],
            read_blob(&mut Cursor::new(vec![4, 0x61, 0x62, 0x63, 0x64])).unwrap()
        );
    }

    #[rstest]
    #[case(&[0xC0, 0x7B], "123")]
    #[case(&[0xC0, 0x85], "-123")]
    #[case(&[0xC1, 0x39, 0x30], "12345")]
    #[case(&[0xC2, 0x15, 0xCD, 0x5B, 0x07], "123456789")]
    fn test_read_blob_integer_encoded(#[case] input: &[u8], #[case] expected: &str) {
        assert_eq!(
            expected.as_bytes().to_vec(),
            read_blob(&mut Cursor::new(Vec::from(input))).unwrap()
        );
    }

    #[test]
    fn test_read_blob_lzf() {
        // A literal run: control byte is length minus one, then the bytes.
        let input = vec![0xC3, 0x05, 0x04, 0x03, 0x61, 0x62, 0x63, 0x64];
        assert_eq!(
            b"abcd".to_vec(),
            read_blob(&mut Cursor::new(input)).unwrap()
        );
    }

    #[test]
    fn test_read_blob_lzf_failure() {
        // Declared raw length is shorter than the decompressed output.
        let input = vec![0xC3, 0x05, 0x02, 0x03, 0x61, 0x62, 0x63, 0x64];
        let result = read_blob(&mut Cursor::new(input));
        assert!(matches!(result, Err(RdbError::Decompression(_))));
    }

    #[test]
    fn test_verify_magic() {
        assert!(verify_magic(&mut Cursor::new(b"REDIS".to_vec())).is_ok());
        assert!(matches!(
            verify_magic(&mut Cursor::new(b"RUBIS".to_vec())),
            Err(RdbError::Format { .. })
        ));
    }

    #[rstest]
    #[case(b"0003", 3)]
    #[case(b"0009", 9)]
    fn test_verify_version(#[case] input: &[u8], #[case] expected: u32) {
        assert_eq!(
            expected,
            verify_version(&mut Cursor::new(Vec::from(input))).unwrap()
        );
    }

    #[test]
    fn test_verify_version_rejects_non_numeric() {
        let result = verify_version(&mut Cursor::new(b"000:".to_vec()));
        assert!(matches!(result, Err(RdbError::Format { .. })));
    }

    #[test]
    fn test_read_double_textual() {
        let mut input = Cursor::new(vec![4, 0x33, 0x2E, 0x32, 0x35]);
        assert_eq!(3.25, read_double(&mut input).unwrap());
    }

    #[test]
    fn test_read_double_reserved_values() {
        assert!(read_double(&mut Cursor::new(vec![253])).unwrap().is_nan());
        assert_eq!(
            f64::NEG_INFINITY,
            read_double(&mut Cursor::new(vec![254])).unwrap()
        );
        assert_eq!(
            f64::INFINITY,
            read_double(&mut Cursor::new(vec![255])).unwrap()
        );
    }

    #[test]
    fn test_read_double_unparseable() {
        let result = read_double(&mut Cursor::new(vec![2, 0x78, 0x79]));
        assert!(matches!(result, Err(RdbError::Corruption { .. })));
    }

    #[test]
    fn test_read_binary_double() {
        let mut input = Cursor::new(3.25f64.to_le_bytes().to_vec());
        assert_eq!(3.25, read_binary_double(&mut input).unwrap());
    }
}
