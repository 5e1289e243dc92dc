use std::io::{self, Read};

use crate::types::RdbOk;

/// Sequential reader that folds every byte it hands out into a running
/// CRC-64. The checksum covers skipped fields too: `skip` is routed through
/// the same read path, so coverage does not depend on whether bytes were
/// inspected. Only `read_raw` (used for the stored trailer) bypasses it.
pub struct ChecksumReader<R: Read> {
    input: R,
    checksum: u64,
    checksum_enabled: bool,
}

impl<R: Read> ChecksumReader<R> {
    pub fn new(input: R) -> ChecksumReader<R> {
        ChecksumReader {
            input,
            checksum: 0,
            checksum_enabled: true,
        }
    }

    /// Turns accumulation off for files written before checksums existed.
    pub fn disable_checksum(&mut self) {
        self.checksum_enabled = false;
    }

    pub fn checksum(&self) -> u64 {
        self.checksum
    }

    /// Discards `count` bytes through the checksummed read path.
    pub fn skip(&mut self, count: u64) -> RdbOk {
        let mut scratch = [0; 512];
        let mut remaining = count;
        while remaining > 0 {
            let chunk = remaining.min(scratch.len() as u64) as usize;
            self.read_exact(&mut scratch[..chunk])?;
            remaining -= chunk as u64;
        }
        Ok(())
    }

    /// Reads without feeding the checksum.
    pub fn read_raw(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.input.read_exact(buf)
    }
}

impl<R: Read> Read for ChecksumReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.input.read(buf)?;
        if self.checksum_enabled && n > 0 {
            self.checksum = crc64::crc64(self.checksum, &buf[..n]);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::ChecksumReader;

    #[test]
    fn test_checksum_accumulates_in_read_order() {
        let data = b"0123456789".to_vec();
        let mut reader = ChecksumReader::new(Cursor::new(data.clone()));

        let mut buf = [0; 4];
        reader.read_exact(&mut buf).unwrap();
        reader.read_exact(&mut buf[..2]).unwrap();

        assert_eq!(crc64::crc64(0, &data[..6]), reader.checksum());
    }

    #[test]
    fn test_skip_is_covered_by_checksum() {
        let data = b"abcdefgh".to_vec();
        let mut read_all = ChecksumReader::new(Cursor::new(data.clone()));
        let mut buf = vec![0; data.len()];
        read_all.read_exact(&mut buf).unwrap();

        let mut skipped = ChecksumReader::new(Cursor::new(data));
        skipped.read_exact(&mut buf[..2]).unwrap();
        skipped.skip(6).unwrap();

        assert_eq!(read_all.checksum(), skipped.checksum());
    }

    #[test]
    fn test_read_raw_bypasses_checksum() {
        let mut reader = ChecksumReader::new(Cursor::new(b"xyz".to_vec()));
        let mut buf = [0; 3];
        reader.read_raw(&mut buf).unwrap();

        assert_eq!(0, reader.checksum());
    }

    #[test]
    fn test_disable_checksum_stops_accumulation() {
        let mut reader = ChecksumReader::new(Cursor::new(b"abcd".to_vec()));
        let mut buf = [0; 2];
        reader.read_exact(&mut buf).unwrap();
        let after_header = reader.checksum();

        reader.disable_checksum();
        reader.read_exact(&mut buf).unwrap();

        assert_eq!(after_header, reader.checksum());
    }
}
