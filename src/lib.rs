//! Pull-based decoder for Redis RDB snapshot files.
//!
//! The file is read strictly forward, one entry per step; nothing is held
//! in memory beyond the entry being decoded. Framing records between
//! entries (database selectors, expire times, idle and frequency hints,
//! auxiliary metadata, module blobs) are folded into the entry they belong
//! to or recorded on the cursor.
//!
//! ```no_run
//! fn main() -> Result<(), rdbparse::RdbError> {
//!     let mut parser = rdbparse::open("dump.rdb")?;
//!     while parser.valid() {
//!         parser.step()?;
//!         if !parser.valid() {
//!             break;
//!         }
//!         let record = parser.current_record();
//!         println!(
//!             "db {} {:?} {}",
//!             record.database,
//!             record.kind,
//!             String::from_utf8_lossy(&record.key)
//!         );
//!     }
//!     Ok(())
//! }
//! ```

mod constants;
mod decoder;
mod reader;
mod types;

pub use decoder::{open, RdbParser};
pub use types::{RdbError, RdbOk, RdbResult, Record, RecordKind, Value};
