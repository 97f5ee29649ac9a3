//! Fake record generation and mutation for Flatsmith.
//!
//! Builds deterministic (seeded) fake user and address datasets, writes and
//! reads them as CSV, and supports a "shuffle" mutation that corrupts records
//! by copying randomly chosen fields from freshly generated donors.

pub mod errors;
pub mod fakers;
pub mod output;
pub mod records;
pub mod shuffle;

pub use errors::GenerateError;
pub use fakers::{RecordKind, fake_address, fake_user, generate_addresses, generate_users};
pub use output::csv::{read_records, write_records};
pub use records::{FakeAddress, FakeUser, FieldSlot, Gender};
pub use shuffle::{shuffle_records, shuffle_slots};
