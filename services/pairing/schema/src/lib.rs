//! sea-orm entities for the pairing service tables.

pub mod couples;
pub mod invite_codes;
pub mod users;
