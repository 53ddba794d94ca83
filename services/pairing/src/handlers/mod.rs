pub mod couple;
pub mod invite_code;
pub mod pairing;
pub mod profile;
pub mod session;
