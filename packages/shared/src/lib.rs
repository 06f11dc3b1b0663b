//! Utilities shared by the Murmur server and client binaries.

pub mod logger;
pub mod time;
