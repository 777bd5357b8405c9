//! Protocol implementations.
//!
//! Each protocol has a connection handler that the server runs once per
//! accepted connection.
//!
//! - `prime`: newline-delimited JSON primality requests
//! - `echo`: pass-through, bytes are returned unchanged

pub mod echo;
pub mod prime;
