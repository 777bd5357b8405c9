//! Prime protocol implementation.
//!
//! Newline-delimited JSON requests asking whether a number is prime:
//! - Client sends: `{"method":"isPrime","number":<number>}\n`
//! - Server responds: `{"method":"isPrime","prime":<true|false>}\n`
//!
//! ## Validation
//!
//! A request must be a JSON object carrying a `method` equal to `"isPrime"`
//! and a `number` that is a JSON number. Key order does not matter and extra
//! keys are ignored. Anything else gets a single `malformed\n` line, after
//! which the server closes the connection without reading further.
//!
//! ## Numbers
//!
//! Numbers that are valid JSON but are not integers (`7.5`) or do not fit in
//! an `i64` (`1e400`) are still valid requests; they are simply not prime.
//!
//! ## Protocol Format
//!
//! ```text
//! Request:  {"method":"isPrime","number":7}\n
//! Response: {"method":"isPrime","prime":true}\n
//!
//! Request:  {"method":"isPrime","number":"7"}\n
//! Response: malformed\n   (connection closed)
//! ```

pub mod handler;
pub mod parser;
pub mod predicate;

pub use handler::handle_connection;
