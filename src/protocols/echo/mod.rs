//! Echo (pass-through) protocol implementation.
//!
//! The simplest transport mode: every byte the client sends is written back
//! unchanged, with no framing or validation.
//!
//! ## Use Cases
//!
//! 1. **Connectivity checks**: Verify a client can reach the listener and
//!    round-trip data before speaking the prime protocol.
//!
//! 2. **Transport testing**: Exercise the listener, connection limit and
//!    shutdown path without any protocol logic in the way.
//!
//! ## Protocol Format
//!
//! ```text
//! Client sends:   <any bytes>
//! Server echoes:  <the same bytes>
//! ```
//!
//! When the client half-closes its side, the server finishes echoing and
//! closes its own.

pub mod handler;

pub use handler::handle_connection;
