//! Prime protocol connection handler.
//!
//! One [`Session`] per connection: read bytes, split lines, answer each
//! line in order, and close after the first malformed request.

use super::parser::{self, Operand, Response};
use super::predicate::is_prime;
use crate::buffer::LineBuffer;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

/// Read buffer size
const READ_SIZE: usize = 16 * 1024;

/// Operands above this are evaluated on the blocking pool.
const INLINE_EVAL_LIMIT: i64 = 1 << 40;

/// Handle a single client connection.
pub async fn handle_connection<S>(stream: S, max_line_length: Option<usize>) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    Session::new(stream, max_line_length).run().await
}

/// Lifecycle of a session. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Per-connection protocol state.
pub struct Session<S> {
    stream: S,
    buffer: LineBuffer,
    state: SessionState,
    max_line_length: Option<usize>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, max_line_length: Option<usize>) -> Self {
        Self {
            stream,
            buffer: LineBuffer::new(),
            state: SessionState::Open,
            max_line_length,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Serve the connection until EOF, a transport error, or a malformed
    /// request. The connection is shut down on every exit path.
    pub async fn run(mut self) -> io::Result<()> {
        let result = self.serve().await;
        self.close();
        // The peer may already be gone.
        let _ = self.stream.shutdown().await;
        result
    }

    async fn serve(&mut self) -> io::Result<()> {
        let mut chunk = vec![0u8; READ_SIZE];

        while self.state == SessionState::Open {
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                if !self.buffer.is_empty() {
                    trace!(bytes = self.buffer.len(), "Discarding unterminated line");
                }
                trace!("Connection closed by client");
                self.close();
                break;
            }

            self.buffer.append(&chunk[..n]);
            self.process_lines().await?;
        }

        Ok(())
    }

    /// Answer every complete buffered line, stopping at the first malformed one.
    async fn process_lines(&mut self) -> io::Result<()> {
        while let Some(line) = self.buffer.next_line() {
            let response = if self.exceeds_limit(line.len()) {
                debug!(length = line.len(), "Request line too long");
                Response::Malformed
            } else {
                respond(&line).await?
            };

            self.stream.write_all(&response.encode()).await?;

            if response.is_malformed() {
                self.close();
                return Ok(());
            }
        }

        if self.exceeds_limit(self.buffer.len()) {
            debug!(length = self.buffer.len(), "Partial request line too long");
            self.stream.write_all(&Response::Malformed.encode()).await?;
            self.close();
        }

        Ok(())
    }

    fn exceeds_limit(&self, len: usize) -> bool {
        self.max_line_length.is_some_and(|limit| len > limit)
    }

    fn close(&mut self) {
        self.state = SessionState::Closed;
        self.buffer.clear();
    }
}

/// Decode one line and compute its response.
async fn respond(line: &[u8]) -> io::Result<Response> {
    let request = match parser::decode(line) {
        Ok(request) => request,
        Err(reason) => {
            debug!(%reason, "Malformed request");
            return Ok(Response::Malformed);
        }
    };
    trace!(method = request.method(), number = %request.number(), "Processing request");

    let prime = match request.operand() {
        Operand::Integer(n) => evaluate(n).await?,
        Operand::NonIntegral | Operand::OutOfRange => false,
    };
    Ok(Response::Prime(prime))
}

async fn evaluate(n: i64) -> io::Result<bool> {
    if n <= INLINE_EVAL_LIMIT {
        return Ok(is_prime(n));
    }
    tokio::task::spawn_blocking(move || is_prime(n))
        .await
        .map_err(io::Error::other)
}
