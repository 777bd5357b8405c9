//! Echo protocol connection handler.

use std::io;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Handle an echo protocol connection.
///
/// Copies the read half into the write half until EOF, then shuts the
/// write half down.
pub async fn handle_connection<S>(stream: S) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    let copied = tokio::io::copy(&mut reader, &mut writer).await?;
    trace!(bytes = copied, "Echo finished");

    writer.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_echo_roundtrip() {
        let (mut client, server) = tokio::io::duplex(64);
        let task = tokio::spawn(handle_connection(server));

        client.write_all(b"hello\nworld").await.unwrap();
        client.shutdown().await.unwrap();

        let mut echoed = Vec::new();
        client.read_to_end(&mut echoed).await.unwrap();
        assert_eq!(echoed, b"hello\nworld");

        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_echo_larger_than_pipe() {
        let (mut client, server) = tokio::io::duplex(16);
        let task = tokio::spawn(handle_connection(server));

        let payload: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        let (mut client_reader, mut client_writer) = tokio::io::split(&mut client);

        let send = async {
            client_writer.write_all(&payload).await.unwrap();
            client_writer.shutdown().await.unwrap();
        };
        let mut echoed = Vec::new();
        let receive = client_reader.read_to_end(&mut echoed);

        let (_, received) = tokio::join!(send, receive);
        received.unwrap();
        assert_eq!(echoed, payload);

        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_echo_read_error() {
        let stream = Builder::new()
            .read(b"abc")
            .write(b"abc")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();

        let err = handle_connection(stream).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
