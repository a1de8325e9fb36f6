use bytes::Bytes;
use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use crate::decoder::{DecoderStats, PayloadCodec};
use crate::error::Result;

/// Reads validated payloads from any `AsyncRead` stream.
///
/// Handles partial reads and resynchronisation internally; callers only
/// ever see complete, checksummed payloads.
pub struct PayloadReader<T> {
    inner: FramedRead<T, PayloadCodec>,
}

impl<T: AsyncRead + Unpin> PayloadReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner: FramedRead::new(inner, PayloadCodec::new()),
        }
    }

    /// Read the next payload.
    ///
    /// Returns `Ok(None)` at end of stream. Framing errors along the way are
    /// logged and skipped; only I/O errors are returned.
    pub async fn next_payload(&mut self) -> Result<Option<Bytes>> {
        self.inner.next().await.transpose()
    }

    /// What the decoder has accepted and discarded so far.
    pub fn stats(&self) -> &DecoderStats {
        self.inner.decoder().stats()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        self.inner.get_ref()
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// Consume the reader and return the inner stream.
    ///
    /// Bytes already buffered but not yet decoded are lost.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::{AsyncWriteExt, ReadBuf};

    use super::*;
    use crate::codec::encode_payload_to_bytes;
    use crate::error::FrameError;

    fn wire(payload: &[u8]) -> Vec<u8> {
        encode_payload_to_bytes(payload).unwrap().to_vec()
    }

    #[tokio::test]
    async fn read_multiple_payloads() {
        let mut stream = wire(&[0xA3, 0x10, 0x0A]);
        stream.extend_from_slice(&wire(&[0xA3, 0x30, 0x28]));
        stream.extend_from_slice(&wire(&[0xA3, 0x33, 0x24]));

        let mut reader = PayloadReader::new(stream.as_slice());
        let mut payloads = Vec::new();
        while let Some(p) = reader.next_payload().await.unwrap() {
            payloads.push(p);
        }

        assert_eq!(payloads.len(), 3);
        assert_eq!(payloads[1].as_ref(), &[0xA3, 0x30, 0x28]);
        assert_eq!(payloads[2].as_ref(), &[0xA3, 0x33, 0x24]);
        assert_eq!(reader.stats().payloads, 3);
        assert_eq!(reader.stats().anomalies(), 0);
    }

    #[tokio::test]
    async fn junk_then_two_frames() {
        let mut stream = vec![0x42; 50];
        stream.extend_from_slice(&wire(&[0xA3, 0x10, 0x0A]));
        stream.extend_from_slice(&wire(&[0xA3, 0x10, 0x1E]));

        let mut reader = PayloadReader::new(stream.as_slice());
        let a = reader.next_payload().await.unwrap().unwrap();
        let b = reader.next_payload().await.unwrap().unwrap();
        assert!(reader.next_payload().await.unwrap().is_none());

        assert_eq!(a.as_ref(), &[0xA3, 0x10, 0x0A]);
        assert_eq!(b.as_ref(), &[0xA3, 0x10, 0x1E]);
        assert_eq!(reader.stats().junk_runs, 1);
        assert_eq!(reader.stats().junk_bytes, 50);
    }

    #[tokio::test]
    async fn early_eof_ends_stream() {
        let mut stream = wire(&[0xA3, 0x10, 0x0A]);
        stream.extend_from_slice(&[0xFE, 0x03, 0xA3]);

        let mut reader = PayloadReader::new(stream.as_slice());
        assert!(reader.next_payload().await.unwrap().is_some());
        assert!(reader.next_payload().await.unwrap().is_none());
        assert_eq!(reader.stats().truncated, 1);
    }

    #[tokio::test]
    async fn partial_read_handling() {
        let bytes = wire(&[0xA3, 0x30, 0x28]);
        let mut reader = PayloadReader::new(ByteByByteReader { bytes, pos: 0 });
        let payload = reader.next_payload().await.unwrap().unwrap();
        assert_eq!(payload.as_ref(), &[0xA3, 0x30, 0x28]);
    }

    #[tokio::test]
    async fn payloads_over_duplex_pipe() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut reader = PayloadReader::new(server);

        client.write_all(&wire(&[0xA3, 0x10, 0x0A])).await.unwrap();
        let payload = reader.next_payload().await.unwrap().unwrap();
        assert_eq!(payload.as_ref(), &[0xA3, 0x10, 0x0A]);

        drop(client);
        assert!(reader.next_payload().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn io_error_is_returned() {
        let mut reader = PayloadReader::new(FailingReader);
        let err = reader.next_payload().await.unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[tokio::test]
    async fn accessors_and_into_inner() {
        let data: &[u8] = &[];
        let mut reader = PayloadReader::new(data);
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl AsyncRead for ByteByByteReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            if self.pos < self.bytes.len() && buf.remaining() > 0 {
                let b = self.bytes[self.pos];
                buf.put_slice(&[b]);
                self.pos += 1;
            }
            Poll::Ready(Ok(()))
        }
    }

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            Poll::Ready(Err(std::io::Error::from(ErrorKind::BrokenPipe)))
        }
    }
}
