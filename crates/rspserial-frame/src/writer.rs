use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::codec::encode_payload;
use crate::error::Result;

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Writes complete frames to any `AsyncWrite` stream.
pub struct PayloadWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: AsyncWrite + Unpin> PayloadWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Encode a payload and write it as one frame.
    pub async fn send(&mut self, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_payload(payload, &mut self.buf)?;
        self.inner.write_all(&self.buf).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Write bytes that are already framed (start byte, escaping and checksum applied).
    pub async fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.inner.write_all(frame).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Shut down the write side of the underlying stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.inner.shutdown().await?;
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use crate::reader::PayloadReader;

    #[tokio::test]
    async fn send_writes_encoded_frame() {
        let mut writer = PayloadWriter::new(Vec::new());
        writer.send(&[0xA3, 0x10, 0x1E]).await.unwrap();
        assert_eq!(writer.get_ref(), &vec![0xFE, 0x03, 0xA3, 0x10, 0x1E, 0xD4]);
    }

    #[tokio::test]
    async fn send_rejects_oversized_payload() {
        let mut writer = PayloadWriter::new(Vec::new());
        let err = writer.send(&[0u8; 300]).await.unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 300, .. }));
        assert!(writer.get_ref().is_empty());
    }

    #[tokio::test]
    async fn write_frame_passes_bytes_through() {
        let mut writer = PayloadWriter::new(Vec::new());
        writer
            .write_frame(&[0xFE, 0x03, 0xA3, 0x30, 0x28, 0xFD, 0x01])
            .await
            .unwrap();
        assert_eq!(
            writer.into_inner(),
            vec![0xFE, 0x03, 0xA3, 0x30, 0x28, 0xFD, 0x01]
        );
    }

    #[tokio::test]
    async fn roundtrip_over_duplex() {
        let (left, right) = tokio::io::duplex(256);
        let mut writer = PayloadWriter::new(left);
        let mut reader = PayloadReader::new(right);

        writer.send(&[0xA3, 0x10, 0xFE]).await.unwrap();
        writer.send(&[0xA3, 0x10, 0xFD]).await.unwrap();

        let a = reader.next_payload().await.unwrap().unwrap();
        let b = reader.next_payload().await.unwrap().unwrap();
        assert_eq!(a.as_ref(), &[0xA3, 0x10, 0xFE]);
        assert_eq!(b.as_ref(), &[0xA3, 0x10, 0xFD]);
    }
}
