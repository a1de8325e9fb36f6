use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tracing::debug;

use crate::endpoint::{ConnectOptions, Endpoint};
use crate::error::{Result, TransportError};

/// A connected link to the processor, `AsyncRead + AsyncWrite`.
///
/// This is the I/O type returned by [`connect`]. It wraps either a TCP
/// stream or, on Unix, a raw serial device.
pub struct AmpStream {
    inner: AmpStreamInner,
}

enum AmpStreamInner {
    Tcp(TcpStream),
    #[cfg(unix)]
    Serial(crate::serial::SerialPort),
}

impl AmpStream {
    /// Wrap an already connected TCP stream.
    pub fn from_tcp(stream: TcpStream) -> Self {
        Self {
            inner: AmpStreamInner::Tcp(stream),
        }
    }

    /// Wrap an already opened serial port.
    #[cfg(unix)]
    pub fn from_serial(port: crate::serial::SerialPort) -> Self {
        Self {
            inner: AmpStreamInner::Serial(port),
        }
    }

    /// Short name of the underlying link type.
    pub fn kind(&self) -> &'static str {
        match &self.inner {
            AmpStreamInner::Tcp(_) => "tcp",
            #[cfg(unix)]
            AmpStreamInner::Serial(_) => "serial",
        }
    }
}

/// Open the link described by `options`.
pub async fn connect(options: &ConnectOptions) -> Result<AmpStream> {
    match &options.endpoint {
        Endpoint::Tcp { host, port } => {
            let stream = TcpStream::connect((host.as_str(), *port))
                .await
                .map_err(|source| TransportError::Connect {
                    addr: options.endpoint.to_string(),
                    source,
                })?;
            stream.set_nodelay(true)?;
            debug!(endpoint = %options.endpoint, "connected to tcp bridge");
            Ok(AmpStream::from_tcp(stream))
        }
        Endpoint::Serial(path) => open_serial(path, options.baud_rate),
    }
}

#[cfg(unix)]
fn open_serial(path: &std::path::Path, baud_rate: u32) -> Result<AmpStream> {
    crate::serial::SerialPort::open(path, baud_rate).map(AmpStream::from_serial)
}

#[cfg(not(unix))]
fn open_serial(path: &std::path::Path, _baud_rate: u32) -> Result<AmpStream> {
    Err(TransportError::Unsupported(path.to_path_buf()))
}

impl AsyncRead for AmpStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            AmpStreamInner::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
            #[cfg(unix)]
            AmpStreamInner::Serial(port) => Pin::new(port).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for AmpStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut self.get_mut().inner {
            AmpStreamInner::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
            #[cfg(unix)]
            AmpStreamInner::Serial(port) => Pin::new(port).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            AmpStreamInner::Tcp(stream) => Pin::new(stream).poll_flush(cx),
            #[cfg(unix)]
            AmpStreamInner::Serial(port) => Pin::new(port).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            AmpStreamInner::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
            #[cfg(unix)]
            AmpStreamInner::Serial(port) => Pin::new(port).poll_shutdown(cx),
        }
    }
}

impl std::fmt::Debug for AmpStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmpStream")
            .field("type", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn tcp_roundtrip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4];
            socket.read_exact(&mut buf).await.unwrap();
            socket.write_all(&buf).await.unwrap();
        });

        let endpoint = Endpoint::parse(&format!("socket://{addr}")).unwrap();
        let mut stream = connect(&ConnectOptions::new(endpoint)).await.unwrap();
        assert_eq!(stream.kind(), "tcp");

        stream.write_all(&[0xFE, 0x03, 0xA3, 0x10]).await.unwrap();
        stream.flush().await.unwrap();
        let mut echoed = [0u8; 4];
        stream.read_exact(&mut echoed).await.unwrap();
        assert_eq!(echoed, [0xFE, 0x03, 0xA3, 0x10]);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_tcp_connect_is_a_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = Endpoint::parse(&format!("socket://{addr}")).unwrap();
        let err = connect(&ConnectOptions::new(endpoint)).await.unwrap_err();
        match err {
            TransportError::Connect { addr: reported, .. } => {
                assert_eq!(reported, format!("socket://{addr}"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_serial_device_is_an_open_error() {
        let options = ConnectOptions::new(Endpoint::Serial(
            "/dev/rspserial-does-not-exist".into(),
        ));
        let err = connect(&options).await.unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
    }
}
