use std::sync::Arc;
use std::time::Duration;

use rspserial_frame::PayloadWriter;
use rspserial_message::{MessageCodec, MessageReader, ModelMeta};
use rspserial_transport::ConnectOptions;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use crate::error::{ConnError, Result};

pub(crate) type BoxedRead = Box<dyn AsyncRead + Send + Unpin>;
pub(crate) type BoxedWrite = Box<dyn AsyncWrite + Send + Unpin>;

/// Message stream handed out by [`AmpConnection::take_reader`].
pub type AmpReader = MessageReader<BoxedRead>;
pub(crate) type AmpWriter = PayloadWriter<BoxedWrite>;

enum State {
    Idle,
    Open {
        reader: Option<AmpReader>,
        writer: AmpWriter,
    },
    Closed,
}

/// A single link to one processor.
///
/// `Idle` until [`open`](Self::open), then `Open` until [`close`](Self::close).
/// A closed connection is not reopened; build a new one instead.
pub struct AmpConnection {
    options: Option<ConnectOptions>,
    codec: MessageCodec,
    open_timeout: Option<Duration>,
    state: State,
}

impl AmpConnection {
    pub fn new(options: ConnectOptions, meta: Arc<ModelMeta>) -> Self {
        Self {
            options: Some(options),
            codec: MessageCodec::new(meta),
            open_timeout: None,
            state: State::Idle,
        }
    }

    /// Wrap an already connected byte stream. The connection starts open.
    pub fn from_stream<S>(stream: S, meta: Arc<ModelMeta>) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let codec = MessageCodec::new(meta);
        let (read, write) = tokio::io::split(stream);
        Self {
            options: None,
            state: open_state(Box::new(read), Box::new(write), &codec),
            codec,
            open_timeout: None,
        }
    }

    /// Give up on `open` after `timeout`.
    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    pub fn open_timeout(&self) -> Option<Duration> {
        self.open_timeout
    }

    pub fn codec(&self) -> &MessageCodec {
        &self.codec
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open { .. })
    }

    pub async fn open(&mut self) -> Result<()> {
        match self.state {
            State::Open { .. } => return Err(ConnError::AlreadyOpen),
            State::Closed => return Err(ConnError::Closed),
            State::Idle => {}
        }
        let options = self.options.as_ref().ok_or(ConnError::NotOpen)?;
        let connect = rspserial_transport::connect(options);
        let stream = match self.open_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| ConnError::Timeout(timeout))??,
            None => connect.await?,
        };
        info!(
            endpoint = %options.endpoint,
            kind = stream.kind(),
            model = %self.codec.meta().name,
            "connection opened"
        );
        let (read, write) = tokio::io::split(stream);
        self.state = open_state(Box::new(read), Box::new(write), &self.codec);
        Ok(())
    }

    pub async fn send_command(&mut self, name: &str) -> Result<()> {
        let payload = self.codec.command_payload(name)?;
        self.writer()?.send(&payload).await?;
        debug!(command = name, "sent command");
        Ok(())
    }

    pub async fn send_volume_direct_command(&mut self, zone: u8, volume: i32) -> Result<()> {
        let payload = self.codec.volume_direct_payload(zone, volume)?;
        self.writer()?.send(&payload).await?;
        debug!(zone, volume, "sent volume direct command");
        Ok(())
    }

    /// The inbound message stream. `None` once taken, or when not open.
    pub fn take_reader(&mut self) -> Option<AmpReader> {
        match &mut self.state {
            State::Open { reader, .. } => reader.take(),
            _ => None,
        }
    }

    /// Shut down the write side and mark the connection closed. Idempotent.
    pub async fn close(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, State::Closed);
        if let State::Open { mut writer, .. } = state {
            writer.shutdown().await?;
            info!("connection closed");
        }
        Ok(())
    }

    /// Split an open connection into its reader and writer halves.
    pub(crate) fn into_parts(mut self) -> Result<(AmpReader, AmpWriter, MessageCodec)> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open {
                reader: Some(reader),
                writer,
            } => Ok((reader, writer, self.codec)),
            State::Open { reader: None, .. } | State::Idle => Err(ConnError::NotOpen),
            State::Closed => Err(ConnError::Closed),
        }
    }

    fn writer(&mut self) -> Result<&mut AmpWriter> {
        match &mut self.state {
            State::Open { writer, .. } => Ok(writer),
            State::Idle => Err(ConnError::NotOpen),
            State::Closed => Err(ConnError::Closed),
        }
    }
}

fn open_state(read: BoxedRead, write: BoxedWrite, codec: &MessageCodec) -> State {
    State::Open {
        reader: Some(MessageReader::new(read, codec.clone())),
        writer: PayloadWriter::new(write),
    }
}
