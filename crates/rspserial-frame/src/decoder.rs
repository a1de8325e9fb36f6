use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

use crate::codec::{calculate_checksum, encode_payload, unescape, ESCAPE_BYTE, START_BYTE};
use crate::error::{FrameError, Result};

/// Junk bytes kept for diagnostics; the count keeps going past this.
const JUNK_SAMPLE_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    Count,
    Payload { remaining: usize },
    Checksum,
}

/// Byte-at-a-time frame decoder with no I/O of its own.
///
/// Feed it bytes with [`push`](Self::push); it hands back a payload whenever a
/// frame completes and an error whenever bytes had to be thrown away. Errors
/// are informational: the decoder has already resynchronised when it returns one.
#[derive(Debug)]
pub struct PayloadDecoder {
    state: State,
    escaped: bool,
    /// Wire bytes of the frame in progress, start byte included.
    raw: BytesMut,
    /// Unescaped count and payload of the frame in progress.
    body: BytesMut,
    junk_count: usize,
    junk_sample: BytesMut,
}

impl Default for PayloadDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadDecoder {
    pub fn new() -> Self {
        Self {
            state: State::Scanning,
            escaped: false,
            raw: BytesMut::with_capacity(64),
            body: BytesMut::with_capacity(64),
            junk_count: 0,
            junk_sample: BytesMut::new(),
        }
    }

    /// Whether a frame is partially decoded.
    pub fn in_frame(&self) -> bool {
        self.state != State::Scanning
    }

    /// Feed one byte from the wire.
    pub fn push(&mut self, byte: u8) -> Option<Result<Bytes>> {
        // An unescaped start byte always opens a new frame, even straight after an escape.
        if byte == START_BYTE {
            let event = if self.in_frame() {
                let discarded = self.raw.split().freeze();
                Some(Err(FrameError::UnexpectedStart { discarded }))
            } else {
                self.take_junk().map(Err)
            };
            self.begin_frame();
            return event;
        }

        if self.state == State::Scanning {
            self.junk_count += 1;
            if self.junk_sample.len() < JUNK_SAMPLE_LIMIT {
                self.junk_sample.put_u8(byte);
            }
            return None;
        }

        self.raw.put_u8(byte);

        let byte = if self.escaped {
            self.escaped = false;
            match unescape(byte) {
                Some(literal) => literal,
                None => {
                    let discarded = self.abort_frame();
                    return Some(Err(FrameError::InvalidEscape { byte, discarded }));
                }
            }
        } else if byte == ESCAPE_BYTE {
            self.escaped = true;
            return None;
        } else {
            byte
        };

        self.accept(byte)
    }

    /// Signal end of input.
    ///
    /// Reports a frame cut short or junk that never reached a start byte, then
    /// leaves the decoder ready for a fresh stream.
    pub fn finish(&mut self) -> Option<FrameError> {
        if self.in_frame() {
            let discarded = self.abort_frame();
            return Some(FrameError::Truncated { discarded });
        }
        self.take_junk()
    }

    fn accept(&mut self, byte: u8) -> Option<Result<Bytes>> {
        match self.state {
            State::Scanning => None,
            State::Count => {
                self.body.put_u8(byte);
                self.state = match byte {
                    0 => State::Checksum,
                    n => State::Payload {
                        remaining: n as usize,
                    },
                };
                None
            }
            State::Payload { remaining } => {
                self.body.put_u8(byte);
                self.state = match remaining {
                    1 => State::Checksum,
                    n => State::Payload { remaining: n - 1 },
                };
                None
            }
            State::Checksum => {
                let expected = calculate_checksum(&self.body);
                let mut body = self.body.split().freeze();
                let frame = self.abort_frame();
                if expected != byte {
                    return Some(Err(FrameError::ChecksumMismatch {
                        expected,
                        actual: byte,
                        frame,
                    }));
                }
                body.advance(1);
                Some(Ok(body))
            }
        }
    }

    fn begin_frame(&mut self) {
        self.state = State::Count;
        self.escaped = false;
        self.raw.clear();
        self.body.clear();
        self.raw.put_u8(START_BYTE);
    }

    fn abort_frame(&mut self) -> Bytes {
        self.state = State::Scanning;
        self.escaped = false;
        self.body.clear();
        self.raw.split().freeze()
    }

    fn take_junk(&mut self) -> Option<FrameError> {
        if self.junk_count == 0 {
            return None;
        }
        let count = std::mem::take(&mut self.junk_count);
        let sample = self.junk_sample.split().freeze();
        Some(FrameError::Junk { count, sample })
    }
}

/// Counters for what the stream decoder had to throw away.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderStats {
    pub payloads: u64,
    pub junk_runs: u64,
    pub junk_bytes: u64,
    pub checksum_errors: u64,
    pub invalid_escapes: u64,
    pub unexpected_starts: u64,
    pub truncated: u64,
}

impl DecoderStats {
    fn record(&mut self, err: &FrameError) {
        match err {
            FrameError::Junk { count, .. } => {
                self.junk_runs += 1;
                self.junk_bytes += *count as u64;
            }
            FrameError::ChecksumMismatch { .. } => self.checksum_errors += 1,
            FrameError::InvalidEscape { .. } => self.invalid_escapes += 1,
            FrameError::UnexpectedStart { .. } => self.unexpected_starts += 1,
            FrameError::Truncated { .. } => self.truncated += 1,
            FrameError::Io(_) | FrameError::PayloadTooLarge { .. } => {}
        }
    }

    /// Total number of anomalies reported.
    pub fn anomalies(&self) -> u64 {
        self.junk_runs
            + self.checksum_errors
            + self.invalid_escapes
            + self.unexpected_starts
            + self.truncated
    }
}

/// Stream codec for use with `tokio_util::codec::{FramedRead, FramedWrite}`.
///
/// Decoding never fails on bad framing: anomalies are logged at `warn` and
/// counted in [`DecoderStats`], and decoding carries on.
#[derive(Debug, Default)]
pub struct PayloadCodec {
    decoder: PayloadDecoder,
    stats: DecoderStats,
}

impl PayloadCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// What has been decoded and discarded so far.
    pub fn stats(&self) -> &DecoderStats {
        &self.stats
    }

    fn report(&mut self, err: FrameError) {
        warn!(error = %err, "discarding bytes from protocol stream");
        self.stats.record(&err);
    }
}

impl Decoder for PayloadCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        while src.has_remaining() {
            match self.decoder.push(src.get_u8()) {
                Some(Ok(payload)) => {
                    self.stats.payloads += 1;
                    trace!(len = payload.len(), "decoded payload");
                    return Ok(Some(payload));
                }
                Some(Err(err)) => self.report(err),
                None => {}
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if let Some(payload) = self.decode(src)? {
            return Ok(Some(payload));
        }
        if let Some(err) = self.decoder.finish() {
            self.report(err);
        }
        Ok(None)
    }
}

impl Encoder<&[u8]> for PayloadCodec {
    type Error = FrameError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<()> {
        encode_payload(item, dst)
    }
}
