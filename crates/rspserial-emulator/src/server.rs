use std::collections::HashMap;
use std::future::pending;
use std::net::SocketAddr;

use rspserial_frame::PayloadWriter;
use rspserial_message::{
    is_volume_direct_type, CommandCode, CommandMessage, Message, MessageCodec, MessageReadError,
    MessageReader, MSGTYPE_VOLUME_DIRECT_COMMANDS,
};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::EmulatorConfig;
use crate::device::{Device, DeviceState, Outcome};
use crate::error::Result;

enum Event {
    Connected { id: u64, writer: OwnedWriteHalf },
    Disconnected { id: u64 },
    Command(CommandMessage),
}

/// A bound, not yet running emulator.
pub struct Emulator {
    listener: TcpListener,
    config: EmulatorConfig,
}

impl Emulator {
    pub async fn bind(addr: impl ToSocketAddrs, config: EmulatorConfig) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run on a background task.
    pub fn spawn(self) -> Result<EmulatorHandle> {
        let addr = self.local_addr()?;
        let cancel = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(initial_state(&self.config));
        let task = tokio::spawn(self.serve(cancel.clone(), state_tx));
        Ok(EmulatorHandle {
            addr,
            state: state_rx,
            cancel,
            task,
        })
    }

    /// Serve until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let (state_tx, _state_rx) = watch::channel(initial_state(&self.config));
        self.serve(cancel, state_tx).await
    }

    async fn serve(self, cancel: CancellationToken, state: watch::Sender<DeviceState>) -> Result<()> {
        let Emulator { listener, config } = self;
        info!(addr = %listener.local_addr()?, model = %config.meta.name, "emulator listening");
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let device = tokio::spawn(run_device(config.clone(), events_rx, state, cancel.clone()));

        let mut next_id = 0u64;
        let result = loop {
            let accepted = tokio::select! {
                _ = cancel.cancelled() => break Ok(()),
                accepted = listener.accept() => accepted,
            };
            let (stream, peer) = match accepted {
                Ok(accepted) => accepted,
                Err(err) => break Err(err.into()),
            };
            next_id += 1;
            info!(%peer, id = next_id, "client connected");
            let (read, writer) = stream.into_split();
            if events_tx.send(Event::Connected { id: next_id, writer }).is_err() {
                break Ok(());
            }
            tokio::spawn(handle_client(
                next_id,
                read,
                MessageCodec::new(config.meta.clone()),
                events_tx.clone(),
                cancel.clone(),
            ));
        };

        cancel.cancel();
        if let Err(err) = device.await {
            error!(%err, "device task failed");
        }
        info!("emulator stopped");
        result
    }
}

fn initial_state(config: &EmulatorConfig) -> DeviceState {
    Device::new(&config.meta, config.aliases.clone(), config.is_on)
        .state()
        .clone()
}

/// Read commands from one client and pass them to the device.
async fn handle_client(
    id: u64,
    read: OwnedReadHalf,
    codec: MessageCodec,
    events: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) {
    let mut reader = MessageReader::new(read, codec);
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            next = reader.next_message() => next,
        };
        match next {
            Ok(Some(Message::Command(command))) => {
                if events.send(Event::Command(command)).is_err() {
                    break;
                }
            }
            Ok(Some(other)) => warn!(kind = %other.kind(), "ignoring non-command message"),
            Ok(None) => break,
            Err(MessageReadError::Message(err)) => warn!(%err, "ignoring undecodable message"),
            Err(MessageReadError::Frame(err)) => {
                warn!(%err, "client read failed");
                break;
            }
        }
    }
    info!(id, "client disconnected");
    let _ = events.send(Event::Disconnected { id });
}

/// Owns the device state and the client links.
async fn run_device(
    config: EmulatorConfig,
    mut events: mpsc::UnboundedReceiver<Event>,
    state: watch::Sender<DeviceState>,
    cancel: CancellationToken,
) {
    let codec = MessageCodec::new(config.meta.clone());
    let mut device = Device::new(&config.meta, config.aliases.clone(), config.is_on);
    // Older clients stay connected but only the newest one gets feedback.
    let mut writers: HashMap<u64, PayloadWriter<OwnedWriteHalf>> = HashMap::new();
    let mut newest: Option<u64> = None;
    let mut blink_at: Option<Instant> = None;

    loop {
        let deadline = blink_at;
        let blink = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => pending().await,
            }
        };
        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = blink => {
                blink_at = blink_at.map(|at| at + config.blink_interval);
                device.blink()
            }
            event = events.recv() => match event {
                None => break,
                Some(Event::Connected { id, writer }) => {
                    writers.insert(id, PayloadWriter::new(writer));
                    newest = Some(id);
                    Outcome::Unchanged
                }
                Some(Event::Disconnected { id }) => {
                    writers.remove(&id);
                    if newest == Some(id) {
                        newest = None;
                    }
                    Outcome::Unchanged
                }
                Some(Event::Command(command)) => apply_command(&mut device, &codec, &command),
            },
        };

        let outcome = match outcome {
            Outcome::Booting => {
                let _ = state.send(device.state().clone());
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = sleep(config.power_on_delay) => {}
                }
                device.finish_power_on()
            }
            other => other,
        };

        if device.is_blinking() {
            blink_at.get_or_insert_with(|| Instant::now() + config.blink_interval);
        } else {
            blink_at = None;
        }
        let _ = state.send(device.state().clone());

        if outcome == Outcome::Feedback {
            if let Some(id) = newest {
                if !write_feedback(&device, &codec, id, &mut writers).await {
                    writers.remove(&id);
                    newest = None;
                }
            } else {
                info!("feedback not sent, no client connected");
            }
        }
    }
    debug!("device task stopped");
}

fn apply_command(device: &mut Device, codec: &MessageCodec, command: &CommandMessage) -> Outcome {
    let Some(&key) = command.key.first() else {
        return Outcome::Unchanged;
    };
    if is_volume_direct_type(command.message_type) {
        if command.message_type == MSGTYPE_VOLUME_DIRECT_COMMANDS {
            info!(volume = key, "volume direct");
            return device.set_volume(i32::from(key));
        }
        info!(message_type = command.message_type, key, "zone volume direct ignored");
        return Outcome::Unchanged;
    }

    let meta = codec.meta();
    let name = meta.commands.name_of(CommandCode::new(command.message_type, key));
    info!(message_type = command.message_type, key, command = ?name, "command received");
    match name {
        Some("POWER_TOGGLE") => device.toggle(),
        Some("POWER_ON") => device.turn_on(),
        Some("POWER_OFF") => device.turn_off(),
        Some("VOLUME_UP") => device.volume_up(),
        Some("VOLUME_DOWN") => device.volume_down(),
        Some("MUTE_TOGGLE") => device.mute_toggle(),
        Some("PARTY_MODE_TOGGLE") => device.party_mode_toggle(),
        Some("DISPLAY_REFRESH") => device.display_refresh(),
        Some(name) => match meta.source_for_command(name) {
            Some(source) => device.set_source(&source.standard_name),
            None => {
                info!(command = name, "unsupported command ignored");
                Outcome::Unchanged
            }
        },
        None => {
            info!("unknown command ignored");
            Outcome::Unchanged
        }
    }
}

/// Returns `false` when the client's link failed and it should be dropped.
async fn write_feedback(
    device: &Device,
    codec: &MessageCodec,
    id: u64,
    writers: &mut HashMap<u64, PayloadWriter<OwnedWriteHalf>>,
) -> bool {
    let Some(writer) = writers.get_mut(&id) else {
        return true;
    };
    let frame = match codec.encode_feedback(&device.feedback()) {
        Ok(frame) => frame,
        Err(err) => {
            error!(%err, "could not encode feedback");
            return true;
        }
    };
    match writer.write_frame(&frame).await {
        Ok(()) => {
            debug!(id, frame = %rspserial_frame::hex(&frame), "feedback written");
            true
        }
        Err(err) => {
            warn!(id, %err, "feedback write failed, dropping client");
            false
        }
    }
}

/// A running emulator.
pub struct EmulatorHandle {
    addr: SocketAddr,
    state: watch::Receiver<DeviceState>,
    cancel: CancellationToken,
    task: JoinHandle<Result<()>>,
}

impl EmulatorHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// `socket://` endpoint string for connecting to this emulator.
    pub fn endpoint(&self) -> String {
        format!("socket://{}", self.addr)
    }

    /// Snapshot of the device state.
    pub fn state(&self) -> DeviceState {
        self.state.borrow().clone()
    }

    /// Wait until the device state satisfies `f`.
    pub async fn wait_for_state(&mut self, f: impl FnMut(&DeviceState) -> bool) -> DeviceState {
        let found = match self.state.wait_for(f).await {
            Ok(state) => Some(state.clone()),
            Err(_) => None,
        };
        found.unwrap_or_else(|| self.state())
    }

    /// Stop serving and wait for the server to finish.
    pub async fn shutdown(self) -> Result<()> {
        self.cancel.cancel();
        match self.task.await {
            Ok(result) => result,
            Err(err) => {
                error!(%err, "emulator task failed");
                Ok(())
            }
        }
    }
}
