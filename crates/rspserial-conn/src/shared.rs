//! One physical connection shared by many logical clients.
//!
//! A background task reads every inbound message once and hands a copy to
//! each registered client's queue. Clients write through a shared writer.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rspserial_message::{Message, MessageCodec, MessageError, MessageReadError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn, Level};

use crate::connection::{AmpConnection, AmpReader, AmpWriter};
use crate::error::{ConnError, Result};
use crate::process::CommandWindows;

/// What a client receives: a message, or a payload that failed to decode.
pub type ClientItem = std::result::Result<Message, MessageError>;

/// Handle of a registered client. The generation makes a stale handle inert
/// once its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId {
    index: usize,
    generation: u64,
}

struct Slot {
    generation: u64,
    sender: Option<UnboundedSender<ClientItem>>,
}

#[derive(Default)]
struct Registry {
    slots: Vec<Slot>,
    closed: bool,
}

impl Registry {
    fn register(&mut self, sender: UnboundedSender<ClientItem>) -> ClientId {
        // After the loop has ended the sender is dropped, so the client sees
        // the end of its queue straight away.
        let sender = (!self.closed).then_some(sender);
        if let Some(index) = self.slots.iter().position(|slot| slot.sender.is_none()) {
            let slot = &mut self.slots[index];
            slot.generation += 1;
            slot.sender = sender;
            return ClientId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            sender,
        });
        ClientId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    fn unregister(&mut self, id: ClientId) {
        if let Some(slot) = self.slots.get_mut(id.index) {
            if slot.generation == id.generation {
                slot.sender = None;
            }
        }
    }

    fn deliver(&mut self, item: &ClientItem) {
        for slot in &mut self.slots {
            if let Some(sender) = &slot.sender {
                if sender.send(item.clone()).is_err() {
                    slot.sender = None;
                }
            }
        }
    }

    fn close(&mut self) {
        self.closed = true;
        for slot in &mut self.slots {
            slot.sender = None;
        }
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.sender.is_some()).count()
    }
}

pub(crate) struct Shared {
    registry: Mutex<Registry>,
    writer: tokio::sync::Mutex<Option<AmpWriter>>,
    pub(crate) codec: MessageCodec,
    cancel: CancellationToken,
}

impl Shared {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) async fn send_payload(&self, payload: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock().await;
        let writer = writer.as_mut().ok_or(ConnError::Closed)?;
        writer.send(payload).await?;
        Ok(())
    }
}

/// An open connection whose inbound messages are fanned out to clients.
///
/// Dropping it stops the background task; use [`close`](Self::close) to also
/// wait for the task and shut down the link.
pub struct SharedConnection {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl SharedConnection {
    /// Start fanning out messages from an open connection.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(conn: AmpConnection) -> Result<Self> {
        let (reader, writer, codec) = conn.into_parts()?;
        let shared = Arc::new(Shared {
            registry: Mutex::new(Registry::default()),
            writer: tokio::sync::Mutex::new(Some(writer)),
            codec,
            cancel: CancellationToken::new(),
        });
        let task = tokio::spawn(fan_out(reader, Arc::clone(&shared)));
        debug!("fan-out task started");
        Ok(Self {
            shared,
            task: Some(task),
        })
    }

    /// Register a new client. It receives every message read from now on.
    pub fn new_client(&self) -> ClientConnection {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.shared.registry().register(sender);
        trace!(?id, "client registered");
        ClientConnection {
            id,
            receiver,
            pending: VecDeque::new(),
            shared: Arc::clone(&self.shared),
            windows: CommandWindows::default(),
        }
    }

    /// Number of clients currently registered.
    pub fn client_count(&self) -> usize {
        self.shared.registry().len()
    }

    /// Whether the background task is still reading.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn codec(&self) -> &MessageCodec {
        &self.shared.codec
    }

    /// Token that stops the background task when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shared.cancel.clone()
    }

    /// Stop the background task, wait for it, then shut down the link.
    ///
    /// Every client's queue ends once the task has stopped.
    pub async fn close(mut self) -> Result<()> {
        self.shared.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!(%err, "fan-out task failed");
            }
        }
        let writer = self.shared.writer.lock().await.take();
        if let Some(mut writer) = writer {
            writer.shutdown().await?;
        }
        info!("shared connection closed");
        Ok(())
    }
}

impl Drop for SharedConnection {
    fn drop(&mut self) {
        self.shared.cancel.cancel();
    }
}

async fn fan_out(mut reader: AmpReader, shared: Arc<Shared>) {
    loop {
        let next = tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => {
                debug!("fan-out task cancelled");
                break;
            }
            next = reader.next_message() => next,
        };
        let item = match next {
            Ok(Some(message)) => {
                message.log(Level::TRACE);
                Ok(message)
            }
            Ok(None) => {
                info!("connection reached end of stream");
                break;
            }
            Err(MessageReadError::Message(err)) => {
                warn!(%err, "could not decode message");
                Err(err)
            }
            Err(MessageReadError::Frame(err)) => {
                error!(%err, "connection read failed");
                break;
            }
        };
        shared.registry().deliver(&item);
    }
    shared.registry().close();
    debug!(stats = ?reader.stats(), "fan-out task finished");
}

/// One logical user of a [`SharedConnection`].
///
/// Dropping the client unregisters it.
pub struct ClientConnection {
    id: ClientId,
    pub(crate) receiver: UnboundedReceiver<ClientItem>,
    /// Batch of an interrupted command window, handed out before the queue.
    pub(crate) pending: VecDeque<Message>,
    pub(crate) shared: Arc<Shared>,
    pub(crate) windows: CommandWindows,
}

impl ClientConnection {
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Next item from this client's queue. `None` once the connection has
    /// stopped reading and the queue is drained.
    ///
    /// Cancel safe.
    pub async fn recv(&mut self) -> Option<ClientItem> {
        if let Some(message) = self.pending.pop_front() {
            return Some(Ok(message));
        }
        self.receiver.recv().await
    }

    /// Next queued item without waiting.
    pub fn try_recv(&mut self) -> Option<ClientItem> {
        if let Some(message) = self.pending.pop_front() {
            return Some(Ok(message));
        }
        self.receiver.try_recv().ok()
    }

    pub fn codec(&self) -> &MessageCodec {
        &self.shared.codec
    }

    pub async fn send_command(&self, name: &str) -> Result<()> {
        let payload = self.shared.codec.command_payload(name)?;
        self.shared.send_payload(&payload).await?;
        debug!(client = ?self.id, command = name, "sent command");
        Ok(())
    }

    pub async fn send_volume_direct_command(&self, zone: u8, volume: i32) -> Result<()> {
        let payload = self.shared.codec.volume_direct_payload(zone, volume)?;
        self.shared.send_payload(&payload).await?;
        debug!(client = ?self.id, zone, volume, "sent volume direct command");
        Ok(())
    }
}

impl Drop for ClientConnection {
    fn drop(&mut self) {
        self.shared.registry().unregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (UnboundedSender<ClientItem>, UnboundedReceiver<ClientItem>) {
        mpsc::unbounded_channel()
    }

    fn item(key: u8) -> ClientItem {
        Ok(Message::Command(rspserial_message::CommandMessage::new(0x10, vec![key])))
    }

    #[test]
    fn registry_reuses_slots_with_new_generation() {
        let mut registry = Registry::default();
        let (a_tx, _a_rx) = channel();
        let (b_tx, _b_rx) = channel();
        let a = registry.register(a_tx);
        registry.unregister(a);
        let b = registry.register(b_tx);
        assert_eq!(a.index, b.index);
        assert_ne!(a.generation, b.generation);

        // A stale handle does not remove the new occupant.
        registry.unregister(a);
        assert_eq!(registry.len(), 1);
        registry.unregister(b);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn deliver_drops_closed_receivers() {
        let mut registry = Registry::default();
        let (a_tx, mut a_rx) = channel();
        let (b_tx, b_rx) = channel();
        registry.register(a_tx);
        registry.register(b_tx);
        drop(b_rx);

        registry.deliver(&item(1));
        assert_eq!(registry.len(), 1);
        assert_eq!(a_rx.try_recv().unwrap(), item(1));
    }

    #[test]
    fn close_ends_every_queue() {
        let mut registry = Registry::default();
        let (a_tx, mut a_rx) = channel();
        registry.register(a_tx);
        registry.deliver(&item(7));
        registry.close();

        assert_eq!(a_rx.try_recv().unwrap(), item(7));
        assert!(matches!(
            a_rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));

        let (late_tx, mut late_rx) = channel();
        registry.register(late_tx);
        assert!(matches!(
            late_rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
