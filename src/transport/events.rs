//! Background-to-foreground connection event bridging.
//!
//! Driver processing runs on background tasks; application logic runs
//! on a single foreground context. [`EventQueue`] is the bridge: a
//! multiple-producer/single-consumer FIFO whose producers never block
//! and whose consumer drains until empty, once per tick.

use tokio::sync::mpsc;

/// Handle to a connection produced by a specific driver generation.
///
/// The epoch stamps the `create_driver` generation that produced the
/// handle, so handles surviving a driver re-create are detectably
/// stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionHandle {
    id: u64,
    epoch: u64,
}

impl ConnectionHandle {
    pub(crate) fn new(id: u64, epoch: u64) -> Self {
        Self { id, epoch }
    }

    /// The driver's raw connection id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The driver generation that produced this handle.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// A transport-level occurrence produced by background processing.
///
/// Consumed exactly once by the foreground drain, in the order the
/// driver observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connection was established.
    Connected {
        /// The originating connection.
        connection: ConnectionHandle,
    },
    /// A connection was closed or timed out.
    Disconnected {
        /// The originating connection.
        connection: ConnectionHandle,
    },
    /// A payload arrived.
    Data {
        /// The originating connection.
        connection: ConnectionHandle,
        /// The received payload.
        payload: Vec<u8>,
    },
}

impl ConnectionEvent {
    /// The connection this event concerns.
    pub fn connection(&self) -> ConnectionHandle {
        match self {
            Self::Connected { connection }
            | Self::Disconnected { connection }
            | Self::Data { connection, .. } => *connection,
        }
    }
}

/// Cloneable producer half of the event bridge.
///
/// Held by background processing; enqueues never block. Sends after
/// the queue has been disposed are silently dropped, which is the
/// correct fate for events of a dead driver.
#[derive(Debug, Clone)]
pub struct EventProducer {
    tx: mpsc::UnboundedSender<ConnectionEvent>,
    epoch: u64,
}

impl EventProducer {
    /// Emit a connect event for the given raw connection id.
    pub fn connected(&self, connection_id: u64) {
        self.emit(ConnectionEvent::Connected {
            connection: ConnectionHandle::new(connection_id, self.epoch),
        });
    }

    /// Emit a disconnect event for the given raw connection id.
    pub fn disconnected(&self, connection_id: u64) {
        self.emit(ConnectionEvent::Disconnected {
            connection: ConnectionHandle::new(connection_id, self.epoch),
        });
    }

    /// Emit a data event for the given raw connection id.
    pub fn data(&self, connection_id: u64, payload: Vec<u8>) {
        self.emit(ConnectionEvent::Data {
            connection: ConnectionHandle::new(connection_id, self.epoch),
            payload,
        });
    }

    fn emit(&self, event: ConnectionEvent) {
        let _ = self.tx.send(event);
    }
}

/// The event bridge: producers on background tasks, one consumer on
/// the foreground.
///
/// Lives and dies with the driver that feeds it; disposing the driver
/// drops the queue, invalidating outstanding producers.
#[derive(Debug)]
pub struct EventQueue {
    tx: mpsc::UnboundedSender<ConnectionEvent>,
    rx: mpsc::UnboundedReceiver<ConnectionEvent>,
    epoch: u64,
}

impl EventQueue {
    /// Create a queue whose producers stamp handles with `epoch`.
    pub fn new(epoch: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, epoch }
    }

    /// Create a new producer handle for background work.
    pub fn producer(&self) -> EventProducer {
        EventProducer {
            tx: self.tx.clone(),
            epoch: self.epoch,
        }
    }

    /// Drain every queued event, in enqueue order.
    pub fn drain(&mut self) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }
}
