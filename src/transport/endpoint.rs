//! The transport endpoint: driver ownership, pipelines, and the
//! background-completion barrier.

use std::collections::HashSet;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::driver::{ConnectionData, DriverSettings, NetworkDriver, PipelineHandle, PipelineStage};
use super::error::TransportError;
use super::events::{ConnectionEvent, ConnectionHandle, EventQueue};

/// What the endpoint is currently doing, transport-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMode {
    /// Driver exists (or not) but neither listen nor connect has run.
    Idle,
    /// Listening for incoming connections (host role).
    Listening,
    /// Connected or connecting to a remote endpoint (client role).
    Connecting,
}

/// Everything whose validity is tied to a live driver.
///
/// Pipelines and the event queue are valid iff the driver is; dropping
/// this record invalidates all of them atomically.
struct ActiveDriver<D> {
    /// The driver, present when no processing round is in flight.
    driver: Option<D>,
    /// The in-flight background round, if one was scheduled.
    processing: Option<JoinHandle<(D, Result<(), TransportError>)>>,
    reliable: PipelineHandle,
    unreliable: PipelineHandle,
    events: EventQueue,
}

/// Owns a network driver and bridges its background-produced events
/// onto the foreground context.
///
/// Used identically by a hosting endpoint and a connecting endpoint;
/// the two roles differ only in which start operation they call.
///
/// State machine: `Uninitialized → Initialized` on a successful
/// [`create_driver`](Self::create_driver), back to `Uninitialized` on
/// [`dispose_driver`](Self::dispose_driver). There are no partial
/// states: creation either fully succeeds (driver plus both pipelines
/// valid) or leaves the endpoint uninitialized.
pub struct TransportEndpoint<D: NetworkDriver> {
    active: Option<ActiveDriver<D>>,
    /// Bumped on every successful driver creation; stamps connection
    /// handles so stale ones are detectable after reconnect cycles.
    epoch: u64,
    /// Connections observed closed via drained disconnect events.
    closed: HashSet<u64>,
    timeout: Duration,
    mode: EndpointMode,
}

impl<D: NetworkDriver> Default for TransportEndpoint<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: NetworkDriver> TransportEndpoint<D> {
    /// Create an uninitialized endpoint.
    pub fn new() -> Self {
        Self {
            active: None,
            epoch: 0,
            closed: HashSet::new(),
            timeout: Duration::ZERO,
            mode: EndpointMode::Idle,
        }
    }

    /// Construct the driver and derive both delivery pipelines.
    ///
    /// The reliable pipeline fragments and retransmits (in-order,
    /// exactly-once-effective delivery of payloads up to the
    /// configured capacity); the unreliable pipeline is sequenced but
    /// droppable. Fails with [`TransportError::DriverInit`] when the
    /// settings are invalid, and with
    /// [`TransportError::InvalidState`] when a driver already exists.
    pub fn create_driver(&mut self, settings: DriverSettings) -> Result<(), TransportError> {
        if self.active.is_some() {
            return Err(TransportError::InvalidState(
                "driver already created".into(),
            ));
        }
        settings.validate()?;

        let mut driver = D::create(&settings)?;
        let reliable = driver.create_pipeline(&[
            PipelineStage::Fragmentation,
            PipelineStage::ReliableSequenced,
        ])?;
        let unreliable = driver.create_pipeline(&[PipelineStage::UnreliableSequenced])?;

        self.epoch += 1;
        self.closed.clear();
        self.timeout = settings.connection_timeout;
        self.mode = EndpointMode::Idle;
        self.active = Some(ActiveDriver {
            driver: Some(driver),
            processing: None,
            reliable,
            unreliable,
            events: EventQueue::new(self.epoch),
        });
        debug!(epoch = self.epoch, "transport driver created");
        Ok(())
    }

    /// Release the driver, its pipelines, and the event queue.
    ///
    /// Must only be called once all background processing has been
    /// completed via [`complete_processing`](Self::complete_processing).
    /// Disposing an uninitialized endpoint (including double-dispose)
    /// is a programmer error and fails with
    /// [`TransportError::InvalidState`].
    pub fn dispose_driver(&mut self) -> Result<(), TransportError> {
        match self.active.as_ref() {
            None => Err(TransportError::InvalidState(
                "dispose on uninitialized endpoint".into(),
            )),
            Some(active) if active.processing.is_some() => Err(TransportError::InvalidState(
                "background processing outstanding; complete it before disposing".into(),
            )),
            Some(_) => {
                self.active = None;
                self.mode = EndpointMode::Idle;
                self.timeout = Duration::ZERO;
                debug!(epoch = self.epoch, "transport driver disposed");
                Ok(())
            }
        }
    }

    /// True iff a driver currently exists.
    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    /// True iff `connection` was produced by the current driver
    /// generation and has not been observed closed.
    pub fn is_valid_connection(&self, connection: ConnectionHandle) -> bool {
        self.active.is_some()
            && connection.epoch() == self.epoch
            && !self.closed.contains(&connection.id())
    }

    /// The endpoint's current transport mode.
    pub fn mode(&self) -> EndpointMode {
        self.mode
    }

    /// The timeout applied to unresponsive connections, zero when
    /// uninitialized.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Handle of the reliable-sequenced pipeline (fragmentation plus
    /// retransmission); for control and critical payloads.
    pub fn reliable_pipeline(&self) -> Option<PipelineHandle> {
        self.active.as_ref().map(|a| a.reliable)
    }

    /// Handle of the unreliable-sequenced pipeline; for
    /// latency-sensitive, loss-tolerant payloads.
    pub fn unreliable_pipeline(&self) -> Option<PipelineHandle> {
        self.active.as_ref().map(|a| a.unreliable)
    }

    /// Borrow the driver, if initialized and not processing.
    pub fn driver(&self) -> Option<&D> {
        self.active.as_ref().and_then(|a| a.driver.as_ref())
    }

    /// Mutably borrow the driver, if initialized and not processing.
    pub fn driver_mut(&mut self) -> Option<&mut D> {
        self.active.as_mut().and_then(|a| a.driver.as_mut())
    }

    /// Begin listening for incoming connections (host role).
    pub async fn start_listening(&mut self, target: &ConnectionData) -> Result<(), TransportError> {
        self.foreground_driver()?.listen(target).await?;
        self.mode = EndpointMode::Listening;
        debug!(relayed = target.is_relayed(), "endpoint listening");
        Ok(())
    }

    /// Dial a remote endpoint (client role).
    pub async fn start_connecting(
        &mut self,
        target: &ConnectionData,
    ) -> Result<ConnectionHandle, TransportError> {
        let id = self.foreground_driver()?.connect(target).await?;
        self.mode = EndpointMode::Connecting;
        debug!(relayed = target.is_relayed(), id, "endpoint connecting");
        Ok(ConnectionHandle::new(id, self.epoch))
    }

    /// Send a payload on `connection` through the given pipeline.
    ///
    /// Pipeline selection is the caller's decision: use
    /// [`reliable_pipeline`](Self::reliable_pipeline) for payloads that
    /// must arrive, [`unreliable_pipeline`](Self::unreliable_pipeline)
    /// for frequent state updates that may be dropped.
    pub async fn send(
        &mut self,
        connection: ConnectionHandle,
        pipeline: PipelineHandle,
        payload: &[u8],
    ) -> Result<(), TransportError> {
        if connection.epoch() != self.epoch {
            return Err(TransportError::InvalidState(
                "stale connection handle from a previous driver".into(),
            ));
        }
        self.foreground_driver()?
            .send(connection.id(), pipeline, payload)
            .await
    }

    /// Schedule one background round of driver packet processing.
    ///
    /// The driver moves onto a background task for the duration of the
    /// round; foreground driver operations fail with
    /// [`TransportError::InvalidState`] until
    /// [`complete_processing`](Self::complete_processing) joins it.
    pub fn schedule_processing(&mut self) -> Result<(), TransportError> {
        let active = self.active.as_mut().ok_or_else(|| {
            TransportError::InvalidState("schedule on uninitialized endpoint".into())
        })?;
        let mut driver = active.driver.take().ok_or_else(|| {
            TransportError::InvalidState("processing round already scheduled".into())
        })?;
        let producer = active.events.producer();
        active.processing = Some(tokio::spawn(async move {
            let result = driver.process(producer).await;
            (driver, result)
        }));
        Ok(())
    }

    /// Complete any outstanding background processing round.
    ///
    /// This is the completion barrier: it must run at the start of
    /// every tick, before draining events, and before disposal or a
    /// new scheduling round. A no-op when nothing is outstanding.
    pub async fn complete_processing(&mut self) -> Result<(), TransportError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        let Some(handle) = active.processing.take() else {
            return Ok(());
        };
        let (driver, result) = handle
            .await
            .map_err(|e| TransportError::Processing(e.to_string()))?;
        active.driver = Some(driver);
        if let Err(ref e) = result {
            warn!(error = %e, "background processing round failed");
        }
        result
    }

    /// Drain every pending connection event, in the order the driver
    /// observed them.
    ///
    /// Single consumer: call once per tick, after the completion
    /// barrier. Connections reported disconnected here are marked
    /// closed for [`is_valid_connection`](Self::is_valid_connection).
    pub fn drain_events(&mut self) -> Vec<ConnectionEvent> {
        let Some(active) = self.active.as_mut() else {
            return Vec::new();
        };
        let events = active.events.drain();
        for event in &events {
            if let ConnectionEvent::Disconnected { connection } = event {
                self.closed.insert(connection.id());
            }
        }
        events
    }

    fn foreground_driver(&mut self) -> Result<&mut D, TransportError> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| TransportError::InvalidState("endpoint not initialized".into()))?;
        active.driver.as_mut().ok_or_else(|| {
            TransportError::InvalidState("driver is busy with background processing".into())
        })
    }
}
