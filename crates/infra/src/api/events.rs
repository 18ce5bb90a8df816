//! Build event streaming
//!
//! A build's live output is served as a server-sent event stream. Opening
//! the stream checks the status synchronously; afterwards one background
//! task reads events, decodes them into [`BuildEvent`]s and hands each one
//! to the consumer until the stream ends, fails or the caller cancels.
//!
//! Every stop ends the [`BuildEventStream`] the same way. The cause is only
//! logged.

use std::fmt;

use async_trait::async_trait;
use futures::StreamExt;
use glide_domain::constants::END_EVENT_NAME;
use glide_domain::{BuildEvent, GlideError, Result};
use reqwest::RequestBuilder;
use reqwest_eventsource::{retry, Event, EventSource};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, instrument, trace, Instrument};

use super::client::ConcourseClient;
use crate::errors::InfraError;

/// One event as framed by the transport, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// SSE event name; `message` when the server sent none
    pub name: String,
    pub data: String,
}

impl RawEvent {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self { name: name.into(), data: data.into() }
    }
}

/// Reader of framed events.
#[async_trait]
pub trait EventReader: Send {
    /// Next event, an error if reading failed, or `None` once the stream is
    /// exhausted.
    async fn next_event(&mut self) -> Option<Result<RawEvent>>;

    /// Release the underlying connection. Must be safe to call more than
    /// once.
    fn close(&mut self);
}

/// [`EventReader`] over an open `EventSource` with retries disabled.
pub struct SseReader {
    source: EventSource,
}

impl SseReader {
    /// Send `request` and wait for the stream to open.
    ///
    /// # Errors
    ///
    /// - `Http` when the server answers with anything but 200; the body is
    ///   not read
    /// - `Network` when the connection fails or the response is not an
    ///   event stream
    pub async fn open(request: RequestBuilder) -> Result<Self> {
        let mut source = EventSource::new(request).map_err(InfraError::from)?;
        source.set_retry_policy(Box::new(retry::Never));

        loop {
            match source.next().await {
                Some(Ok(Event::Open)) => return Ok(Self { source }),
                // Messages are only produced after `Open`
                Some(Ok(Event::Message(_))) => continue,
                Some(Err(err)) => {
                    source.close();
                    return Err(InfraError::from(err).into());
                }
                None => {
                    return Err(GlideError::Network("event stream closed before opening".into()));
                }
            }
        }
    }
}

#[async_trait]
impl EventReader for SseReader {
    async fn next_event(&mut self) -> Option<Result<RawEvent>> {
        loop {
            match self.source.next().await? {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    return Some(Ok(RawEvent { name: message.event, data: message.data }));
                }
                Err(reqwest_eventsource::Error::StreamEnded) => return None,
                Err(err) => return Some(Err(InfraError::from(err).into())),
            }
        }
    }

    fn close(&mut self) {
        self.source.close();
    }
}

/// Event paired with the acknowledgement its consumer sends on receipt.
type Handoff = (BuildEvent, oneshot::Sender<()>);

/// Create a connected [`EventSender`] and [`BuildEventStream`].
///
/// Delivery is a synchronous handoff: [`EventSender::deliver`] completes
/// only once [`BuildEventStream::recv`] has taken the event.
pub fn event_channel() -> (EventSender, BuildEventStream) {
    let (tx, rx) = mpsc::channel(1);
    (EventSender { tx }, BuildEventStream { rx })
}

/// Producing half of an [`event_channel`].
#[derive(Debug)]
pub struct EventSender {
    tx: mpsc::Sender<Handoff>,
}

impl EventSender {
    /// Hand `event` to the consumer and wait until it is taken.
    ///
    /// Returns `false` if the stream was dropped. Dropping this future
    /// before it completes withdraws the event.
    pub async fn deliver(&self, event: BuildEvent) -> bool {
        let (ack, taken) = oneshot::channel();
        if self.tx.send((event, ack)).await.is_err() {
            return false;
        }
        taken.await.is_ok()
    }

    /// Completes once the stream has been dropped.
    pub async fn closed(&self) {
        self.tx.closed().await;
    }
}

/// Events of one build, in the order the server sent them.
#[derive(Debug)]
pub struct BuildEventStream {
    rx: mpsc::Receiver<Handoff>,
}

impl BuildEventStream {
    /// Next event, or `None` once the stream has stopped for any reason.
    pub async fn recv(&mut self) -> Option<BuildEvent> {
        while let Some((event, ack)) = self.rx.recv().await {
            if ack.send(()).is_ok() {
                return Some(event);
            }
            // Withdrawn by the producer before it was taken
        }
        None
    }
}

/// Why a forwarder stopped.
#[derive(Debug)]
enum StopReason {
    EndEvent,
    Exhausted,
    ReadFailed(GlideError),
    Cancelled,
    ReceiverDropped,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndEvent => write!(f, "end event"),
            Self::Exhausted => write!(f, "stream exhausted"),
            Self::ReadFailed(err) => write!(f, "read failed: {err}"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::ReceiverDropped => write!(f, "receiver dropped"),
        }
    }
}

/// Forward decoded events from `reader` to `tx` until the stream stops.
///
/// Cancellation is checked before every read and raced against every
/// pending read and handoff. Payloads that do not decode to an event object
/// are skipped. The reader is closed and `tx` dropped on every exit path.
pub async fn forward_events<R: EventReader>(
    mut reader: R,
    tx: EventSender,
    cancel: CancellationToken,
) {
    let mut forwarded: u64 = 0;
    let reason = loop {
        if cancel.is_cancelled() {
            break StopReason::Cancelled;
        }

        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => break StopReason::Cancelled,
            () = tx.closed() => break StopReason::ReceiverDropped,
            next = reader.next_event() => next,
        };

        let raw = match next {
            None => break StopReason::Exhausted,
            Some(Err(err)) => break StopReason::ReadFailed(err),
            Some(Ok(raw)) => raw,
        };

        if raw.name == END_EVENT_NAME {
            break StopReason::EndEvent;
        }

        let event = match BuildEvent::from_json(&raw.data) {
            Ok(event) => event,
            Err(err) => {
                trace!(name = %raw.name, error = %err, "skipping undecodable event");
                continue;
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => break StopReason::Cancelled,
            delivered = tx.deliver(event) => {
                if !delivered {
                    break StopReason::ReceiverDropped;
                }
                forwarded += 1;
            }
        }
    };

    reader.close();
    debug!(reason = %reason, forwarded, "build event stream stopped");
}

impl ConcourseClient {
    /// Stream the events of a build.
    ///
    /// The returned stream yields events in the order the server sent them
    /// and ends when the build's `end` event arrives, the stream fails, or
    /// `cancel` fires. These cases are indistinguishable from the stream.
    ///
    /// # Errors
    ///
    /// Returns error, and starts no task, if the stream cannot be opened:
    /// `Http` for a non-200 status, `Auth` if no token can be obtained,
    /// `Network` for transport failures or when `cancel` fires first.
    #[instrument(skip(self, cancel))]
    pub async fn build_events(
        &self,
        build_id: i64,
        cancel: CancellationToken,
    ) -> Result<BuildEventStream> {
        let reader = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Err(GlideError::Network("build event stream open cancelled".into()));
            }
            reader = self.open_build_events(build_id) => reader?,
        };
        debug!("build event stream opened");

        let (tx, rx) = event_channel();
        tokio::spawn(
            forward_events(reader, tx, cancel).instrument(info_span!("build_events", build_id)),
        );

        Ok(rx)
    }

    async fn open_build_events(&self, build_id: i64) -> Result<SseReader> {
        let url = self.api_url(&["builds", &build_id.to_string(), "events"])?;
        let transport = self.transport();
        let request = transport.authorize(transport.client().get(url)).await?;
        SseReader::open(request).await
    }
}
