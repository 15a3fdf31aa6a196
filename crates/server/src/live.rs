// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live assignment notifications for dispatch screens.
//!
//! Committed assignments, reassignments and status changes are pushed to
//! every connected WebSocket client. Events are informational only: they
//! are sent after the commit, a send failure never undoes it, and clients
//! must still read the HTTP API for authoritative state.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use fieldops::{AssignmentEvent, AssignmentNotifier, NotifyError};
use futures::{SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// Slow clients lose the oldest events.
const EVENT_BUFFER_SIZE: usize = 100;

/// Live event types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A complaint received its first technician.
    ComplaintAssigned {
        complaint_id: i64,
        staff_id: i64,
        office_id: i64,
        assigned_by: String,
    },
    /// A complaint moved to another technician.
    ComplaintReassigned {
        complaint_id: i64,
        staff_id: i64,
        previous_staff_id: i64,
        office_id: i64,
        assigned_by: String,
    },
    /// A complaint moved along its lifecycle.
    StatusChanged {
        complaint_id: i64,
        from: String,
        to: String,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server timestamp (RFC 3339).
        timestamp: String,
    },
}

impl From<&AssignmentEvent> for LiveEvent {
    fn from(event: &AssignmentEvent) -> Self {
        match event {
            AssignmentEvent::Assigned { record, area_id } => Self::ComplaintAssigned {
                complaint_id: record.complaint_id.value(),
                staff_id: record.technician_id.value(),
                office_id: area_id.value(),
                assigned_by: record.assigned_by.clone(),
            },
            AssignmentEvent::Reassigned {
                record,
                area_id,
                previous_technician_id,
            } => Self::ComplaintReassigned {
                complaint_id: record.complaint_id.value(),
                staff_id: record.technician_id.value(),
                previous_staff_id: previous_technician_id.value(),
                office_id: area_id.value(),
                assigned_by: record.assigned_by.clone(),
            },
            AssignmentEvent::StatusChanged {
                complaint_id,
                from,
                to,
            } => Self::StatusChanged {
                complaint_id: complaint_id.value(),
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            },
        }
    }
}

/// Broadcaster for live events.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// If no clients are connected, the event is dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to events sent from now on.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentNotifier for LiveEventBroadcaster {
    fn notify(&self, event: &AssignmentEvent) -> Result<(), NotifyError> {
        self.broadcast(&LiveEvent::from(event));
        Ok(())
    }
}

/// Upgrades the connection and streams live events to it.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

async fn handle_socket(socket: WebSocket, broadcaster: Arc<LiveEventBroadcaster>) {
    info!("Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let connected_event = LiveEvent::Connected {
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::from("unknown")),
    };

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(?e, "Failed to serialize live event");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live event client lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Clients never send commands; only watch for the close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live event stream");
}
