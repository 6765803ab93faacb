//! Action executor.
//!
//! Translates [`ChatAction`]s into outbound WebSocket frames. Broadcast
//! targets are resolved against the controller's registry at execution
//! time, which is why callers keep holding the controller lock: the
//! membership a broadcast sees is exactly the membership the event
//! committed. Sends go into per-connection channels and never block here.

use axum::extract::ws::Message as WsMessage;
use roomcast_core::{ChatAction, ChatController, ConnectionId, LogLevel};
use roomcast_proto::ServerEvent;

use crate::{SharedState, SystemEnv};

/// Executes controller actions in order.
pub(crate) async fn execute_actions(
    controller: &ChatController<SystemEnv>,
    actions: Vec<ChatAction>,
    state: &SharedState,
) {
    for action in actions {
        match action {
            ChatAction::Send { connection, event } => {
                send_event(state, connection, &event).await;
            },

            ChatAction::Broadcast { room, event, exclude } => {
                for target in controller.connections_in_room(&room) {
                    if Some(target) != exclude {
                        send_event(state, target, &event).await;
                    }
                }
            },

            ChatAction::Ack { connection, error } => {
                send_event(state, connection, &ServerEvent::Ack { error }).await;
            },

            ChatAction::Log { level, message } => match level {
                LogLevel::Debug => tracing::debug!("{message}"),
                LogLevel::Info => tracing::info!("{message}"),
                LogLevel::Warn => tracing::warn!("{message}"),
            },
        }
    }
}

/// Encodes an event and queues it on a connection's outbound channel.
pub(crate) async fn send_event(state: &SharedState, connection: ConnectionId, event: &ServerEvent) {
    let text = match serde_json::to_string(event) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!(%connection, "failed to encode outbound event: {err}");
            return;
        },
    };

    let senders = state.senders.read().await;
    match senders.get(&connection) {
        Some(sender) => {
            // A closed channel means the connection is tearing down; its
            // disconnect event will clean up the registry.
            if sender.send(WsMessage::Text(text.into())).is_err() {
                tracing::debug!(%connection, "outbound channel closed, dropping event");
            }
        },
        None => {
            tracing::debug!(%connection, "no outbound channel for connection, dropping event");
        },
    }
}
