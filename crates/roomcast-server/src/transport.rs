//! WebSocket transport.
//!
//! One task pair per connection: the handler task reads inbound frames,
//! decodes them into [`ChatEvent`]s, and feeds the controller; a writer
//! task drains the connection's outbound channel so delivery order to that
//! client matches issue order. Everything else (HTTP GETs) falls through to
//! the static browser client.
//!
//! Malformed frames are answered with an `ack` error and logged; they never
//! terminate the connection.

use std::{path::Path, sync::Arc};

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message as WsMessage, WebSocket},
    },
    response::IntoResponse,
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use roomcast_core::{ChatEvent, ConnectionId, Environment};
use roomcast_proto::{ClientEvent, ServerEvent};
use tokio::sync::mpsc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{SharedState, executor};

/// Builds the application router: WebSocket endpoint plus static assets.
pub(crate) fn router(state: Arc<SharedState>, public_dir: &Path) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn ws_handler(
    State(state): State<Arc<SharedState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drives a single connection from accept to close.
async fn handle_socket(socket: WebSocket, state: Arc<SharedState>) {
    let connection = ConnectionId::new(state.env.random_u64());
    let (mut outbound, mut inbound) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();

    {
        let mut senders = state.senders.write().await;
        senders.insert(connection, tx);
    }

    // Sole owner of the outbound half. Exits when the sender is dropped on
    // cleanup below, or earlier if the peer goes away mid-send.
    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if outbound.send(message).await.is_err() {
                break;
            }
        }
    });

    dispatch(&state, ChatEvent::Connected { connection }).await;

    while let Some(Ok(message)) = inbound.next().await {
        let WsMessage::Text(text) = message else {
            continue;
        };

        match serde_json::from_str::<ClientEvent>(text.as_str()) {
            Ok(event) => dispatch(&state, client_event(connection, event)).await,
            Err(err) => {
                tracing::warn!(%connection, "unparseable client frame: {err}");
                let ack = ServerEvent::Ack { error: Some("Unrecognized event".to_owned()) };
                executor::send_event(&state, connection, &ack).await;
            },
        }
    }

    {
        let mut senders = state.senders.write().await;
        senders.remove(&connection);
    }

    dispatch(&state, ChatEvent::Disconnected { connection }).await;

    // Channel sender is gone; the writer drains what was queued and stops.
    drop(writer);
}

/// Maps a decoded wire event onto a controller event.
fn client_event(connection: ConnectionId, event: ClientEvent) -> ChatEvent {
    match event {
        ClientEvent::Join { username, room } => ChatEvent::Join { connection, username, room },
        ClientEvent::SendMessage { text } => ChatEvent::Message { connection, text },
        ClientEvent::SendLocation { latitude, longitude } => {
            ChatEvent::Location { connection, latitude, longitude }
        },
    }
}

/// Processes one event and executes its actions under a single controller
/// lock acquisition, so no other handler observes intermediate state.
async fn dispatch(state: &Arc<SharedState>, event: ChatEvent) {
    let mut controller = state.controller.lock().await;
    let actions = controller.process_event(event);
    executor::execute_actions(&controller, actions, state).await;
}
