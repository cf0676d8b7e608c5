//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{sync::mpsc, time::timeout};
use tokio_util::sync::CancellationToken;

use crate::{domain::PusherChannel, ui::state::RoomState};

/// `/ws`: upgrade to WebSocket and join the room.
///
/// Upgrade failures are logged and answered with axum's rejection; no client
/// state is created for them.
pub async fn websocket_handler(
    State(state): State<Arc<RoomState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::warn!(
                "[Room {}] WebSocket upgrade failed: {}",
                state.room.id(),
                rejection
            );
            return rejection.into_response();
        }
    };

    let room_id = state.room.id().clone();
    ws.on_failed_upgrade(move |e| {
        tracing::warn!("[Room {}] WebSocket upgrade failed: {}", room_id, e);
    })
    .on_upgrade(move |socket| handle_socket(socket, state))
}

/// How long a closed connection may take to accept its Close frame.
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// Spawns a task that receives frames from the client's outbound queue and
/// writes them to the WebSocket.
///
/// The task ends when the queue is drained and closed, or as soon as the
/// client is closed by the room, even in the middle of a write to a peer that
/// stopped reading. Either way it tries to send a Close frame before the sink
/// is dropped.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    close_signal: CancellationToken,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                biased;
                () = close_signal.cancelled() => break,
                msg = rx.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
            };

            tokio::select! {
                biased;
                () = close_signal.cancelled() => break,
                result = sender.send(Message::Text(msg.into())) => {
                    if let Err(e) = result {
                        tracing::debug!("WebSocket write error: {}", e);
                        return;
                    }
                }
            }
        }

        if timeout(CLOSE_GRACE, sender.send(Message::Close(None)))
            .await
            .is_err()
        {
            tracing::debug!("Peer did not accept the close frame, dropping connection");
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<RoomState>) {
    let (sender, mut receiver) = socket.split();

    // Outbound queue drained by the writer task
    let (tx, rx) = mpsc::channel(state.outbound_capacity);
    let channel = PusherChannel::new(tx);
    let close_signal = channel.close_signal();

    let client = match state.connect_client_usecase.execute(channel).await {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("[Room {}] Failed to accept client: {}", state.room.id(), e);
            return;
        }
    };
    let connection_id = client.connection_id;

    let mut send_task = pusher_loop(rx, close_signal, sender);

    // Reader loop: frames enter the room in arrival order
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket read error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if let Err(e) = state_clone
                        .receive_message_usecase
                        .execute(&connection_id, text.as_str())
                        .await
                    {
                        tracing::debug!("Stop reading from '{}': {}", connection_id, e);
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::debug!("Client '{}' requested close", connection_id);
                    break;
                }
                Message::Binary(data) => {
                    tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_client_usecase
        .execute(&connection_id)
        .await;
}
