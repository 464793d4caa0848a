//! WebSocket Connection Management - One listen task and one write task per socket

use crate::ws::{RATE_LIMITER_MILLIS, TIMEOUT_DURATION_SECONDS};
use crate::{AppState, dtos::WsEventDTO, ws::usermap::InternalSignal};
use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::{Duration, interval, timeout};
use tracing::{debug, error, info, instrument, warn};

#[instrument(skip(ws, state), fields(user_id = %user_id))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, user_id: String) {
    info!("WebSocket connection established");

    let (ws_tx, ws_rx) = ws.split();

    // The write task owns the socket sink; everything else talks to it through this channel
    let (int_tx, int_rx) = unbounded_channel::<InternalSignal>();

    state.users_online.register_online(&user_id, int_tx.clone());

    tokio::spawn(listen_ws(user_id.clone(), ws_rx, int_tx, state));
    tokio::spawn(write_ws(user_id, ws_tx, int_rx));
}

#[instrument(skip(websocket_tx, internal_rx), fields(user_id = %user_id))]
pub async fn write_ws(
    user_id: String,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<InternalSignal>,
) {
    info!("Write task started");

    while let Some(signal) = internal_rx.recv().await {
        match signal {
            InternalSignal::Shutdown => {
                info!("Shutdown signal received");
                break;
            }
            InternalSignal::Event(event) => {
                if send_event(&mut websocket_tx, &event).await.is_err() {
                    warn!("Failed to send event, closing connection");
                    break;
                }
            }
        }
    }

    let _ = websocket_tx.send(Message::Close(None)).await;
    info!("Write task terminated");
}

async fn send_event(
    websocket_tx: &mut SplitSink<WebSocket, Message>,
    event: &WsEventDTO,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(|e| {
        error!("Failed to serialize event: {:?}", e);
        axum::Error::new(e)
    })?;
    websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await
}

#[instrument(skip(websocket_rx, internal_tx, state), fields(user_id = %user_id))]
pub async fn listen_ws(
    user_id: String,
    mut websocket_rx: SplitStream<WebSocket>,
    internal_tx: UnboundedSender<InternalSignal>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    let mut rate_limiter = interval(Duration::from_millis(RATE_LIMITER_MILLIS));
    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, websocket_rx.next()).await {
            Ok(Some(Ok(msg))) => {
                rate_limiter.tick().await;
                match msg {
                    // Messages are sent over HTTP; the socket only carries server events
                    Message::Text(_) | Message::Binary(_) => {
                        debug!("Client frame ignored");
                        let _ = internal_tx.send(InternalSignal::Event(WsEventDTO::Error {
                            code: 400,
                            message: "This channel only delivers notifications".to_string(),
                        }));
                    }
                    Message::Close(_) => {
                        info!("Close message received");
                        break;
                    }
                    _ => {}
                }
            }
            Ok(Some(Err(e))) => {
                warn!("WebSocket error: {:?}", e);
                break;
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(timeout_secs = TIMEOUT_DURATION_SECONDS, "Connection timeout");
                break;
            }
        }
    }

    let _ = internal_tx.send(InternalSignal::Shutdown);
    state.users_online.remove_from_online(&user_id, &internal_tx);
    info!("Listen task terminated");
}
