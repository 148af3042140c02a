//! Live alert feeds: WebSocket and Server-Sent Events

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::{SinkExt, StreamExt};
use futures_util::stream::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{debug, warn};

use super::handlers::AppState;
use crate::models::Alert;

/// SSE stream of alerts as they are raised
pub async fn stream_alerts(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = tokio_stream::StreamExt::filter_map(
        BroadcastStream::new(state.live.subscribe()),
        |msg| match msg {
            Ok(alert) => Event::default().event("alert").json_data(&alert).ok().map(Ok),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "SSE subscriber lagged");
                None
            }
        },
    );

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keepalive"),
    )
}

/// WebSocket upgrade for the alert topic
pub async fn ws_alerts(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let rx = state.live.subscribe();
    ws.on_upgrade(move |socket| handle_ws(socket, rx))
}

async fn handle_ws(socket: WebSocket, mut rx: broadcast::Receiver<Alert>) {
    let (mut sender, mut receiver) = socket.split();
    debug!("WebSocket subscriber connected");

    // Forward alerts to this client.
    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(alert) => {
                    let Ok(text) = serde_json::to_string(&alert) else {
                        continue;
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "WebSocket subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Drain pings and close frames.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    debug!("WebSocket subscriber disconnected");
}
