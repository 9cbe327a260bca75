//! WebSocket connection handler.
//!
//! One connection is one judge identity. The reader applies inbound frames
//! to the match in arrival order; a writer task merges the match event
//! stream with protocol error replies for this connection only.

use crate::domain::config::WebSocketConfig;
use crate::ws::protocol::{decode, ServerMessage};
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, Stream, StreamExt};
use tkd_scoring::{
    EventFilter, InMemoryEventBus, InboundSignal, JudgeId, MatchApi, MatchEvent, MatchService,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// WebSocket connection handler
pub struct WebSocketHandler {
    service: MatchService<InMemoryEventBus>,
    config: WebSocketConfig,
    judge: JudgeId,
}

impl WebSocketHandler {
    pub fn new(service: MatchService<InMemoryEventBus>, config: WebSocketConfig) -> Self {
        Self {
            service,
            config,
            judge: JudgeId::new(Uuid::new_v4().to_string()),
        }
    }

    pub fn judge(&self) -> &JudgeId {
        &self.judge
    }

    /// Size check and decode of one text frame.
    pub fn decode_frame(&self, text: &str) -> Result<InboundSignal, ServerMessage> {
        if text.len() > self.config.max_message_size {
            warn!(
                judge = %self.judge,
                size = text.len(),
                max = self.config.max_message_size,
                "Message exceeds size limit"
            );
            return Err(ServerMessage::error(format!(
                "Message too large: {} bytes (max: {})",
                text.len(),
                self.config.max_message_size
            )));
        }

        decode(text)
            .map(InboundSignal::from)
            .map_err(|e| ServerMessage::error(format!("Parse error: {}", e)))
    }

    /// Handle a WebSocket connection
    pub async fn handle(self, socket: WebSocket) {
        info!(judge = %self.judge, "Judge connected");

        let (mut sink, mut stream) = socket.split();

        // Subscribe before reading the snapshot so no change falls in between.
        let events = self
            .service
            .broadcaster()
            .event_stream(EventFilter::all());
        let greeting = ServerMessage::GameState(self.service.snapshot().await);
        if let Err(e) = sink.send(Message::Text(greeting.to_json())).await {
            warn!(judge = %self.judge, error = %e, "Failed to send initial state");
            return;
        }

        let (reply_tx, reply_rx) = mpsc::channel(self.config.outbound_buffer);
        let writer = tokio::spawn(forward_frames(
            sink,
            events,
            reply_rx,
            self.judge.clone(),
        ));

        while let Some(result) = stream.next().await {
            let text = match result {
                Ok(Message::Text(text)) => text,
                Ok(Message::Binary(data)) => match String::from_utf8(data) {
                    Ok(text) => text,
                    Err(_) => {
                        self.reply(&reply_tx, ServerMessage::error("Binary frame is not UTF-8"))
                            .await;
                        continue;
                    }
                },
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Ok(Message::Close(_)) => {
                    debug!(judge = %self.judge, "WebSocket close received");
                    break;
                }
                Err(e) => {
                    warn!(judge = %self.judge, error = %e, "WebSocket error");
                    break;
                }
            };

            match self.decode_frame(&text) {
                Ok(signal) => {
                    let outcome = self.service.dispatch(self.judge.clone(), signal).await;
                    debug!(judge = %self.judge, ?signal, ?outcome, "Frame applied");
                }
                Err(error) => self.reply(&reply_tx, error).await,
            }
        }

        writer.abort();
        info!(judge = %self.judge, "Judge disconnected");
    }

    async fn reply(&self, replies: &mpsc::Sender<ServerMessage>, message: ServerMessage) {
        if replies.send(message).await.is_err() {
            debug!(judge = %self.judge, "Writer gone, reply dropped");
        }
    }
}

/// Writer half: match events and error replies, in the order they arrive.
async fn forward_frames<S>(
    mut sink: SplitSink<WebSocket, Message>,
    events: S,
    mut replies: mpsc::Receiver<ServerMessage>,
    judge: JudgeId,
) where
    S: Stream<Item = MatchEvent> + Send,
{
    tokio::pin!(events);

    loop {
        let message = tokio::select! {
            Some(event) = events.next() => ServerMessage::from(event),
            Some(reply) = replies.recv() => reply,
            else => break,
        };

        if let Err(e) = sink.send(Message::Text(message.to_json())).await {
            debug!(%judge, error = %e, "Connection writer closed");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tkd_scoring::{MatchRules, ScoringAction, TeamId};

    fn handler(max_message_size: usize) -> WebSocketHandler {
        let service = MatchService::new(MatchRules::default(), Arc::new(InMemoryEventBus::new()));
        WebSocketHandler::new(
            service,
            WebSocketConfig {
                max_message_size,
                ..WebSocketConfig::default()
            },
        )
    }

    #[test]
    fn test_each_connection_is_a_distinct_judge() {
        assert_ne!(handler(1024).judge(), handler(1024).judge());
    }

    #[test]
    fn test_decode_frame() {
        let signal = handler(1024)
            .decode_frame(r#"{"type":"punch","team":"blue","timestamp":42}"#)
            .unwrap();
        assert_eq!(
            signal,
            InboundSignal::Strike {
                team: TeamId::Blue,
                action: ScoringAction::Punch,
                timestamp: 42,
            }
        );
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let frame = r#"{"type":"reset"}"#;
        let error = handler(frame.len() - 1).decode_frame(frame).unwrap_err();
        assert!(matches!(error, ServerMessage::Error { message } if message.starts_with("Message too large")));
    }

    #[test]
    fn test_malformed_frame_rejected() {
        let error = handler(1024).decode_frame("{").unwrap_err();
        assert!(matches!(error, ServerMessage::Error { message } if message.starts_with("Parse error")));
    }
}
