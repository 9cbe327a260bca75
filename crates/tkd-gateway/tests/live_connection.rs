//! # Live Connection Tests
//!
//! Drives a bound gateway over real sockets: two judge consoles connect to
//! `/ws`, receive the match state, agree on a strike and both observe the
//! resulting score. Malformed frames get an error reply on their own
//! connection only.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tkd_gateway::{GatewayConfig, GatewayService};
use tkd_scoring::{InMemoryEventBus, ManualAdjustment, MatchApi, MatchRules, MatchService, TeamId};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Running gateway; dropping it shuts the server down.
struct LiveGateway {
    addr: SocketAddr,
    service: MatchService<InMemoryEventBus>,
    _shutdown: oneshot::Sender<()>,
}

impl LiveGateway {
    async fn start() -> Self {
        let service = MatchService::new(MatchRules::default(), Arc::new(InMemoryEventBus::new()));
        let config = GatewayConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            static_dir: "does-not-exist".into(),
            ..GatewayConfig::default()
        };
        let gateway = GatewayService::new(config, service.clone()).unwrap();
        let listener = gateway.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(gateway.serve_on(listener, async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            service,
            _shutdown: shutdown_tx,
        }
    }

    async fn connect(&self) -> (SplitSink<Socket, Message>, SplitStream<Socket>) {
        let (socket, _) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .unwrap();
        socket.split()
    }
}

/// Next JSON text frame; control frames are skipped.
async fn next_json(stream: &mut SplitStream<Socket>) -> Value {
    loop {
        let frame = timeout(RECV_TIMEOUT, stream.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn send_json(sink: &mut SplitSink<Socket, Message>, value: Value) {
    sink.send(Message::Text(value.to_string().into())).await.unwrap();
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

#[tokio::test]
async fn test_each_connection_is_greeted_with_match_state() {
    let gateway = LiveGateway::start().await;
    gateway
        .service
        .adjust_score(TeamId::Red, ManualAdjustment::Increment)
        .await;

    let (_sink_a, mut stream_a) = gateway.connect().await;
    let (_sink_b, mut stream_b) = gateway.connect().await;

    for stream in [&mut stream_a, &mut stream_b] {
        let greeting = next_json(stream).await;
        assert_eq!(greeting["type"], "game-state");
        assert_eq!(greeting["redScore"], 1);
        assert_eq!(greeting["blueScore"], 0);
        assert_eq!(greeting["active"], true);
    }
}

#[tokio::test]
async fn test_two_judges_agree_and_both_see_score() {
    let gateway = LiveGateway::start().await;
    let (mut sink_a, mut stream_a) = gateway.connect().await;
    let (mut sink_b, mut stream_b) = gateway.connect().await;
    assert_eq!(next_json(&mut stream_a).await["type"], "game-state");
    assert_eq!(next_json(&mut stream_b).await["type"], "game-state");

    let strike = json!({"type": "head-strike", "team": "blue", "timestamp": now_ms()});
    send_json(&mut sink_a, strike.clone()).await;
    send_json(&mut sink_b, strike).await;

    let expected = json!({"type": "score-update", "blueScore": 3, "redScore": 0});
    assert_eq!(next_json(&mut stream_a).await, expected);
    assert_eq!(next_json(&mut stream_b).await, expected);
    assert_eq!(gateway.service.snapshot().await.blue_score, 3);
}

#[tokio::test]
async fn test_malformed_frames_get_error_reply() {
    let gateway = LiveGateway::start().await;
    let (mut sink, mut stream) = gateway.connect().await;
    assert_eq!(next_json(&mut stream).await["type"], "game-state");

    sink.send(Message::Text("garbage".into())).await.unwrap();
    let reply = next_json(&mut stream).await;
    assert_eq!(reply["type"], "error");
    assert!(reply["message"]
        .as_str()
        .unwrap()
        .starts_with("Parse error: "));

    sink.send(Message::Binary(vec![0xff, 0xfe].into()))
        .await
        .unwrap();
    let reply = next_json(&mut stream).await;
    assert_eq!(
        reply,
        json!({"type": "error", "message": "Binary frame is not UTF-8"})
    );

    // The connection survives bad frames.
    send_json(&mut sink, json!({"type": "manual-increment", "team": "red"})).await;
    let update = next_json(&mut stream).await;
    assert_eq!(update, json!({"type": "score-update", "blueScore": 0, "redScore": 1}));
}

#[tokio::test]
async fn test_error_reply_stays_on_sender_connection() {
    let gateway = LiveGateway::start().await;
    let (mut sink_a, mut stream_a) = gateway.connect().await;
    let (_sink_b, mut stream_b) = gateway.connect().await;
    next_json(&mut stream_a).await;
    next_json(&mut stream_b).await;

    sink_a.send(Message::Text("garbage".into())).await.unwrap();
    assert_eq!(next_json(&mut stream_a).await["type"], "error");

    gateway.service.record_penalty(TeamId::Blue).await;
    let next = next_json(&mut stream_b).await;
    assert_eq!(next["type"], "penalty-update");
}
