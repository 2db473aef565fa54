//! WebSocket echo channel over a real connection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message as AxumMessage, WebSocket};
use axum::Router;
use futures_util::{SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use api_ping::config::{AppConfig, PingConfig};
use api_ping::http::{echo, Ping};
use api_ping::PingError;

mod common;

fn ws_enabled() -> PingConfig {
    PingConfig {
        websocket_enabled: true,
        ..PingConfig::default()
    }
}

async fn next_message<S>(stream: &mut S) -> Message
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for message")
        .expect("stream ended")
        .expect("transport error")
}

#[tokio::test]
async fn test_echoes_text_and_binary() {
    let server = common::spawn_server(ws_enabled()).await;
    let (mut stream, response) = connect_async(server.ws_url("Action=Ping")).await.unwrap();
    assert_eq!(response.status(), 101);

    stream.send(Message::text("hello")).await.unwrap();
    assert_eq!(next_message(&mut stream).await, Message::text("hello"));

    let payload = vec![0u8, 1, 2, 254, 255];
    stream.send(Message::binary(payload.clone())).await.unwrap();
    assert_eq!(next_message(&mut stream).await, Message::binary(payload));

    stream.close(None).await.unwrap();
}

#[tokio::test]
async fn test_echoes_many_messages_in_order() {
    let server = common::spawn_server(ws_enabled()).await;
    let (mut stream, _) = connect_async(server.ws_url("Action=Ping")).await.unwrap();

    for i in 0..50 {
        stream.send(Message::text(format!("msg-{i}"))).await.unwrap();
    }
    for i in 0..50 {
        assert_eq!(next_message(&mut stream).await, Message::text(format!("msg-{i}")));
    }
}

#[tokio::test]
async fn test_ping_frames_are_answered_not_echoed() {
    let server = common::spawn_server(ws_enabled()).await;
    let (mut stream, _) = connect_async(server.ws_url("Action=Ping")).await.unwrap();

    stream.send(Message::Ping(b"probe".to_vec().into())).await.unwrap();
    stream.send(Message::text("after")).await.unwrap();

    assert_eq!(
        next_message(&mut stream).await,
        Message::Pong(b"probe".to_vec().into())
    );
    assert_eq!(next_message(&mut stream).await, Message::text("after"));
}

#[tokio::test]
async fn test_close_ends_session() {
    let server = common::spawn_server(ws_enabled()).await;
    let (mut stream, _) = connect_async(server.ws_url("Action=Ping")).await.unwrap();

    stream.send(Message::Close(None)).await.unwrap();

    let rest = tokio::time::timeout(Duration::from_secs(5), async {
        let mut texts = 0;
        while let Some(Ok(message)) = stream.next().await {
            if message.is_text() || message.is_binary() {
                texts += 1;
            }
        }
        texts
    })
    .await
    .expect("server should finish the closing handshake");
    assert_eq!(rest, 0);
}

#[tokio::test]
async fn test_upgrade_refused_when_websocket_disabled() {
    let server = common::spawn_server(PingConfig::default()).await;

    let result = connect_async(server.ws_url("Action=Ping")).await;

    assert!(result.is_err(), "handshake must not succeed");
}

#[tokio::test]
async fn test_upgrade_for_other_action_goes_to_application() {
    let server = common::spawn_server(ws_enabled()).await;

    let result = connect_async(server.ws_url("Action=Chat")).await;

    assert!(result.is_err(), "application does not speak WebSocket");
}

#[tokio::test]
async fn test_custom_handler_replaces_echo() {
    let ping = Ping::new(ws_enabled()).with_ws_handler(|mut socket: WebSocket| async move {
        socket.send(AxumMessage::Text("ready".into())).await?;
        while let Some(message) = socket.recv().await {
            if let AxumMessage::Text(text) = message? {
                let reply = text.as_str().to_uppercase();
                socket.send(AxumMessage::Text(reply.into())).await?;
            }
        }
        Ok::<(), PingError>(())
    });
    let server = common::spawn_with_ping(ping).await;
    let (mut stream, _) = connect_async(server.ws_url("Action=Ping")).await.unwrap();

    assert_eq!(next_message(&mut stream).await, Message::text("ready"));
    stream.send(Message::text("shout")).await.unwrap();
    assert_eq!(next_message(&mut stream).await, Message::text("SHOUT"));
}

/// Next data frame, or `None` once the stream ends, errors or closes.
async fn next_data_frame<S>(stream: &mut S) -> Option<Message>
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match stream.next().await {
                Some(Ok(message)) if message.is_text() || message.is_binary() => {
                    return Some(message)
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return None,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await
    .expect("session should end or answer")
}

#[tokio::test]
async fn test_oversized_message_ends_session_with_transport_error() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let config = PingConfig {
        max_message_size: 16,
        ..ws_enabled()
    };
    let ping = Ping::new(config).with_ws_handler(move |socket: WebSocket| {
        let tx = tx.clone();
        async move {
            let result = echo(socket).await;
            let _ = tx.send(matches!(result, Err(PingError::Transport(_))));
            result
        }
    });
    let server = common::spawn_with_ping(ping).await;
    let (mut stream, _) = connect_async(server.ws_url("Action=Ping")).await.unwrap();

    stream.send(Message::binary(vec![7u8; 64])).await.unwrap();

    assert_eq!(next_data_frame(&mut stream).await, None, "oversized frame must not be echoed");
    let transport_error = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("echo should return")
        .expect("handler should report");
    assert!(transport_error, "echo should end with a transport error");
}

#[tokio::test]
async fn test_message_within_limit_is_echoed() {
    let config = PingConfig {
        max_message_size: 16,
        ..ws_enabled()
    };
    let server = common::spawn_server(config).await;
    let (mut stream, _) = connect_async(server.ws_url("Action=Ping")).await.unwrap();

    stream.send(Message::binary(vec![7u8; 16])).await.unwrap();

    assert_eq!(next_data_frame(&mut stream).await, Some(Message::binary(vec![7u8; 16])));
}

#[tokio::test]
async fn test_handler_error_is_dropped_and_app_untouched() {
    let app_hits = Arc::new(AtomicUsize::new(0));
    let hits = app_hits.clone();
    let app = Router::new().fallback(move || {
        let hits = hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            common::APP_STATUS
        }
    });
    let ping = Ping::new(ws_enabled()).with_ws_handler(|_socket: WebSocket| async {
        Err::<(), _>(PingError::Handler("refused".into()))
    });
    let server = common::spawn_app(AppConfig::default(), ping, app).await;

    let (mut stream, response) = connect_async(server.ws_url("Action=Ping")).await.unwrap();
    assert_eq!(response.status(), 101);
    assert_eq!(next_data_frame(&mut stream).await, None);

    // The server keeps answering after the failed session.
    let res = common::client()
        .get(server.http_url("Action=Ping"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(app_hits.load(Ordering::SeqCst), 0, "application must not see ping traffic");
}

#[tokio::test]
async fn test_request_timeout_does_not_bound_echo_session() {
    let mut config = AppConfig::default();
    config.timeouts.request_secs = 1;
    let server = common::spawn_app(config, Ping::new(ws_enabled()), common::test_app()).await;
    let (mut stream, _) = connect_async(server.ws_url("Action=Ping")).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    stream.send(Message::text("still here")).await.unwrap();

    assert_eq!(next_message(&mut stream).await, Message::text("still here"));
}
