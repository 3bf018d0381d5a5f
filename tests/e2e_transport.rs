//! End-to-end transport tests.
//!
//! These tests run the handshake over real loopback TCP connections rather
//! than in-memory pipes.

use std::time::Duration;

use stomp::codec::{Command, Frame, FrameReader, FrameWriter};
use stomp::protocol::{connect, HeartBeat};
use stomp::ClientConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// Accept one connection, answer its CONNECT with `response`, then send a
/// RECEIPT. Resolves to the CONNECT frame.
async fn one_shot_broker(response: Frame) -> (u16, tokio::task::JoinHandle<Frame>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, write) = stream.into_split();
        let mut reader = FrameReader::new(read);
        let mut writer = FrameWriter::new(write);

        let request = reader.read_frame().await.unwrap();
        writer.write_frame(&response).await.unwrap();
        writer
            .write_frame(&Frame::new(Command::Receipt).with_header("receipt-id", "r-1"))
            .await
            .unwrap();
        request
    });

    (port, handle)
}

#[tokio::test]
async fn test_tcp_handshake_derives_host_from_peer() {
    let response = Frame::new(Command::Connected)
        .with_header("version", "1.2")
        .with_header("session", "tcp-1")
        .with_header("heart-beat", "0,30000");
    let (port, broker) = one_shot_broker(response).await;

    let stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let mut session = timeout(Duration::from_secs(5), connect(stream, Vec::new()))
        .await
        .expect("handshake timed out")
        .expect("handshake failed");

    let request = broker.await.unwrap();
    assert_eq!(request.header("host"), Some("127.0.0.1"));

    assert_eq!(session.id(), "tcp-1");
    assert_eq!(session.heart_beat(), HeartBeat::new(0, 30000));

    let receipt = timeout(Duration::from_secs(5), session.processor().recv())
        .await
        .expect("no frame forwarded")
        .unwrap();
    assert_eq!(receipt.header("receipt-id"), Some("r-1"));
}

#[tokio::test]
async fn test_tcp_handshake_with_config_options() {
    let (port, broker) = one_shot_broker(Frame::new(Command::Connected)).await;

    let config = ClientConfig::from_toml(&format!(
        r#"
            broker = "127.0.0.1:{port}"
            login = "guest"
            passcode = "guest"
            host = "/"

            [heart_beat]
            outgoing_ms = 2000
            incoming_ms = 4000
        "#
    ))
    .unwrap();

    let stream = TcpStream::connect(config.broker_addr()).await.unwrap();
    let session = connect(stream, config.header_options()).await.unwrap();
    let request = broker.await.unwrap();

    assert_eq!(request.header("host"), Some("/"));
    assert_eq!(request.header("login"), Some("guest"));
    assert_eq!(request.header("heart-beat"), Some("2000,4000"));
    assert_eq!(session.heart_beat(), HeartBeat::new(0, 0));

    let (_, _writer, processor) = session.into_parts();
    processor.stop().await;
}
