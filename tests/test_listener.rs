mod common;

use common::{context, get, read_response};
use homecontrol::config::ServerConfig;
use homecontrol::control::Dispatcher;
use homecontrol::server::listener;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

async fn start(max_connections: usize) -> SocketAddr {
    start_with_idle_timeout(max_connections, ServerConfig::default().idle_timeout_ms).await
}

async fn start_with_idle_timeout(max_connections: usize, idle_timeout_ms: u64) -> SocketAddr {
    let cfg = ServerConfig {
        listen_addr: "127.0.0.1:0".to_string(),
        max_connections,
        idle_timeout_ms,
        ..ServerConfig::default()
    };
    let tcp = listener::bind(&cfg).await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let ctx = Arc::new(context(Dispatcher::new()));

    tokio::spawn(async move { listener::serve(tcp, &cfg, ctx).await });
    addr
}

#[tokio::test]
async fn test_end_to_end_lights_on() {
    let addr = start(8).await;
    let mut stream = TcpStream::connect(addr).await.unwrap();

    stream
        .write_all(b"GET /ligar_luzes HTTP/1.1\r\nHost: x\r\n\r\n")
        .await
        .unwrap();
    let response = read_response(&mut stream).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("Temperatura Interna:"));

    // The server keeps the connection open for another request.
    stream.write_all(get("/").as_bytes()).await.unwrap();
    let response = read_response(&mut stream).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK"));
}

#[tokio::test]
async fn test_clients_served_independently() {
    let addr = start(8).await;
    let mut a = TcpStream::connect(addr).await.unwrap();
    let mut b = TcpStream::connect(addr).await.unwrap();

    a.write_all(get("/ligar_arcondicionado").as_bytes()).await.unwrap();
    b.write_all(get("/desligar_bomba_agua").as_bytes()).await.unwrap();

    assert!(read_response(&mut a).await.unwrap().starts_with("HTTP/1.1 200 OK"));
    assert!(read_response(&mut b).await.unwrap().starts_with("HTTP/1.1 200 OK"));
}

#[tokio::test]
async fn test_connection_cap_defers_extra_clients() {
    let addr = start(1).await;

    let mut first = TcpStream::connect(addr).await.unwrap();
    first.write_all(get("/").as_bytes()).await.unwrap();
    assert!(read_response(&mut first).await.is_some());

    let mut second = TcpStream::connect(addr).await.unwrap();
    second.write_all(get("/").as_bytes()).await.unwrap();
    let waiting = tokio::time::timeout(Duration::from_millis(200), read_response(&mut second)).await;
    assert!(waiting.is_err(), "second client served while cap was full");

    drop(first);
    let served = tokio::time::timeout(Duration::from_secs(5), read_response(&mut second))
        .await
        .expect("second client never served");
    assert!(served.unwrap().starts_with("HTTP/1.1 200 OK"));
}

#[tokio::test]
async fn test_held_connections_do_not_lock_out_new_clients() {
    let cap = ServerConfig::default().max_connections;
    let addr = start_with_idle_timeout(cap, 200).await;

    let mut held = Vec::new();
    for _ in 0..cap {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(get("/").as_bytes()).await.unwrap();
        assert!(read_response(&mut stream).await.is_some());
        held.push(stream);
    }

    let mut late = TcpStream::connect(addr).await.unwrap();
    late.write_all(get("/").as_bytes()).await.unwrap();
    let served = tokio::time::timeout(Duration::from_secs(3), read_response(&mut late))
        .await
        .expect("client past the cap never served");
    assert!(served.unwrap().starts_with("HTTP/1.1 200 OK"));

    // Idle connections were closed by the server.
    for mut stream in held {
        let closed = tokio::time::timeout(Duration::from_secs(3), read_response(&mut stream)).await;
        assert_eq!(closed.unwrap(), None);
    }
}

#[tokio::test]
async fn test_bind_failure_is_reported() {
    let cfg = ServerConfig {
        listen_addr: "not-an-address".to_string(),
        ..ServerConfig::default()
    };
    assert!(listener::bind(&cfg).await.is_err());
}
