//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use forward_proxy::config::ProxyConfig;
use forward_proxy::http::{HttpServer, ServerError};
use forward_proxy::lifecycle::Shutdown;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A running proxy bound to an ephemeral port.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), ServerError>>,
}

impl TestProxy {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client that sends every `http://` request through this proxy.
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .proxy(reqwest::Proxy::http(self.url()).unwrap())
            .build()
            .unwrap()
    }
}

/// Start the proxy with `config`, ignoring its bind address.
pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestProxy {
        addr,
        shutdown,
        handle,
    }
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Read one request (head and `content-length` body) from `socket`.
async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            return buf;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    buf
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Start an origin that answers 200 with the raw request it received as body.
pub async fn start_echo_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    request.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&request).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start an origin that answers every request with the given raw bytes.
pub async fn start_raw_origin(response: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let _ = socket.write_all(response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Byte at offset `i` of a streamed body.
pub fn pattern_byte(i: usize) -> u8 {
    (i % 251) as u8
}

/// Start an origin that streams `total` pattern bytes in 64 KiB writes.
pub async fn start_streaming_origin(total: usize) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {total}\r\nConnection: close\r\n\r\n"
                );
                if socket.write_all(head.as_bytes()).await.is_err() {
                    return;
                }

                let mut sent = 0;
                while sent < total {
                    let len = (total - sent).min(64 * 1024);
                    let chunk: Vec<u8> = (sent..sent + len).map(pattern_byte).collect();
                    if socket.write_all(&chunk).await.is_err() {
                        return;
                    }
                    sent += len;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start an origin that sends a response head and a few body bytes, then
/// holds the connection open without finishing the body.
pub async fn start_stalled_origin() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000000\r\n\r\npartial")
                    .await;
                std::future::pending::<()>().await;
                drop(socket);
            });
        }
    });

    addr
}

/// Send raw bytes to `addr` and return everything read until EOF.
pub async fn raw_exchange_bytes(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket.write_all(request).await.unwrap();
    let mut response = Vec::new();
    socket.read_to_end(&mut response).await.unwrap();
    response
}

/// Like [`raw_exchange_bytes`], for text requests and responses.
pub async fn raw_exchange(addr: SocketAddr, request: &str) -> String {
    let response = raw_exchange_bytes(addr, request.as_bytes()).await;
    String::from_utf8_lossy(&response).into_owned()
}
