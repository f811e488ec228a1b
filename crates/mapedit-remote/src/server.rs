//! TCP remote control server

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::protocol::{RemoteCommand, RemoteResponse};

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("failed to bind remote server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// Trait that the application implements to handle remote commands
pub trait RemoteHandler: Send + 'static {
    fn handle_remote(&mut self, cmd: RemoteCommand) -> impl Future<Output = RemoteResponse> + Send;
}

/// Remote server handle - dropping it stops accepting connections
pub struct RemoteServer {
    handle: tokio::task::JoinHandle<()>,
    local_addr: SocketAddr,
}

impl RemoteServer {
    /// Bind on localhost and serve in the background.
    /// Port 0 picks a free port; see [`RemoteServer::local_addr`].
    pub async fn bind<H: RemoteHandler>(handler: Arc<Mutex<H>>, port: u16) -> Result<Self, RemoteError> {
        let addr = format!("127.0.0.1:{}", port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| RemoteError::Bind { addr: addr.clone(), source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| RemoteError::Bind { addr, source })?;
        log::info!("Remote server listening on {}", local_addr);

        let handle = tokio::spawn(accept_loop(listener, handler));
        Ok(Self { handle, local_addr })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for RemoteServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn accept_loop<H: RemoteHandler>(listener: TcpListener, handler: Arc<Mutex<H>>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                log::info!("Remote client connected from {}", peer);
                let handler = handler.clone();
                tokio::spawn(async move {
                    handle_connection(stream, handler).await;
                    log::info!("Remote client disconnected: {}", peer);
                });
            }
            Err(e) => {
                log::error!("Remote server accept error: {}", e);
            }
        }
    }
}

async fn handle_connection<H: RemoteHandler>(stream: TcpStream, handler: Arc<Mutex<H>>) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break, // Connection closed
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let response = match serde_json::from_str::<RemoteCommand>(trimmed) {
                    Ok(cmd) => {
                        log::debug!("Remote command: {:?}", cmd);
                        let mut h = handler.lock().await;
                        h.handle_remote(cmd).await
                    }
                    Err(e) => RemoteResponse::error(format!("Invalid command JSON: {}", e)),
                };

                let mut resp_json = serde_json::to_string(&response).unwrap_or_else(|e| {
                    format!("{{\"status\":\"error\",\"message\":\"Serialize error: {}\"}}", e)
                });
                resp_json.push('\n');

                if let Err(e) = writer.write_all(resp_json.as_bytes()).await {
                    log::error!("Remote server write error: {}", e);
                    break;
                }
                if let Err(e) = writer.flush().await {
                    log::error!("Remote server flush error: {}", e);
                    break;
                }
            }
            Err(e) => {
                log::error!("Remote server read error: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ResponseData;

    #[derive(Default)]
    struct Counter {
        undos: u32,
    }

    impl RemoteHandler for Counter {
        async fn handle_remote(&mut self, cmd: RemoteCommand) -> RemoteResponse {
            match cmd {
                RemoteCommand::Ping => RemoteResponse::pong(),
                RemoteCommand::Undo => {
                    self.undos += 1;
                    RemoteResponse::updated(format!("undos: {}", self.undos))
                }
                _ => RemoteResponse::error("unsupported"),
            }
        }
    }

    async fn round_trip(
        reader: &mut BufReader<tokio::net::tcp::OwnedReadHalf>,
        writer: &mut tokio::net::tcp::OwnedWriteHalf,
        request: &str,
    ) -> RemoteResponse {
        writer.write_all(request.as_bytes()).await.unwrap();
        writer.write_all(b"\n").await.unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        serde_json::from_str(&line).unwrap()
    }

    #[tokio::test]
    async fn test_serves_commands_over_tcp() {
        let handler = Arc::new(Mutex::new(Counter::default()));
        let server = RemoteServer::bind(handler.clone(), 0).await.unwrap();

        let stream = TcpStream::connect(server.local_addr()).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        let resp = round_trip(&mut reader, &mut writer, r#"{"cmd":"Ping"}"#).await;
        assert_eq!(resp, RemoteResponse::pong());

        round_trip(&mut reader, &mut writer, r#"{"cmd":"Undo"}"#).await;
        let resp = round_trip(&mut reader, &mut writer, r#"{"cmd":"Undo"}"#).await;
        assert_eq!(
            resp,
            RemoteResponse::ok(ResponseData::Updated {
                description: "undos: 2".into()
            })
        );
        assert_eq!(handler.lock().await.undos, 2);
    }

    #[tokio::test]
    async fn test_invalid_json_reports_error() {
        let handler = Arc::new(Mutex::new(Counter::default()));
        let server = RemoteServer::bind(handler, 0).await.unwrap();

        let stream = TcpStream::connect(server.local_addr()).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        let resp = round_trip(&mut reader, &mut writer, "{not json").await;
        let RemoteResponse::Error { message } = resp else {
            panic!("expected error");
        };
        assert!(message.starts_with("Invalid command JSON"));
    }

    #[tokio::test]
    async fn test_bind_conflict_is_an_error() {
        let handler = Arc::new(Mutex::new(Counter::default()));
        let first = RemoteServer::bind(handler.clone(), 0).await.unwrap();
        let err = RemoteServer::bind(handler, first.local_addr().port()).await;
        assert!(matches!(err, Err(RemoteError::Bind { .. })));
    }
}
