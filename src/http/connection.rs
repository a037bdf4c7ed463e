use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::context::ServiceContext;
use crate::http::buffer::{PacketBuffer, RequestBuffer};
use crate::http::writer::ResponseWriter;

/// Most bytes one receive event can deliver.
pub const READ_CHUNK: usize = 4096;

pub enum ConnectionState {
    AwaitingRequest,
    Processing(RequestBuffer),
    Responding(ResponseWriter),
    Closed,
}

/// What one read from the transport produced.
#[derive(Debug)]
pub enum ReceiveEvent {
    Data(PacketBuffer),
    /// Zero-length read: the peer closed its side.
    PeerClosed,
    Error(std::io::Error),
    IdleTimeout,
}

/// Drives one client through accept, receive, dispatch, respond.
///
/// Every receive event is treated as one complete request. After a response
/// the connection goes back to waiting; only the peer closing, a transport
/// error, an oversized request or the idle timeout ends it.
pub struct Connection<S> {
    stream: S,
    ctx: Arc<ServiceContext>,
    read_buf: BytesMut,
    idle_timeout: Option<Duration>,
    state: ConnectionState,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServiceContext>) -> Self {
        Self {
            stream,
            ctx,
            read_buf: BytesMut::with_capacity(READ_CHUNK),
            idle_timeout: None,
            state: ConnectionState::AwaitingRequest,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::AwaitingRequest => {
                    let event = self.receive().await;
                    self.state = self.on_receive(event);
                }

                ConnectionState::Processing(request) => {
                    let response = self.ctx.handle(&request);
                    request.release();

                    self.state = ConnectionState::Responding(ResponseWriter::new(&response));
                }

                ConnectionState::Responding(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    tracing::debug!(bytes = writer.len(), "Response sent");

                    self.state = ConnectionState::AwaitingRequest;
                }

                ConnectionState::Closed => {
                    if let Err(e) = self.stream.shutdown().await {
                        tracing::debug!(error = %e, "Shutdown after close failed");
                    }
                    break;
                }
            }
        }

        Ok(())
    }

    /// Transition out of `AwaitingRequest` for one receive event.
    ///
    /// The packet buffer is released here on every path.
    pub fn on_receive(&self, event: ReceiveEvent) -> ConnectionState {
        match event {
            ReceiveEvent::Data(packet) => {
                let copied = RequestBuffer::copy_from(&packet, self.ctx.max_request_bytes);
                packet.release();

                match copied {
                    Ok(request) => {
                        tracing::trace!(request = %request.as_text(), "Request received");
                        ConnectionState::Processing(request)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Dropping request and closing connection");
                        ConnectionState::Closed
                    }
                }
            }

            ReceiveEvent::PeerClosed => {
                tracing::debug!("Peer closed connection");
                ConnectionState::Closed
            }

            ReceiveEvent::Error(e) => {
                tracing::warn!(error = %e, "Transport error, closing connection");
                ConnectionState::Closed
            }

            ReceiveEvent::IdleTimeout => {
                tracing::info!("Idle timeout, closing connection");
                ConnectionState::Closed
            }
        }
    }

    async fn receive(&mut self) -> ReceiveEvent {
        self.read_buf.clear();
        self.read_buf.resize(READ_CHUNK, 0);
        let read = self.stream.read(&mut self.read_buf[..]);

        let result = match self.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, read).await {
                Ok(result) => result,
                Err(_) => return ReceiveEvent::IdleTimeout,
            },
            None => read.await,
        };

        match result {
            Ok(0) => ReceiveEvent::PeerClosed,
            Ok(n) => {
                self.read_buf.truncate(n);
                let payload = self.read_buf.split().freeze();
                ReceiveEvent::Data(PacketBuffer::new(payload, &self.ctx.buffers))
            }
            Err(e) => ReceiveEvent::Error(e),
        }
    }
}
