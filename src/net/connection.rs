//! Framed TCP connection shared by both ends of a session
//!
//! A background reader task owns the read half of the socket and pushes
//! every decoded envelope into an unbounded queue. The owning thread is the
//! only consumer of that queue and the only writer to the socket. All
//! blocking happens through `Handle::block_on`, so the owner must not be
//! running inside the runtime itself.

use crate::net::protocol::{read_frame, write_frame};
use crate::{ParadeError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Upper bound on waiting for the reader task during `close`
pub const READER_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Slice used when waiting for a message with no deadline
const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Lifecycle of a connection; only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionState {
    /// Socket open, nothing exchanged yet
    Init,
    /// Handshake envelope sent or awaited
    Handshaking,
    /// Handshake succeeded
    Connected,
    /// Torn down; terminal
    Closed,
}

/// What the reader task hands to the consumer
#[derive(Debug)]
enum Inbound<T> {
    Message(T),
    Failed(String),
    Closed,
}

/// One side of a framed connection: receives `In`, sends `Out`
pub struct Connection<In, Out> {
    runtime: Handle,
    peer: SocketAddr,
    state: ConnectionState,
    writer: Option<OwnedWriteHalf>,
    inbound: mpsc::UnboundedReceiver<Inbound<In>>,
    shutdown: Option<oneshot::Sender<()>>,
    reader: Option<JoinHandle<()>>,
    _outbound: PhantomData<fn(Out)>,
}

impl<In, Out> Connection<In, Out>
where
    In: DeserializeOwned + Send + 'static,
    Out: Serialize,
{
    /// Take ownership of an established stream and start its reader task
    ///
    /// The stream must belong to the reactor behind `runtime`.
    pub fn new(runtime: Handle, stream: TcpStream) -> Result<Self> {
        let peer = stream.peer_addr()?;
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();

        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let reader = runtime.spawn(read_loop(read_half, inbound_tx, shutdown_rx));

        Ok(Connection {
            runtime,
            peer,
            state: ConnectionState::Init,
            writer: Some(write_half),
            inbound: inbound_rx,
            shutdown: Some(shutdown_tx),
            reader: Some(reader),
            _outbound: PhantomData,
        })
    }

    /// Dial `addr`, giving up after `limit`
    pub fn open(runtime: Handle, addr: &str, limit: Duration) -> Result<Self> {
        let dialed = runtime.block_on(async { tokio::time::timeout(limit, TcpStream::connect(addr)).await });
        let stream = match dialed {
            Ok(Ok(stream)) => stream,
            Ok(Err(err)) => {
                return Err(ParadeError::NetworkFailure(format!(
                    "could not connect to {}: {}",
                    addr, err
                )))
            }
            Err(_) => {
                return Err(ParadeError::NetworkFailure(format!(
                    "timed out after {:?} connecting to {}",
                    limit, addr
                )))
            }
        };
        Self::new(runtime, stream)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub(crate) fn begin_handshake(&mut self) {
        if self.state == ConnectionState::Init {
            self.state = ConnectionState::Handshaking;
        }
    }

    pub(crate) fn mark_connected(&mut self) {
        if self.state == ConnectionState::Handshaking {
            self.state = ConnectionState::Connected;
        }
    }

    /// Write one envelope; a failed write closes the connection
    pub fn send(&mut self, message: &Out) -> Result<()> {
        if self.is_closed() {
            return Err(self.closed_error());
        }
        let peer = self.peer;
        let runtime = self.runtime.clone();
        let written = match self.writer.as_mut() {
            Some(writer) => runtime.block_on(write_frame(writer, message)),
            None => return Err(self.closed_error()),
        };

        match written {
            Ok(()) => Ok(()),
            Err(err) => Err(self.abort(format!("write to {} failed: {}", peer, err))),
        }
    }

    /// Wait up to `wait` for the next envelope
    ///
    /// `Ok(None)` means the wait elapsed. A read failure or the peer going
    /// away closes the connection and returns `NetworkFailure`.
    pub fn poll(&mut self, wait: Duration) -> Result<Option<In>> {
        if self.is_closed() {
            return Err(self.closed_error());
        }

        let peer = self.peer;
        let runtime = self.runtime.clone();
        let inbound = &mut self.inbound;
        let next = runtime.block_on(async { tokio::time::timeout(wait, inbound.recv()).await });

        match next {
            Err(_elapsed) => Ok(None),
            Ok(Some(Inbound::Message(message))) => Ok(Some(message)),
            Ok(Some(Inbound::Failed(reason))) => {
                Err(self.abort(format!("read from {} failed: {}", peer, reason)))
            }
            Ok(Some(Inbound::Closed)) | Ok(None) => {
                Err(self.abort(format!("{} closed the connection", peer)))
            }
        }
    }

    /// Wait for the next envelope, failing and closing once `limit` elapses
    ///
    /// With no limit the wait only ends on a message or a connection failure.
    pub fn recv(&mut self, limit: Option<Duration>) -> Result<In> {
        match limit {
            Some(limit) => match self.poll(limit)? {
                Some(message) => Ok(message),
                None => {
                    let reason = format!("timed out after {:?} waiting for {}", limit, self.peer);
                    Err(self.abort(reason))
                }
            },
            None => loop {
                if let Some(message) = self.poll(IDLE_POLL_INTERVAL)? {
                    return Ok(message);
                }
            },
        }
    }

    /// Close the connection and hand back a `NetworkFailure` for `reason`
    pub fn abort(&mut self, reason: impl Into<String>) -> ParadeError {
        // The failure being reported matters more than any teardown error
        let _ = self.close();
        ParadeError::NetworkFailure(reason.into())
    }

    /// Tear the connection down; safe to call any number of times
    ///
    /// Signals the reader task, shuts the write half down and waits up to
    /// `READER_SHUTDOWN_GRACE` for the reader to finish before aborting it.
    pub fn close(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        self.state = ConnectionState::Closed;

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let writer = self.writer.take();
        let reader = self.reader.take();

        self.runtime.block_on(async move {
            if let Some(mut writer) = writer {
                let _ = writer.shutdown().await;
            }
            match reader {
                Some(mut reader) => {
                    match tokio::time::timeout(READER_SHUTDOWN_GRACE, &mut reader).await {
                        Ok(joined) => joined.map_err(ParadeError::from),
                        Err(_) => {
                            reader.abort();
                            Ok(())
                        }
                    }
                }
                None => Ok(()),
            }
        })
    }

    fn closed_error(&self) -> ParadeError {
        ParadeError::NetworkFailure(format!("connection to {} is closed", self.peer))
    }
}

impl<In, Out> Drop for Connection<In, Out> {
    fn drop(&mut self) {
        // No blocking here: signal and abort, the runtime reaps the task
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.state = ConnectionState::Closed;
    }
}

async fn read_loop<In>(
    mut read_half: OwnedReadHalf,
    inbound: mpsc::UnboundedSender<Inbound<In>>,
    mut shutdown: oneshot::Receiver<()>,
) where
    In: DeserializeOwned,
{
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            frame = read_frame::<_, In>(&mut read_half) => {
                let (item, last) = match frame {
                    Ok(Some(message)) => (Inbound::Message(message), false),
                    Ok(None) => (Inbound::Closed, true),
                    Err(err) => (Inbound::Failed(err.to_string()), true),
                };
                if inbound.send(item).is_err() || last {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::protocol::{ClientMessage, ServerMessage};
    use std::net::TcpListener as StdListener;
    use tokio::net::TcpListener;
    use tokio::runtime::Runtime;

    type ClientSide = Connection<ServerMessage, ClientMessage>;
    type ServerSide = Connection<ClientMessage, ServerMessage>;

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap()
    }

    fn pair(runtime: &Runtime) -> (ClientSide, ServerSide) {
        let listener = runtime.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let client = ClientSide::open(runtime.handle().clone(), &addr, Duration::from_secs(5)).unwrap();
        let (stream, _) = runtime.block_on(listener.accept()).unwrap();
        let server = ServerSide::new(runtime.handle().clone(), stream).unwrap();
        (client, server)
    }

    #[test]
    fn test_messages_flow_both_ways() {
        let runtime = runtime();
        let (mut client, mut server) = pair(&runtime);

        client.send(&ClientMessage::PlayCard { index: 1 }).unwrap();
        client.send(&ClientMessage::Leave).unwrap();
        assert_eq!(
            server.recv(Some(Duration::from_secs(5))).unwrap(),
            ClientMessage::PlayCard { index: 1 }
        );
        assert_eq!(server.recv(None).unwrap(), ClientMessage::Leave);

        server
            .send(&ServerMessage::InvalidChoice { reason: "no".into() })
            .unwrap();
        assert_eq!(
            client.recv(Some(Duration::from_secs(5))).unwrap(),
            ServerMessage::InvalidChoice { reason: "no".into() }
        );
    }

    #[test]
    fn test_poll_times_out_without_closing() {
        let runtime = runtime();
        let (mut client, _server) = pair(&runtime);

        assert!(client.poll(Duration::from_millis(20)).unwrap().is_none());
        assert_eq!(client.state(), ConnectionState::Init);
    }

    #[test]
    fn test_recv_timeout_closes() {
        let runtime = runtime();
        let (mut client, _server) = pair(&runtime);

        let err = client.recv(Some(Duration::from_millis(20))).unwrap_err();
        assert!(matches!(err, ParadeError::NetworkFailure(_)));
        assert!(client.is_closed());
    }

    #[test]
    fn test_peer_close_is_reported() {
        let runtime = runtime();
        let (mut client, mut server) = pair(&runtime);

        server.close().unwrap();
        let err = client.recv(Some(Duration::from_secs(5))).unwrap_err();
        assert!(matches!(err, ParadeError::NetworkFailure(_)));
        assert!(client.is_closed());
        assert!(client.send(&ClientMessage::Leave).is_err());
    }

    #[test]
    fn test_close_is_idempotent() {
        let runtime = runtime();
        let (mut client, _server) = pair(&runtime);

        client.close().unwrap();
        client.close().unwrap();
        assert_eq!(client.state(), ConnectionState::Closed);
        assert!(matches!(
            client.poll(Duration::from_millis(1)),
            Err(ParadeError::NetworkFailure(_))
        ));
    }

    #[test]
    fn test_state_only_moves_forward() {
        let runtime = runtime();
        let (mut client, _server) = pair(&runtime);

        client.mark_connected();
        assert_eq!(client.state(), ConnectionState::Init);
        client.begin_handshake();
        client.mark_connected();
        assert_eq!(client.state(), ConnectionState::Connected);
        client.begin_handshake();
        assert_eq!(client.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_open_refused() {
        let runtime = runtime();
        // Grab a free port and release it so nothing is listening there
        let addr = {
            let spare = StdListener::bind("127.0.0.1:0").unwrap();
            spare.local_addr().unwrap().to_string()
        };

        let result = ClientSide::open(runtime.handle().clone(), &addr, Duration::from_secs(2));
        assert!(matches!(result, Err(ParadeError::NetworkFailure(_))));
    }
}
