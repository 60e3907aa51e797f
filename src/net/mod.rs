//! Networked play: framing, connections and both ends of a session

pub mod client;
pub mod connection;
pub mod protocol;
pub mod remote_controller;
pub mod server;

pub use client::ClientSession;
pub use connection::{Connection, ConnectionState, READER_SHUTDOWN_GRACE};
pub use protocol::{ClientMessage, ServerMessage, TurnPrompt, HANDSHAKE_TIMEOUT, MAX_FRAME_LEN};
pub use remote_controller::RemoteController;
pub use server::GameServer;
