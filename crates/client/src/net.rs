//! TCP connection to the game server.
//!
//! One background thread blocks on the socket, frames lines, parses them
//! and pushes events onto a channel. It never touches game state; the main
//! loop drains the channel once per tick, so `GameState` has exactly one
//! writer. Disconnects arrive through the same channel.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use quadfire_protocol::{ClientCommand, LineReader, ServerEvent};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),
    #[error("send failed: {0}")]
    Send(#[source] std::io::Error),
    #[error("not connected")]
    NotConnected,
}

/// What the receive thread hands to the main loop.
#[derive(Debug)]
pub enum NetEvent {
    Message(ServerEvent),
    Disconnected,
}

/// Client side of the server connection.
pub struct NetworkClient {
    stream: TcpStream,
    events: Receiver<NetEvent>,
    connected: bool,
}

impl NetworkClient {
    /// Connects and spawns the receive thread.
    pub fn connect(addr: &str) -> Result<Self, NetError> {
        let stream = TcpStream::connect(addr).map_err(NetError::Connect)?;
        let reader = stream.try_clone().map_err(NetError::Connect)?;
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("net-recv".to_owned())
            .spawn(move || receive_loop(reader, tx))
            .map_err(NetError::Connect)?;

        log::info!("connected to {addr}");
        Ok(Self {
            stream,
            events: rx,
            connected: true,
        })
    }

    /// Drains everything the receive thread queued since the last tick.
    pub fn poll(&mut self) -> Vec<NetEvent> {
        self.events.try_iter().collect()
    }

    pub fn send(&mut self, command: &ClientCommand) -> Result<(), NetError> {
        if !self.connected {
            return Err(NetError::NotConnected);
        }
        // Serialize into one buffer and write it with a single syscall: the
        // `Display` impl would otherwise emit each field as its own tiny
        // unbuffered write, which Nagle can split across TCP segments so a
        // peer's single `read` sees only a fragment of the line.
        let line = format!("{command}\n");
        self.stream.write_all(line.as_bytes()).map_err(|err| {
            self.connected = false;
            NetError::Send(err)
        })
    }

    /// Graceful teardown; the receive thread exits once the socket closes.
    pub fn disconnect(&mut self) {
        if self.connected {
            let _ = self.send(&ClientCommand::Disconnect);
        }
        let _ = self.stream.shutdown(Shutdown::Both);
        self.connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

fn receive_loop(mut stream: TcpStream, events: Sender<NetEvent>) {
    let mut framing = LineReader::new();
    let mut buf = [0u8; 1024];

    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                for line in framing.extend(&buf[..n]) {
                    match ServerEvent::parse(&line) {
                        Ok(event) => {
                            // Main loop gone: nothing left to deliver to.
                            if events.send(NetEvent::Message(event)).is_err() {
                                return;
                            }
                        }
                        Err(err) => log::warn!("discarding malformed message `{line}`: {err}"),
                    }
                }
            }
            Err(err) => {
                log::warn!("network receive failed: {err}");
                break;
            }
        }
    }

    log::info!("connection closed");
    let _ = events.send(NetEvent::Disconnected);
}

/// Minimum-interval gate for outbound position updates.
#[derive(Debug)]
pub struct SendInterval {
    interval: Duration,
    last: Option<Instant>,
}

impl SendInterval {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when enough time has passed; consumes the slot when it is.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
