//! Network protocol for quadfire.
//!
//! Defines the messages exchanged with the game server and the line
//! framing used to carry them over TCP. The server is the authority; this
//! crate only describes the wire contract.

pub mod codec;
pub mod messages;

pub use codec::LineReader;
pub use messages::{ClientCommand, ParseError, PlayerInfo, ServerEvent};
