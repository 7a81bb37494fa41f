//! Quadfire client: networking, reconciliation, and the frame loop glue.
//!
//! The split mirrors the runtime threads: [`net`] owns the background
//! receive thread and its hand-off channel, [`game`] owns the session and
//! runs strictly on the main loop thread, [`render`] is the drawing
//! boundary the core never crosses.

pub mod assets;
pub mod camera;
pub mod config;
pub mod game;
pub mod net;
pub mod render;

pub use assets::ClipLibrary;
pub use camera::Camera;
pub use config::ClientConfig;
pub use game::Game;
pub use net::{NetError, NetEvent, NetworkClient};
pub use render::{NullRenderer, Renderer};
