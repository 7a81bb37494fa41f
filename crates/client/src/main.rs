//! Quadfire client binary.
//!
//! Connects to a game server and runs the fixed-rate frame loop. Without a
//! windowing embedder this runs headless: input stays idle and rendering
//! goes through the null renderer, which is enough to spectate a session
//! or soak-test a server.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use quadfire_client::{Camera, ClientConfig, Game, NetEvent, NetworkClient, NullRenderer};
use quadfire_core::{InputState, NoAssets};

const FRAME: Duration = Duration::from_millis(1000 / 60);

#[derive(Debug, Parser)]
#[command(name = "quadfire", about = "Multiplayer top-down arena shooter client")]
struct Args {
    /// Server host; overrides the config file.
    #[arg(long)]
    host: Option<String>,

    /// Server port; overrides the config file.
    #[arg(long)]
    port: Option<u16>,

    /// Path to the TOML config file.
    #[arg(long, default_value = "quadfire.toml")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = ClientConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let addr = config.server_addr();
    let mut net = NetworkClient::connect(&addr).with_context(|| format!("connecting to {addr}"))?;

    let mut game = Game::new(config.world, Box::new(NoAssets));
    let mut renderer = NullRenderer;
    let mut camera = Camera::default();
    let input = InputState::new();

    let mut last_frame = Instant::now();
    loop {
        let now = Instant::now();
        let dt_ms = now.duration_since(last_frame).as_secs_f32() * 1000.0;
        last_frame = now;

        let mut disconnected = false;
        for event in net.poll() {
            match event {
                NetEvent::Message(message) => game.apply_event(message),
                NetEvent::Disconnected => disconnected = true,
            }
        }
        if disconnected {
            game.handle_disconnect();
            break;
        }

        for command in game.tick(&input, dt_ms, now) {
            if let Err(err) = net.send(&command) {
                log::warn!("send failed: {err}");
            }
        }

        game.render(&mut renderer, &mut camera);

        let elapsed = Instant::now().duration_since(now);
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }

    net.disconnect();
    Ok(())
}
