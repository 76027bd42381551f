//! Dedicated server process (spec.md §6): binds the listening socket,
//! runs the fixed-rate tick loop, and reads admin commands from stdin
//! on a dedicated thread (spec.md §5).

use std::io::BufRead;
use std::time::Instant;

use voxelcore::config::{self, ServerConfig, WorldGenConfig};
use voxelcore::server::{Command, GameServer};

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .expect("failed to install logger");

    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from).unwrap_or_else(|| {
        config::default_config_path("server.toml").unwrap_or_else(|| std::path::PathBuf::from("server.toml"))
    });
    let config: ServerConfig = match config::load_or_default(&config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("failed to load {}: {err}", config_path.display());
            std::process::exit(1);
        }
    };

    let worldgen_path = config::default_config_path("worldgen.toml").unwrap_or_else(|| "worldgen.toml".into());
    let worldgen: WorldGenConfig = config::load_or_default(&worldgen_path).unwrap_or_default();

    let mut server = match GameServer::bind(config, worldgen) {
        Ok(server) => server,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let (command_tx, command_rx) = crossbeam_channel::unbounded::<Command>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if command_tx.send(Command::parse(&line)).is_err() {
                break;
            }
        }
    });

    log::info!("server listening, tick interval {:?}", server.tick_interval());

    while server.is_running() {
        let tick_start = Instant::now();

        for command in command_rx.try_iter() {
            server.handle_command(command);
        }
        server.tick();

        let elapsed = tick_start.elapsed();
        let interval = server.tick_interval();
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        } else {
            log::warn!("tick {} overran by {:?}", server.current_tick(), elapsed - interval);
        }
    }

    server.shutdown();
    log::info!("server stopped cleanly");
}
