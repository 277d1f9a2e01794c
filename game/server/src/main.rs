mod acceptor;
mod connection;
mod round;
mod shared;

use shared::SharedState;
use slog::info;
use std::process::ExitCode;
use std::sync::Arc;
use wireframe::channel::bind;

fn main() -> ExitCode {
    let args = util::cli::parse_server_args();
    let log = fuse::logging::root_logger(false);

    let listener = match bind(("0.0.0.0", args.port)) {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("failed to bind port {}: {}", args.port, err);
            return ExitCode::FAILURE;
        }
    };

    info!(log, "listening"; "port" => args.port, "players_count" => args.config.players_count);

    let shared = Arc::new(SharedState::new(args.config.players_count));

    let acceptor_shared = Arc::clone(&shared);
    let acceptor_config = args.config.clone();
    let acceptor_log = log.new(slog::o!("task" => "acceptor"));
    std::thread::spawn(move || acceptor::run(listener, acceptor_shared, acceptor_config, acceptor_log));

    round::run(args.config, &shared, &log);

    ExitCode::SUCCESS
}
