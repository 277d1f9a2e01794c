mod downlink;
mod state;
mod uplink;
mod view;

use slog::{error, info};
use state::ClientState;
use std::process::ExitCode;
use std::sync::Arc;
use wireframe::channel::ReliableChannel;
use wireframe::datagram::channel_pair;

fn main() -> ExitCode {
    let args = util::cli::parse_client_args();
    let log = fuse::logging::root_logger(false);

    let downlink_channel = match ReliableChannel::dial(args.server_address.as_str()) {
        Ok(channel) => channel,
        Err(err) => {
            error!(log, "failed to dial server"; "address" => &args.server_address, "error" => %err);
            return ExitCode::FAILURE;
        }
    };

    let uplink_channel = match downlink_channel.try_clone() {
        Ok(channel) => channel,
        Err(err) => {
            error!(log, "failed to split server connection"; "error" => %err);
            return ExitCode::FAILURE;
        }
    };

    let (receiver, sender) = match channel_pair(("0.0.0.0", args.local_port), args.gui_address.as_str()) {
        Ok(pair) => pair,
        Err(err) => {
            error!(log, "failed to bind front-end datagram channel"; "port" => args.local_port, "error" => %err);
            return ExitCode::FAILURE;
        }
    };

    info!(log, "connected"; "server" => &args.server_address, "gui" => &args.gui_address);

    let state = Arc::new(ClientState::new());

    let uplink_state = Arc::clone(&state);
    let uplink_log = log.new(slog::o!("task" => "uplink"));
    let uplink_name = args.player_name.clone();
    let uplink_handle = std::thread::spawn(move || {
        uplink::run(receiver, uplink_channel, uplink_state, uplink_name, uplink_log);
    });

    downlink::run(downlink_channel, sender, state);

    let _ = uplink_handle.join();

    ExitCode::SUCCESS
}
