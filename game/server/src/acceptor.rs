use crate::connection::{reader_task, writer_task};
use crate::shared::SharedState;
use gamecore::RoundConfig;
use slog::{o, warn, Logger};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use wireframe::channel::ReliableChannel;

/// Accepts connections forever, spawning a reader and a writer task per
/// peer. Each task gets its own cloned socket handle so ingress and egress
/// never block on each other.
pub fn run(listener: TcpListener, shared: Arc<SharedState>, config: RoundConfig, log: Logger) {
    let mut next_id = 0u64;

    for incoming in listener.incoming() {
        let stream = match incoming {
            Ok(stream) => stream,
            Err(err) => {
                warn!(log, "accept failed"; "error" => %err);
                continue;
            }
        };

        let reader_channel = match ReliableChannel::from_accepted(stream) {
            Ok(channel) => channel,
            Err(err) => {
                warn!(log, "failed to wrap accepted connection"; "error" => %err);
                continue;
            }
        };

        let writer_channel = match reader_channel.try_clone() {
            Ok(channel) => channel,
            Err(err) => {
                warn!(log, "failed to clone accepted connection"; "error" => %err);
                continue;
            }
        };

        let channel_id = next_id;
        next_id += 1;
        let conn_log = log.new(o!("channel_id" => channel_id));

        let reader_shared = Arc::clone(&shared);
        let reader_log = conn_log.new(o!("task" => "reader"));
        thread::spawn(move || reader_task(reader_channel, reader_shared, reader_log));

        let writer_shared = Arc::clone(&shared);
        let writer_log = conn_log.new(o!("task" => "writer"));
        let writer_config = config.clone();
        thread::spawn(move || writer_task(writer_channel, writer_shared, writer_config, writer_log));
    }
}
