use slog::Logger;
use sloggers::terminal::{Destination, TerminalLoggerBuilder};
use sloggers::types::Severity;
use sloggers::Build;

/// Builds the process-wide root logger. Always writes to stderr so stdout stays
/// free for anything piping the binary's own protocol traffic.
pub fn root_logger(verbose: bool) -> Logger {
    let mut builder = TerminalLoggerBuilder::new();
    builder.destination(Destination::Stderr);
    builder.level(if verbose {
        Severity::Debug
    } else {
        Severity::Info
    });
    builder
        .build()
        .expect("terminal logger destination is always valid")
}
