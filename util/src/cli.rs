use clap::{value_t, App, Arg};
use fuse::time::default_seed;
use gamecore::RoundConfig;

pub struct ServerArgs {
    pub config: RoundConfig,
    pub port: u16,
}

pub struct ClientArgs {
    pub gui_address: String,
    pub player_name: String,
    pub local_port: u16,
    pub server_address: String,
}

fn server_app<'a, 'b>() -> App<'a, 'b> {
    App::new("bomberserver")
        .version("1.0")
        .about("Authoritative round server for a Bomberman-style game")
        .arg(
            Arg::with_name("bomb-timer")
                .short("b")
                .long("bomb-timer")
                .takes_value(true)
                .required(true)
                .help("ticks until a placed bomb detonates"),
        )
        .arg(
            Arg::with_name("players-count")
                .short("c")
                .long("players-count")
                .takes_value(true)
                .required(true)
                .help("players the lobby admits before the round starts"),
        )
        .arg(
            Arg::with_name("turn-duration-ms")
                .short("d")
                .long("turn-duration-ms")
                .takes_value(true)
                .required(true)
                .help("milliseconds between ticks"),
        )
        .arg(
            Arg::with_name("explosion-radius")
                .short("e")
                .long("explosion-radius")
                .takes_value(true)
                .required(true)
                .help("cells per explosion arm"),
        )
        .arg(
            Arg::with_name("initial-blocks")
                .short("k")
                .long("initial-blocks")
                .takes_value(true)
                .required(true)
                .help("blocks scattered across the board at round start"),
        )
        .arg(
            Arg::with_name("game-length")
                .short("l")
                .long("game-length")
                .takes_value(true)
                .required(true)
                .help("turns per round"),
        )
        .arg(
            Arg::with_name("server-name")
                .short("n")
                .long("server-name")
                .takes_value(true)
                .required(true)
                .help("name advertised to clients"),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .takes_value(true)
                .required(true)
                .help("TCP port to listen on"),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .takes_value(true)
                .help("RNG seed; defaults to the current clock's nanoseconds"),
        )
        .arg(
            Arg::with_name("size-x")
                .short("x")
                .long("size-x")
                .takes_value(true)
                .required(true)
                .help("board width"),
        )
        .arg(
            Arg::with_name("size-y")
                .short("y")
                .long("size-y")
                .takes_value(true)
                .required(true)
                .help("board height"),
        )
}

fn client_app<'a, 'b>() -> App<'a, 'b> {
    App::new("bombercli")
        .version("1.0")
        .about("Proxies a local front-end into a round server")
        .arg(
            Arg::with_name("gui-address")
                .short("d")
                .long("gui-address")
                .takes_value(true)
                .required(true)
                .help("host:port of the local rendering front-end"),
        )
        .arg(
            Arg::with_name("player-name")
                .short("n")
                .long("player-name")
                .takes_value(true)
                .required(true)
                .help("display name to join with"),
        )
        .arg(
            Arg::with_name("local-port")
                .short("p")
                .long("local-port")
                .takes_value(true)
                .required(true)
                .help("local UDP port the front-end talks to"),
        )
        .arg(
            Arg::with_name("server-address")
                .short("s")
                .long("server-address")
                .takes_value(true)
                .required(true)
                .help("host:port of the round server"),
        )
}

/// Parses the server's CLI surface. On a bad or missing argument, clap
/// prints a usage line to stderr and exits with a non-zero status before
/// this function returns.
pub fn parse_server_args() -> ServerArgs {
    let matches = server_app().get_matches();

    let seed = if matches.is_present("seed") {
        value_t!(matches, "seed", u32).unwrap_or_else(|e| e.exit())
    } else {
        default_seed()
    };

    ServerArgs {
        port: value_t!(matches, "port", u16).unwrap_or_else(|e| e.exit()),
        config: RoundConfig {
            server_name: matches.value_of("server-name").unwrap().to_string(),
            size_x: value_t!(matches, "size-x", u16).unwrap_or_else(|e| e.exit()),
            size_y: value_t!(matches, "size-y", u16).unwrap_or_else(|e| e.exit()),
            players_count: value_t!(matches, "players-count", u8).unwrap_or_else(|e| e.exit()),
            bomb_timer: value_t!(matches, "bomb-timer", u16).unwrap_or_else(|e| e.exit()),
            explosion_radius: value_t!(matches, "explosion-radius", u16).unwrap_or_else(|e| e.exit()),
            initial_blocks: value_t!(matches, "initial-blocks", u16).unwrap_or_else(|e| e.exit()),
            game_length: value_t!(matches, "game-length", u16).unwrap_or_else(|e| e.exit()),
            turn_duration_ms: value_t!(matches, "turn-duration-ms", u64).unwrap_or_else(|e| e.exit()),
            seed,
        },
    }
}

pub fn parse_client_args() -> ClientArgs {
    let matches = client_app().get_matches();

    ClientArgs {
        gui_address: matches.value_of("gui-address").unwrap().to_string(),
        player_name: matches.value_of("player-name").unwrap().to_string(),
        local_port: value_t!(matches, "local-port", u16).unwrap_or_else(|e| e.exit()),
        server_address: matches.value_of("server-address").unwrap().to_string(),
    }
}
