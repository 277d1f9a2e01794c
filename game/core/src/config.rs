/// Immutable per-round configuration. Built directly from parsed CLI
/// arguments; there is no config file to load.
#[derive(Clone, Debug)]
pub struct RoundConfig {
    pub server_name: String,
    pub size_x: u16,
    pub size_y: u16,
    pub players_count: u8,
    pub bomb_timer: u16,
    pub explosion_radius: u16,
    pub initial_blocks: u16,
    pub game_length: u16,
    pub turn_duration_ms: u64,
    pub seed: u32,
}
