use clap::Parser;

/// Standalone signaling relay: room admission over REST plus a per-room
/// WebSocket broadcast bus.
#[derive(Debug, Clone, Parser)]
#[command(name = "huddle-relay", version)]
pub struct RelayConfig {
    /// Address to bind the HTTP listener on.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// TCP port serving both REST and WebSocket traffic.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Participant cap applied to newly created rooms.
    #[arg(long, default_value_t = 2)]
    pub default_limit: usize,
}

impl RelayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
