use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Port the HTTP API listens on
    #[arg(short, long, env = "API_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address the HTTP API binds to
    #[arg(long, env = "API_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Directory holding the open-attack and blocked-IP snapshots
    #[arg(long, env = "STATE_DIR", default_value = "logs")]
    pub state_dir: PathBuf,

    /// Directory with the static dashboard assets
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Channel that alerts are posted to
    #[arg(long, env = "CHANNEL_ID")]
    pub channel_id: Option<String>,

    /// Bot token used to authenticate against the chat service
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Base URL of the chat service REST API
    #[arg(long, env = "DISCORD_API_BASE", default_value = "https://discord.com/api/v10")]
    pub discord_api: String,

    /// Upper bound on a single notification delivery, in seconds
    #[arg(long, env = "NOTIFY_TIMEOUT_SECS", default_value_t = 5)]
    pub notify_timeout_secs: u64,

    /// Interval between connectivity checks of the chat service, in seconds
    #[arg(long, env = "HEARTBEAT_SECS", default_value_t = 60)]
    pub heartbeat_secs: u64,
}

impl Cli {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs.max(1))
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs.max(1))
    }

    /// Destination identifier with blank values treated as unset
    pub fn destination(&self) -> Option<&str> {
        self.channel_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
