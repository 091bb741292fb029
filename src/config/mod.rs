use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::agent::AgentRef;

/// Default communication port of the directory agent.
pub const DIRECTORY_PORT: u16 = 9000;

/// Resolved endpoints for one agent process: where it listens and where the
/// directory lives. Host/port parsing happens outside the core; these
/// values arrive already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSettings {
    pub host: String,
    pub port: u16,
    pub directory_host: String,
    pub directory_port: u16,
    pub verbose: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DIRECTORY_PORT,
            directory_host: "127.0.0.1".to_string(),
            directory_port: DIRECTORY_PORT,
            verbose: false,
        }
    }
}

impl AgentSettings {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn comm_address(&self) -> String {
        format!("http://{}:{}/comm", self.host, self.port)
    }

    pub fn stop_address(&self) -> String {
        format!("http://{}:{}/Stop", self.host, self.port)
    }

    /// Addressing record for the agent these settings belong to.
    pub fn agent_ref(&self, name: &str) -> AgentRef {
        AgentRef::new(
            name,
            format!("agn:{name}"),
            self.comm_address(),
            self.stop_address(),
        )
    }

    /// Addressing record for the directory agent as seen from this process.
    pub fn directory_ref(&self) -> AgentRef {
        AgentRef::new(
            "DirectoryAgent",
            "agn:Directory",
            format!("http://{}:{}/comm", self.directory_host, self.directory_port),
            format!("http://{}:{}/Stop", self.directory_host, self.directory_port),
        )
    }
}

/// Installs the global tracing subscriber. `verbose` widens the level to
/// include per-request debug output.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();
}
