//! Stats formatting
//!
//! Turns a raw [`StatsSnapshot`] into the summary shown to an operator.

use serde::Serialize;

use crate::config::ServerConfig;
use crate::protocol::StatsSnapshot;

/// Human-readable view of one `stats` exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    /// Server alias
    pub id: String,
    /// `host:port`
    pub server: String,
    pub pid: String,
    pub version: String,
    pub uptime: String,
    pub max_memory_limit: String,
    pub curr_memory_usage: String,
    pub curr_items: String,
    pub curr_connections: String,
    pub get_hits: String,
    pub get_misses: String,
}

impl StatsSummary {
    /// Build the summary. Missing or non-numeric counters read as 0.
    pub fn from_snapshot(snapshot: &StatsSnapshot) -> Self {
        let text = |name: &str| snapshot.get(name).cloned().unwrap_or_default();
        let number = |name: &str| {
            snapshot
                .get(name)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(0)
        };

        Self {
            id: String::new(),
            server: String::new(),
            pid: text("pid"),
            version: text("version"),
            uptime: format_uptime(number("uptime")),
            max_memory_limit: format_memory_usage(number("limit_maxbytes")),
            curr_memory_usage: format_memory_usage(number("bytes")),
            curr_items: text("curr_items"),
            curr_connections: text("curr_connections"),
            get_hits: text("get_hits"),
            get_misses: text("get_misses"),
        }
    }

    /// Attach the server's name and alias
    pub fn for_server(mut self, server: &ServerConfig) -> Self {
        self.id = server.alias.clone();
        self.server = server.name();
        self
    }
}

/// `D天H时M分S秒`
pub fn format_uptime(seconds: u64) -> String {
    let day = seconds / 86400;
    let hour = seconds % 86400 / 3600;
    let minute = seconds % 3600 / 60;
    let second = seconds % 60;
    format!("{}天{}时{}分{}秒", day, hour, minute, second)
}

/// `<MB>MB (<KB>KB)` with two decimals each
pub fn format_memory_usage(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    format!("{:.2}MB ({:.2}KB)", mb, kb)
}
