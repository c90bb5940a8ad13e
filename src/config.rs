//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown")]
#[command(about = "A concurrent countdown timer server with per-device event streams")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Log timer events for this device (repeatable)
    #[arg(long = "log-device", value_name = "DEVICE_ID")]
    pub log_devices: Vec<String>,

    /// Log timer events for timers started without a device
    #[arg(long)]
    pub log_unscoped: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Device scopes that get an event logger attached
    pub fn logged_scopes(&self) -> Vec<Option<String>> {
        let mut scopes: Vec<Option<String>> = self.log_devices.iter().cloned().map(Some).collect();
        if self.log_unscoped {
            scopes.push(None);
        }
        scopes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["countdown"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.log_level(), "info");
        assert!(config.logged_scopes().is_empty());
    }

    #[test]
    fn repeated_log_devices_and_unscoped() {
        let config = Config::try_parse_from([
            "countdown",
            "--log-device",
            "kitchen",
            "--log-device",
            "office",
            "--log-unscoped",
            "-v",
        ])
        .unwrap();
        assert_eq!(
            config.logged_scopes(),
            vec![Some("kitchen".to_string()), Some("office".to_string()), None]
        );
        assert_eq!(config.log_level(), "debug");
    }
}
