//! Command-line and environment configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 9000;

/// Command-line arguments. Every flag can also be set through the
/// environment variable shown in `--help`.
#[derive(Debug, Parser)]
#[command(name = "scriptgate", version, about = "Expose confined scripts as authenticated HTTP endpoints")]
pub struct Args {
    /// Port to run the server on
    #[arg(short, long, env = "SCRIPTGATE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Newline-delimited bearer token file
    #[arg(long, env = "SCRIPTGATE_TOKEN_FILE", default_value = "/etc/api/key")]
    pub token_file: PathBuf,

    /// Directory that holds the executable endpoints
    #[arg(long, env = "SCRIPTGATE_SCRIPT_DIR", default_value = "/usr/local/sbin/api")]
    pub script_dir: PathBuf,

    /// Append-only access log
    #[arg(long, env = "SCRIPTGATE_LOG_FILE", default_value = "/var/log/api.log")]
    pub log_file: PathBuf,

    /// Script wall-clock limit, in seconds
    #[arg(long, env = "SCRIPTGATE_EXEC_TIMEOUT", default_value_t = 30)]
    pub exec_timeout: u64,

    /// Request body read limit, in seconds
    #[arg(long, default_value_t = 10)]
    pub read_timeout: u64,

    /// Whole-request handling limit, in seconds; keep it above --exec-timeout
    #[arg(long, default_value_t = 40)]
    pub write_timeout: u64,

    /// Keep-alive idle limit, in seconds
    #[arg(long, default_value_t = 60)]
    pub idle_timeout: u64,
}

/// Connection-level limits, distinct from the per-script timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Bound on reading the request body.
    pub read: Duration,
    /// Bound on producing the whole response.
    pub write: Duration,
    /// Bound on waiting for the next request on a kept-alive connection.
    pub idle: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(10),
            write: Duration::from_secs(40),
            idle: Duration::from_secs(60),
        }
    }
}

/// Resolved gateway configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GatewayConfig {
    pub port: u16,
    pub token_file: PathBuf,
    pub script_dir: PathBuf,
    pub log_file: PathBuf,
    pub exec_timeout: Duration,
    pub timeouts: HttpTimeouts,
}

impl GatewayConfig {
    /// Returns `true` if a script could run into the handler timeout before
    /// its own deadline fires.
    #[must_use]
    pub fn write_timeout_too_short(&self) -> bool {
        self.timeouts.write <= self.exec_timeout
    }
}

impl From<Args> for GatewayConfig {
    fn from(args: Args) -> Self {
        Self {
            port: args.port,
            token_file: args.token_file,
            script_dir: args.script_dir,
            log_file: args.log_file,
            exec_timeout: Duration::from_secs(args.exec_timeout),
            timeouts: HttpTimeouts {
                read: Duration::from_secs(args.read_timeout),
                write: Duration::from_secs(args.write_timeout),
                idle: Duration::from_secs(args.idle_timeout),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> GatewayConfig {
        match Args::try_parse_from(args) {
            Ok(a) => GatewayConfig::from(a),
            Err(e) => panic!("argument parsing failed: {e}"),
        }
    }

    #[test]
    fn defaults_match_deployment_layout() {
        let config = parse(&["scriptgate"]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.token_file, PathBuf::from("/etc/api/key"));
        assert_eq!(config.script_dir, PathBuf::from("/usr/local/sbin/api"));
        assert_eq!(config.log_file, PathBuf::from("/var/log/api.log"));
        assert_eq!(config.exec_timeout, Duration::from_secs(30));
        assert_eq!(config.timeouts, HttpTimeouts::default());
        assert!(!config.write_timeout_too_short());
    }

    #[test]
    fn short_port_flag_overrides_default() {
        let config = parse(&["scriptgate", "-p", "3000"]);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn write_timeout_below_exec_timeout_is_flagged() {
        let config = parse(&["scriptgate", "--exec-timeout", "60", "--write-timeout", "40"]);
        assert!(config.write_timeout_too_short());
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        assert!(Args::try_parse_from(["scriptgate", "--port", "http"]).is_err());
    }
}
