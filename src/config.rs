//! Service configuration, read from command-line flags or the environment.

use std::net::SocketAddr;

use clap::Parser;

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

#[derive(Debug, Clone, Parser)]
#[command(name = "student-directory", version, about = "In-memory student directory HTTP service")]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "STUDENT_DIRECTORY_ADDR", default_value_t = default_addr())]
    pub addr: SocketAddr,

    /// Disable the permissive CORS layer.
    #[arg(long, env = "STUDENT_DIRECTORY_NO_CORS")]
    pub no_cors: bool,

    /// Start with an empty directory instead of the seed records.
    #[arg(long, env = "STUDENT_DIRECTORY_NO_SEED")]
    pub no_seed: bool,

    /// Report name-lookup misses and mismatches as 404 instead of a 200
    /// payload.
    #[arg(long, env = "STUDENT_DIRECTORY_STRICT_LOOKUPS")]
    pub strict_lookups: bool,
}

impl Config {
    pub fn cors(&self) -> bool {
        !self.no_cors
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            no_cors: false,
            no_seed: false,
            strict_lookups: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parser() {
        let parsed = Config::try_parse_from(["student-directory"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.addr, default.addr);
        assert!(parsed.cors());
        assert!(!parsed.no_seed);
        assert!(!parsed.strict_lookups);
    }

    #[test]
    fn test_flags() {
        let parsed = Config::try_parse_from([
            "student-directory",
            "--addr",
            "127.0.0.1:9000",
            "--no-cors",
            "--strict-lookups",
        ])
        .unwrap();
        assert_eq!(parsed.addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert!(!parsed.cors());
        assert!(parsed.strict_lookups);
    }
}
