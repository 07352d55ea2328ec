use std::path::PathBuf;

use clap::Parser;

/// Globeview: an orbitable, lit, textured sphere.
#[derive(Parser, Debug)]
#[command(name = "globeview", version, about)]
pub struct Args {
    /// Config file path. Defaults to ./globeview.toml when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter override, e.g. `debug` or `globeview=trace,wgpu=warn`.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::parse_from(["globeview", "--config", "scene.toml", "--log-level", "debug"]);
        assert_eq!(args.config, Some(PathBuf::from("scene.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn flags_are_optional() {
        let args = Args::parse_from(["globeview"]);
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
