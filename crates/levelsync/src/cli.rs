use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(name = "levelsync", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file, instead of the per-user one.
    #[arg(long, global = true, env = "LEVELSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Level directory, searched in the given order. Repeatable; replaces
    /// the configured directories.
    #[arg(short, long = "dir", global = true)]
    pub dirs: Vec<PathBuf>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Make levels available, enabling or downloading as needed.
    #[command(alias = "g", name = "get")]
    Get(GetArg),
    /// Show the registered levels.
    #[command(alias = "ls", name = "list")]
    List,
    /// Show disabled level archives.
    #[command(alias = "d", name = "disabled")]
    Disabled,
}

#[derive(Clone, Debug, clap::Args)]
pub struct GetArg {
    /// Content keys, e.g. `arena1.mp:3f2a9c`.
    #[arg(required = true)]
    pub keys: Vec<String>,

    /// Act as the authoritative host and report the registry index of
    /// each acquired level.
    #[arg(long)]
    pub server: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_is_consistent() { App::command().debug_assert() }

    #[test]
    fn test_parse_get() {
        let app = App::try_parse_from(["levelsync", "-vv", "get", "--server", "a.mp:1", "b.mp:2", "-d", "/l"])
            .unwrap();
        assert_eq!(app.verbose, 2);
        assert_eq!(app.dirs, vec![PathBuf::from("/l")]);
        let Commands::Get(get) = app.cmd else { panic!("expected get") };
        assert!(get.server);
        assert_eq!(get.keys, vec!["a.mp:1", "b.mp:2"]);
    }

    #[test]
    fn test_get_needs_a_key() { assert!(App::try_parse_from(["levelsync", "get"]).is_err()) }
}
