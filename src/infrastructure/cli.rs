use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{domain::reading::ListKind, utils::version};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Directory holding config.{json5,json,yaml,toml,ini}
    #[arg(long, value_name = "DIR", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Page through a list served from a JSON fixture
    Browse {
        /// notifications, rooms or groups
        kind: ListKind,

        /// Fixture document; relative paths resolve against `fixtures_dir`
        #[arg(short, long, value_name = "FILE")]
        fixture: PathBuf,

        /// Notification type or room status, depending on the list
        #[arg(long, value_name = "FILTER")]
        filter: Option<String>,

        /// Pages to load after the first one
        #[arg(short, long, default_value_t = 1)]
        pages: usize,

        /// Override the configured page size
        #[arg(long, value_name = "N")]
        page_size: Option<usize>,
    },
    /// Print this installation's device identifier
    DeviceId,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_browse() {
        let cli = Cli::try_parse_from([
            "readroom",
            "browse",
            "rooms",
            "--fixture",
            "rooms.json",
            "--filter",
            "upcoming",
            "--pages",
            "3",
        ])
        .expect("valid arguments");

        assert_eq!(
            cli.command,
            Command::Browse {
                kind: ListKind::Rooms,
                fixture: PathBuf::from("rooms.json"),
                filter: Some("upcoming".to_string()),
                pages: 3,
                page_size: None,
            }
        );
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_parse_device_id_with_global_config() {
        let cli = Cli::try_parse_from(["readroom", "device-id", "--config", "/tmp/rr"])
            .expect("valid arguments");
        assert_eq!(cli.command, Command::DeviceId);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/rr")));
    }

    #[test]
    fn test_unknown_list_kind_is_rejected() {
        assert!(Cli::try_parse_from(["readroom", "browse", "shelves", "-f", "x.json"]).is_err());
    }
}
