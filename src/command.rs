//! Stdin command parsing shared by the interactive and headless frontends

use std::path::PathBuf;

use adbsetup_app::SetupAction;
use thiserror::Error;

/// Help text listing every stdin command
pub const HELP: &str = "\
Commands:
  adb <path>     save the location of the adb binary
  cancel         cancel the current step
  rescan         look for devices again
  locate         enter the adb location again
  select <id>    choose a device by serial
  retry          check for the service again
  status         show the current step
  help           show this help
  quit           exit";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Forward an action to the engine
    Action(SetupAction),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

/// Parse one line of input
///
/// Blank lines parse to `None`. Command words are case-insensitive;
/// arguments are kept verbatim.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "adb" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "adb",
                    argument: "a path",
                });
            }
            Command::Action(SetupAction::SaveAdbPath(PathBuf::from(rest)))
        }
        "select" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "select",
                    argument: "a device id",
                });
            }
            Command::Action(SetupAction::SelectDevice(rest.to_string()))
        }
        "cancel" => Command::Action(SetupAction::Cancel),
        "rescan" | "r" => Command::Action(SetupAction::Rescan),
        "locate" => Command::Action(SetupAction::LocateAdb),
        "retry" => Command::Action(SetupAction::Retry),
        "status" | "s" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_ignored() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \t"), Ok(None));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(
            parse_command("cancel"),
            Ok(Some(Command::Action(SetupAction::Cancel)))
        );
        assert_eq!(
            parse_command("  RESCAN "),
            Ok(Some(Command::Action(SetupAction::Rescan)))
        );
        assert_eq!(
            parse_command("locate"),
            Ok(Some(Command::Action(SetupAction::LocateAdb)))
        );
        assert_eq!(
            parse_command("retry"),
            Ok(Some(Command::Action(SetupAction::Retry)))
        );
        assert_eq!(parse_command("status"), Ok(Some(Command::Status)));
        assert_eq!(parse_command("help"), Ok(Some(Command::Help)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_adb_path_keeps_spaces() {
        assert_eq!(
            parse_command("adb /opt/Android SDK/platform-tools/adb"),
            Ok(Some(Command::Action(SetupAction::SaveAdbPath(
                PathBuf::from("/opt/Android SDK/platform-tools/adb")
            ))))
        );
    }

    #[test]
    fn test_select_device() {
        assert_eq!(
            parse_command("select emulator-5554"),
            Ok(Some(Command::Action(SetupAction::SelectDevice(
                "emulator-5554".to_string()
            ))))
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert!(matches!(
            parse_command("adb"),
            Err(CommandError::MissingArgument { command: "adb", .. })
        ));
        assert!(matches!(
            parse_command("select   "),
            Err(CommandError::MissingArgument {
                command: "select",
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("reload now").unwrap_err();
        assert_eq!(err, CommandError::Unknown("reload".to_string()));
        assert!(err.to_string().contains("help"));
    }
}
