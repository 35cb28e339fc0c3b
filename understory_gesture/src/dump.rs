// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arguments accepted by the diagnostic dump.

/// What a dump request asks for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DumpCommand {
    /// No arguments: dump everything.
    Full,
    /// `cmd` alone: list the available commands.
    ListCommands,
    /// `cmd clear-touch-log`: drop the gesture log.
    ClearTouchLog,
    /// Anything else.
    Unknown(String),
}

/// Commands listed by [`DumpCommand::ListCommands`], with their help text.
pub const AVAILABLE_COMMANDS: &[(&str, &str)] =
    &[("clear-touch-log", "Clears the touch interaction log")];

impl DumpCommand {
    /// Parse dump arguments.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let mut args = args.iter().map(AsRef::as_ref);
        match args.next() {
            None => Self::Full,
            Some("cmd") => match args.next() {
                None => Self::ListCommands,
                Some("clear-touch-log") => Self::ClearTouchLog,
                Some(other) => Self::Unknown(other.to_owned()),
            },
            Some(other) => Self::Unknown(other.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        let none: [&str; 0] = [];
        assert_eq!(DumpCommand::parse(&none), DumpCommand::Full);
        assert_eq!(DumpCommand::parse(&["cmd"]), DumpCommand::ListCommands);
        assert_eq!(
            DumpCommand::parse(&["cmd", "clear-touch-log"]),
            DumpCommand::ClearTouchLog
        );
        assert_eq!(
            DumpCommand::parse(&["cmd", "bogus"]),
            DumpCommand::Unknown("bogus".into())
        );
        assert_eq!(
            DumpCommand::parse(&[String::from("--proto")]),
            DumpCommand::Unknown("--proto".into())
        );
    }
}
