use std::io::{self, Write};

use crate::storage::RecordId;

use super::error::CommandError;

/// First CLI token selecting the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Push,
    Pop,
    Show,
    List,
    Count,
    Delete,
    Clean,
}

impl Verb {
    /// Usage order.
    pub const ALL: [Verb; 7] = [
        Self::Push,
        Self::Pop,
        Self::Show,
        Self::List,
        Self::Count,
        Self::Delete,
        Self::Clean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Show => "show",
            Self::List => "list",
            Self::Count => "count",
            Self::Delete => "delete",
            Self::Clean => "clean",
        }
    }

    /// Case-insensitive lookup.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(token))
    }

    fn args_hint(&self) -> &'static str {
        match self {
            Self::Push => " <text...>",
            Self::Show | Self::Delete => " <id>",
            Self::Pop | Self::List | Self::Count | Self::Clean => "",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Push => "add new task",
            Self::Pop => "delete the latest task",
            Self::Show => "show the exact task by its ID",
            Self::List => "list all tasks",
            Self::Count => "count tasks",
            Self::Delete => "delete the exact task by its ID",
            Self::Clean => "clean the database",
        }
    }
}

/// A validated command, ready to run against a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Push { content: String },
    Pop,
    Show { id: RecordId },
    List,
    Count,
    Delete { id: RecordId },
    Clean,
}

impl Command {
    /// Validate `args` (verb first). Never touches storage.
    ///
    /// Arguments beyond what a verb uses are ignored.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, CommandError> {
        let (token, rest) = args.split_first().ok_or(CommandError::NoCommand)?;
        let token: &str = token.as_ref();
        let verb = Verb::from_token(token)
            .ok_or_else(|| CommandError::UnknownCommand(token.to_string()))?;

        let command = match verb {
            Verb::Push => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("content"));
                }
                let content = rest
                    .iter()
                    .map(|arg| arg.as_ref())
                    .collect::<Vec<&str>>()
                    .join(" ");
                if content.is_empty() {
                    return Err(CommandError::InvalidArgument {
                        name: "content",
                        reason: "no content to add".to_string(),
                    });
                }
                Self::Push { content }
            }
            Verb::Pop => Self::Pop,
            Verb::Show => Self::Show {
                id: parse_id(rest)?,
            },
            Verb::List => Self::List,
            Verb::Count => Self::Count,
            Verb::Delete => Self::Delete {
                id: parse_id(rest)?,
            },
            Verb::Clean => Self::Clean,
        };
        Ok(command)
    }

    pub fn verb(&self) -> Verb {
        match self {
            Self::Push { .. } => Verb::Push,
            Self::Pop => Verb::Pop,
            Self::Show { .. } => Verb::Show,
            Self::List => Verb::List,
            Self::Count => Verb::Count,
            Self::Delete { .. } => Verb::Delete,
            Self::Clean => Verb::Clean,
        }
    }
}

fn parse_id<S: AsRef<str>>(rest: &[S]) -> Result<RecordId, CommandError> {
    let raw: &str = rest
        .first()
        .map(|arg| arg.as_ref())
        .ok_or(CommandError::MissingArgument("ID"))?;
    raw.parse::<RecordId>()
        .map_err(|e| CommandError::invalid_id(raw, e))
}

/// Write the list of supported commands, one per line.
pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    for verb in Verb::ALL {
        writeln!(
            out,
            "- {}{}: {}",
            verb.as_str(),
            verb.args_hint(),
            verb.description()
        )?;
    }
    Ok(())
}
