use std::num::ParseIntError;

use thiserror::Error;

use crate::storage::StoreError;

/// Errors raised while validating or executing a single command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no command provided")]
    NoCommand,

    #[error("command '{0}' is unknown")]
    UnknownCommand(String),

    #[error("{0} is not provided")]
    MissingArgument(&'static str),

    #[error("{name} is invalid: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("{context}, error: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("output can not be written: {0}")]
    Output(#[from] std::io::Error),
}

impl CommandError {
    pub(crate) fn invalid_id(value: &str, err: ParseIntError) -> Self {
        Self::InvalidArgument {
            name: "ID",
            reason: format!("'{value}' is not a non-negative integer ({err})"),
        }
    }

    pub(crate) fn storage(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { context, source }
    }
}
