mod command;
mod dispatch;
mod error;

pub use command::{write_usage, Command, Verb};
pub use dispatch::CommandRouter;
pub use error::CommandError;
