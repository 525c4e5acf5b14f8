use std::io::Write;

use crate::storage::RecordStore;

use super::command::Command;
use super::error::CommandError;

/// Runs one validated command against a store and writes its output.
///
/// The router borrows the store; opening and closing it stays with the
/// caller so release happens on every exit path.
pub struct CommandRouter<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> CommandRouter<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Parse `args` (verb first) and execute the result.
    pub fn handle<S: AsRef<str>, W: Write>(
        &self,
        args: &[S],
        out: &mut W,
    ) -> Result<(), CommandError> {
        let command = Command::parse(args)?;
        self.execute(&command, out)
    }

    /// Perform exactly one store call for `command`.
    pub fn execute<W: Write>(&self, command: &Command, out: &mut W) -> Result<(), CommandError> {
        tracing::debug!(verb = command.verb().as_str(), "executing command");
        match command {
            Command::Push { content } => {
                let id = self
                    .store
                    .create_record(content)
                    .map_err(CommandError::storage(
                        "record can not be added to the database",
                    ))?;
                tracing::debug!(id, "pushed");
            }
            Command::Pop => {
                self.store
                    .delete_last_record()
                    .map_err(CommandError::storage("last record can not be deleted"))?;
            }
            Command::Show { id } => {
                let content = self
                    .store
                    .get_record_by_id(*id)
                    .map_err(CommandError::storage("record can not be shown"))?;
                writeln!(out, "{content}")?;
            }
            Command::List => {
                let records = self
                    .store
                    .list_records()
                    .map_err(CommandError::storage("records can not be displayed"))?;
                for record in &records {
                    writeln!(out, "{}", record.display_line())?;
                }
            }
            Command::Count => {
                let count = self
                    .store
                    .count_records()
                    .map_err(CommandError::storage("records can not be counted"))?;
                writeln!(out, "{count}")?;
            }
            Command::Delete { id } => {
                self.store
                    .delete_record_by_id(*id)
                    .map_err(CommandError::storage("record can not be deleted"))?;
            }
            Command::Clean => {
                self.store
                    .clean_up()
                    .map_err(CommandError::storage("storage can not be cleaned up"))?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
