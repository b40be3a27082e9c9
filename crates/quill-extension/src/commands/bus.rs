//! Command bus: maps command ids to handlers and dispatches invocations.
//!
//! Dispatch is fire-and-report: a missing command or a failing handler is
//! logged, shown to the user through the notification surface, and handed
//! back to the caller as an `Err`. Nothing is queued or deduplicated;
//! concurrent invocations of the same id run independently.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use quill_core::host::NotificationSurface;

use super::handler::CommandHandler;
use crate::error::{ExtensionError, ExtensionResult};
use crate::isolation::contain;

/// Entry in the command table.
struct CommandEntry {
    /// The handler.
    handler: Arc<dyn CommandHandler>,
    /// Extension that registered this command.
    owner: String,
}

/// Public description of a registered command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandInfo {
    /// Command id.
    pub id: String,
    /// Owning extension.
    pub owner: String,
}

/// Registry and dispatcher of commands.
pub struct CommandBus {
    /// Command id → handler and owner.
    commands: DashMap<String, CommandEntry>,
    /// Where dispatch failures are reported.
    notifier: Arc<dyn NotificationSurface>,
}

impl std::fmt::Debug for CommandBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBus")
            .field("commands", &self.commands.len())
            .finish()
    }
}

impl CommandBus {
    /// Creates an empty bus reporting failures to `notifier`.
    pub fn new(notifier: Arc<dyn NotificationSurface>) -> Self {
        Self {
            commands: DashMap::new(),
            notifier,
        }
    }

    /// Registers a handler under `command_id` on behalf of `extension_id`.
    ///
    /// Fails if the id is already taken, including by the same extension.
    pub fn register_command(
        &self,
        extension_id: &str,
        command_id: &str,
        handler: Arc<dyn CommandHandler>,
    ) -> ExtensionResult<()> {
        match self.commands.entry(command_id.to_string()) {
            Entry::Occupied(existing) => Err(ExtensionError::DuplicateCommand {
                command: command_id.to_string(),
                owner: existing.get().owner.clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(CommandEntry {
                    handler,
                    owner: extension_id.to_string(),
                });
                info!(extension_id = %extension_id, command = %command_id, "Command registered");
                Ok(())
            }
        }
    }

    /// Executes a command and returns its result.
    pub async fn execute_command(&self, command_id: &str, args: Vec<Value>) -> ExtensionResult<Value> {
        // Clone the handler out so no map guard is held across the await.
        let Some((handler, owner)) = self
            .commands
            .get(command_id)
            .map(|entry| (entry.handler.clone(), entry.owner.clone()))
        else {
            warn!(command = %command_id, "Command not found");
            let err = ExtensionError::CommandNotFound(command_id.to_string());
            self.notifier.show_error(&err.to_string());
            return Err(err);
        };

        debug!(command = %command_id, extension_id = %owner, args = args.len(), "Executing command");

        match contain(handler.call(args)).await {
            Ok(value) => Ok(value),
            Err(message) => {
                error!(
                    command = %command_id,
                    extension_id = %owner,
                    error = %message,
                    "Command failed"
                );
                let err = ExtensionError::CommandExecution {
                    command: command_id.to_string(),
                    message,
                };
                self.notifier.show_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Removes every command owned by `extension_id`. Returns how many were removed.
    pub fn unregister_all(&self, extension_id: &str) -> usize {
        let mut removed = 0;
        self.commands.retain(|_, entry| {
            let keep = entry.owner != extension_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            info!(extension_id = %extension_id, count = removed, "Commands unregistered");
        }
        removed
    }

    /// Returns whether a command is registered.
    pub fn contains(&self, command_id: &str) -> bool {
        self.commands.contains_key(command_id)
    }

    /// Returns the extension owning a command.
    pub fn owner_of(&self, command_id: &str) -> Option<String> {
        self.commands.get(command_id).map(|e| e.owner.clone())
    }

    /// Returns every registered command, sorted by id.
    pub fn list_commands(&self) -> Vec<CommandInfo> {
        let mut commands: Vec<CommandInfo> = self
            .commands
            .iter()
            .map(|entry| CommandInfo {
                id: entry.key().clone(),
                owner: entry.value().owner.clone(),
            })
            .collect();
        commands.sort_by(|a, b| a.id.cmp(&b.id));
        commands
    }

    /// Returns the ids of commands owned by `extension_id`, sorted.
    pub fn commands_of(&self, extension_id: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .commands
            .iter()
            .filter(|entry| entry.value().owner == extension_id)
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }
}
