use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::control::command::Command;

/// Effect run when a command is requested.
pub type Action = Arc<dyn Fn(Command) + Send + Sync>;

/// Maps request text to a [`Command`] and runs its bound action.
///
/// With no actions bound the dispatcher only logs the intent, which is the
/// behavior of a board with no actuators wired.
#[derive(Clone, Default)]
pub struct Dispatcher {
    actions: HashMap<Command, Action>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `action` to `command`, replacing any previous binding.
    pub fn with_action<F>(mut self, command: Command, action: F) -> Self
    where
        F: Fn(Command) + Send + Sync + 'static,
    {
        self.actions.insert(command, Arc::new(action));
        self
    }

    pub fn is_bound(&self, command: Command) -> bool {
        self.actions.contains_key(&command)
    }

    /// Looks for the first known command in `request` and runs its action.
    ///
    /// Requests that match nothing (`/`, `/favicon.ico`, garbage) are the
    /// normal case and return `None`.
    pub fn dispatch(&self, request: &str) -> Option<Command> {
        tracing::debug!(len = request.len(), "Processing request");

        let command = Command::find_in(request)?;
        tracing::info!(command = ?command, label = command.label(), "Command received");

        if let Some(action) = self.actions.get(&command) {
            action(command);
        }

        Some(command)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("bound", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
