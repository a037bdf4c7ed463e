//! Device commands and request dispatch.
//!
//! A request selects a command when its text contains `GET <path>` for one
//! of the known command paths. The [`Dispatcher`] logs every recognised
//! command and runs the action bound to it, if any.

pub mod command;
pub mod dispatcher;

pub use command::Command;
pub use dispatcher::{Action, Dispatcher};
