//! Commands: globally addressable actions and the bus that dispatches them.

pub mod bus;
pub mod handler;

pub use bus::{CommandBus, CommandInfo};
pub use handler::{CommandHandler, FnCommand};
