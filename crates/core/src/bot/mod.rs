//! Chat command handling.
//!
//! Transports hand every incoming message to the `Dispatcher`, which parses
//! the command, checks the route's role against the auth gate and runs the
//! handler.

mod command;
mod dispatcher;

pub use command::Command;
pub use dispatcher::{
    upload_label, Dispatcher, IncomingMessage, DEFAULT_MANUAL_LABEL, GENERIC_FAILURE, NO_RESULTS,
    UNAUTHORIZED,
};
