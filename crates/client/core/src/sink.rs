//! Outgoing command seam.

use std::collections::VecDeque;

use realm_core::Command;

/// Destination for commands produced by the prediction layer.
///
/// Commands are fire-and-forget: the server answers only through the next
/// snapshot.
pub trait CommandSink {
    fn send(&mut self, command: Command);
}

impl CommandSink for Vec<Command> {
    fn send(&mut self, command: Command) {
        self.push(command);
    }
}

impl CommandSink for VecDeque<Command> {
    fn send(&mut self, command: Command) {
        self.push_back(command);
    }
}
