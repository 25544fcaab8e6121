use std::thread;

use crossbeam::channel::{self, Receiver};
use fileprops_protocol::RowUpdate;

use crate::kind::RowKind;

/// Shown in a row until its value arrives.
pub const PLACEHOLDER: &str = "...";

/// Shown in a row whose value could not be computed.
pub const ERROR_MARKER: &str = "[error]";

/// A row value computed on a worker thread. Settles exactly once.
#[derive(Debug)]
pub struct PendingValue {
    rx: Receiver<Option<String>>,
}

impl PendingValue {
    /// Run `compute` on its own thread. `None` means the lookup failed.
    pub fn spawn<F>(compute: F) -> Self
    where
        F: FnOnce() -> Option<String> + Send + 'static,
    {
        let (tx, rx) = channel::bounded(1);
        thread::spawn(move || {
            // The receiver may be gone if the render was superseded.
            let _ = tx.send(compute());
        });
        Self { rx }
    }

    /// Already settled value.
    pub fn ready(value: Option<String>) -> Self {
        let (tx, rx) = channel::bounded(1);
        let _ = tx.send(value);
        Self { rx }
    }

    /// Block until the value settles. Failures and a worker that died without
    /// answering both yield [`ERROR_MARKER`].
    pub fn wait(self) -> String {
        match self.rx.recv() {
            Ok(Some(value)) => value,
            Ok(None) | Err(_) => ERROR_MARKER.to_owned(),
        }
    }
}

/// A placeholder row in a delivered document and the value that will
/// replace it.
#[derive(Debug)]
pub struct PendingRowUpdate {
    pub generation: u64,
    pub row_kind: RowKind,
    pub async_token: String,
    pub value: PendingValue,
}

impl PendingRowUpdate {
    /// Wait for the value and build the message that patches it in.
    pub fn resolve(self) -> RowUpdate {
        RowUpdate {
            render_generation: self.generation,
            row_kind: self.row_kind.descriptor().to_owned(),
            async_token: self.async_token,
            value: self.value.wait(),
        }
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
