//! Background execution of service requests.
//!
//! Every [`Request`] runs on its own short-lived thread and reports back over
//! a channel. Nothing is cancelled or reordered: completions are delivered in
//! the order the threads finish.

use super::command::{Completion, Request, execute};
use rolodex_core::client::ContactApi;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::warn;

pub struct RequestRunner {
    api: Arc<dyn ContactApi>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl RequestRunner {
    pub fn new(api: Arc<dyn ContactApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { api, tx, rx }
    }

    /// Start `request` in the background.
    pub fn submit(&self, request: Request) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let label = request.label();
        let spawned = thread::Builder::new()
            .name(format!("rolodex-{label}"))
            .spawn(move || {
                let completion = execute(api.as_ref(), request);
                // The receiver only goes away when the UI is shutting down.
                let _ = tx.send(completion);
            });
        if let Err(err) = spawned {
            warn!(request = label, "failed to spawn request thread: {err}");
        }
    }

    pub fn submit_all(&self, requests: impl IntoIterator<Item = Request>) {
        for request in requests {
            self.submit(request);
        }
    }

    /// Completions that have arrived since the last call, without blocking.
    pub fn drain(&self) -> Vec<Completion> {
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next completion.
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Completion> {
        self.rx.recv_timeout(timeout).ok()
    }
}
