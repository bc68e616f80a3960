//! # Synchronized Value
//!
//! A value owned by a single Tokio task. Every read and write is a message
//! on one unbounded FIFO channel, so commands are applied strictly one at a
//! time and in the order they were sent:
//!
//! ```text
//!   caller A ──set(3)──┐
//!   caller B ──get()───┼──► [ mpsc queue ] ──► actor task (owns T)
//!   caller C ──update──┘                          │
//!                                  oneshot reply ◄─┘
//! ```
//!
//! `set` never waits, which makes it safe to call from host callbacks on
//! threads outside the runtime. `get` and `update` wait for the reply.

use crate::domain::StateError;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

type UpdateFn<T> = Box<dyn FnOnce(&mut T) + Send>;

enum Command<T> {
    Get(oneshot::Sender<T>),
    Set(T),
    Update(UpdateFn<T>),
}

/// Handle to a value owned by an actor task.
///
/// Cloning the handle shares the same value. The actor exits once every
/// handle is dropped.
pub struct SyncedValue<T> {
    tx: mpsc::UnboundedSender<Command<T>>,
}

impl<T> Clone for SyncedValue<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> std::fmt::Debug for SyncedValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncedValue")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<T> SyncedValue<T>
where
    T: Clone + Send + 'static,
{
    /// Spawn the actor on `handle` holding `initial`.
    pub fn spawn_on(initial: T, handle: &Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run(initial, rx));
        Self { tx }
    }

    /// Read the current value.
    ///
    /// Observes every `set`/`update` this caller issued before the call.
    pub async fn get(&self) -> Result<T, StateError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::Get(reply_tx))
            .map_err(|_| StateError::Closed)?;
        reply_rx.await.map_err(|_| StateError::Closed)
    }

    /// Replace the value. Enqueues and returns immediately.
    pub fn set(&self, value: T) -> Result<(), StateError> {
        self.tx
            .send(Command::Set(value))
            .map_err(|_| StateError::Closed)
    }

    /// Run `f` against the value inside the actor and return its result.
    ///
    /// No other command is applied while `f` runs, so check-and-set
    /// transitions are atomic.
    pub async fn update<R, F>(&self, f: F) -> Result<R, StateError>
    where
        F: FnOnce(&mut T) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let apply: UpdateFn<T> = Box::new(move |value| {
            let _ = reply_tx.send(f(value));
        });
        self.tx
            .send(Command::Update(apply))
            .map_err(|_| StateError::Closed)?;
        reply_rx.await.map_err(|_| StateError::Closed)
    }
}

async fn run<T: Clone>(mut value: T, mut rx: mpsc::UnboundedReceiver<Command<T>>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Get(reply) => {
                // Caller gave up waiting
                let _ = reply.send(value.clone());
            }
            Command::Set(next) => value = next,
            Command::Update(apply) => apply(&mut value),
        }
    }
}
