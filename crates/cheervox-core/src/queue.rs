//! FIFO hand-off between the ingestion thread and the processing thread.
//!
//! Unbounded, multi-producer, single-consumer. Push never blocks ingestion;
//! pop suspends the consumer until a task arrives (no busy polling). No
//! priority, no reordering, no dedup, and no backlog limit: a sustained
//! arrival burst grows memory, which is an accepted limitation.

use crate::error::{CheerError, CheerResult};
use crate::types::Task;
use tokio::sync::mpsc;

/// Create a connected producer/consumer pair.
pub fn task_queue() -> (TaskProducer, TaskConsumer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TaskProducer { tx }, TaskConsumer { rx })
}

/// Ingestion-side handle. Cloneable; push is non-blocking.
#[derive(Clone)]
pub struct TaskProducer {
    tx: mpsc::UnboundedSender<Task>,
}

impl TaskProducer {
    pub fn push(&self, task: Task) -> CheerResult<()> {
        self.tx
            .send(task)
            .map_err(|e| CheerError::ChannelSend(e.to_string()))
    }
}

/// Processing-side handle; exactly one exists.
pub struct TaskConsumer {
    rx: mpsc::UnboundedReceiver<Task>,
}

impl TaskConsumer {
    /// Block until the next task arrives, in push order. Returns `None`
    /// once every producer has been dropped.
    pub fn pop(&mut self) -> Option<Task> {
        self.rx.blocking_recv()
    }
}
