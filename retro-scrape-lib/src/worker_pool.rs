//! One worker task per shard, reporting over a single channel.
//!
//! Each worker walks its shard in order and sends one
//! [`WorkerMessage::Entry`] per item, then a [`WorkerMessage::ShardDone`].
//! Messages from one worker arrive in the order they were sent, so a
//! shard's done marker always follows its last entry.

use std::future::Future;
use std::ops::Range;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Message sent from a worker to the aggregation point.
#[derive(Debug)]
pub enum WorkerMessage<R> {
    Entry(R),
    ShardDone { shard: usize },
}

/// The running shard workers and the receiving end of their channel.
///
/// Dropping the pool aborts any worker still running.
pub struct ShardPool<R: Send + 'static> {
    message_rx: mpsc::UnboundedReceiver<WorkerMessage<R>>,
    handles: Vec<JoinHandle<()>>,
}

impl<R: Send + 'static> ShardPool<R> {
    /// Spawn one worker per shard. `process_fn` is called with every item
    /// index of the worker's shard, one at a time.
    pub fn start<F, Fut>(shards: Vec<Range<usize>>, process_fn: F) -> Self
    where
        F: Fn(usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let process_fn = Arc::new(process_fn);

        let handles = shards
            .into_iter()
            .enumerate()
            .map(|(shard, range)| {
                let message_tx = message_tx.clone();
                let process_fn = process_fn.clone();
                tokio::spawn(async move {
                    log::debug!("Shard {shard} started ({} items)", range.len());
                    for index in range {
                        let result = process_fn(index).await;
                        if message_tx.send(WorkerMessage::Entry(result)).is_err() {
                            return; // receiver gone, run is over
                        }
                    }
                    let _ = message_tx.send(WorkerMessage::ShardDone { shard });
                })
            })
            .collect();

        // the channel closes once every worker has finished
        drop(message_tx);

        Self {
            message_rx,
            handles,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.handles.len()
    }

    /// Next message from any worker. `None` once every worker has exited.
    pub async fn recv(&mut self) -> Option<WorkerMessage<R>> {
        self.message_rx.recv().await
    }

    /// Stop all workers immediately.
    pub fn abort(&self) {
        for handle in &self.handles {
            handle.abort();
        }
    }

    /// Wait for every worker task to exit, logging any that panicked.
    pub async fn join(mut self) {
        let handles = std::mem::take(&mut self.handles);
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                if e.is_panic() {
                    log::error!("A scrape worker panicked: {e}");
                }
            }
        }
    }
}

impl<R: Send + 'static> Drop for ShardPool<R> {
    fn drop(&mut self) {
        self.abort();
    }
}
