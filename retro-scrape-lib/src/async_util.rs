//! Driving a scrape while handling its progress events on the same task.
//!
//! The CLI runs [`run_scrape`](crate::run_scrape) on a runtime and needs to
//! redraw its progress bar for every [`ScrapeEvent`](crate::ScrapeEvent)
//! without spawning a second task that owns the terminal.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// How long to keep draining events once the task has returned.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `task` to completion, calling `on_event` for every event it sends.
///
/// Events still queued when the task returns are handled before the result
/// is handed back, so the last progress line is never lost.
pub async fn run_with_events<F, E, R>(
    task: F,
    mut events: mpsc::UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);
    let mut handled: u64 = 0;

    let result = loop {
        tokio::select! {
            r = &mut task => break Some(r),
            event = events.recv() => match event {
                Some(e) => {
                    handled += 1;
                    on_event(e);
                }
                None => break None,
            },
        }
    };

    let Some(result) = result else {
        // Every sender is gone; the task still has to finish.
        log::debug!("Event channel closed after {handled} event(s)");
        return task.await;
    };

    let deadline = Instant::now() + DRAIN_TIMEOUT;
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(e)) => {
                handled += 1;
                on_event(e);
            }
            Ok(None) => break,
            Err(_) => {
                log::warn!(
                    "Stopped waiting for progress events after {}s",
                    DRAIN_TIMEOUT.as_secs()
                );
                break;
            }
        }
    }
    log::debug!("Handled {handled} progress event(s)");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_sent_before_return_are_all_handled() {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = async move {
            for i in 0..5 {
                tx.send(i).unwrap();
            }
            "done"
        };
        let mut seen = Vec::new();
        let result = run_with_events(task, rx, |e| seen.push(e)).await;
        assert_eq!(result, "done");
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn task_without_events_still_completes() {
        let (tx, rx) = mpsc::unbounded_channel::<u32>();
        drop(tx);
        let result = run_with_events(async { 42 }, rx, |_| {}).await;
        assert_eq!(result, 42);
    }
}
