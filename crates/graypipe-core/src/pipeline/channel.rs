//! Bounded channels and the generic stage that sits between them.
//!
//! A stage pulls from one bounded channel, applies one operation, and pushes to
//! the next. Because every channel is bounded, a fast stage blocks on `send`
//! until its downstream catches up. When its input is exhausted a stage drops
//! its sender, which is how exhaustion propagates down the chain.

use std::fmt::Display;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::shutdown::ShutdownSignal;
use crate::types::StageStats;

/// A pipeline stage that processes items with backpressure.
pub struct PipelineStage<I, O> {
    name: &'static str,
    input: mpsc::Receiver<I>,
    output: mpsc::Sender<O>,
    shutdown: ShutdownSignal,
    terminal: bool,
}

impl<I, O> PipelineStage<I, O> {
    /// Create a new pipeline stage.
    pub fn new(
        name: &'static str,
        input: mpsc::Receiver<I>,
        output: mpsc::Sender<O>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            name,
            input,
            output,
            shutdown,
            terminal: false,
        }
    }

    /// Mark this as the last stage. A terminal stage always delivers the
    /// result of an operation that has already run, even after shutdown, so
    /// every completed side effect is reported.
    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Run the stage until its input is exhausted, its downstream is gone, or
    /// shutdown is requested.
    ///
    /// `f` is called once per item. `Ok` values are sent downstream; errors are
    /// logged and the item is dropped. Items are forwarded in the order they
    /// were received.
    pub async fn run<F, Fut, E>(mut self, f: F) -> StageStats
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = Result<O, E>>,
        E: Display,
    {
        let mut stats = StageStats::new(self.name);

        while let Some(item) = self.next().await {
            stats.received += 1;
            match f(item).await {
                Ok(result) => {
                    if !self.forward(result).await {
                        break;
                    }
                    stats.forwarded += 1;
                }
                Err(e) => {
                    stats.dropped += 1;
                    tracing::warn!("[{}] {}", self.name, e);
                }
            }
        }

        tracing::debug!(
            "Stage {} finished: {} received, {} forwarded, {} dropped",
            stats.stage,
            stats.received,
            stats.forwarded,
            stats.dropped
        );
        stats
    }

    /// Wait for the next input item. `None` on exhaustion or shutdown.
    async fn next(&mut self) -> Option<I> {
        tokio::select! {
            biased;
            _ = self.shutdown.triggered() => {
                tracing::debug!("Stage {} stopping on shutdown", self.name);
                None
            }
            item = self.input.recv() => item,
        }
    }

    /// Send one item downstream. `false` if downstream closed or, for
    /// non-terminal stages, shutdown was requested while waiting for capacity.
    async fn forward(&mut self, item: O) -> bool {
        if self.terminal {
            return self.output.send(item).await.is_ok();
        }
        tokio::select! {
            biased;
            _ = self.shutdown.triggered() => false,
            sent = self.output.send(item) => sent.is_ok(),
        }
    }
}

/// Spawn a stage as its own task, returning the receiving end of its output
/// channel and a handle yielding its stats.
pub fn spawn_stage<I, O, F, Fut, E>(
    name: &'static str,
    input: mpsc::Receiver<I>,
    capacity: usize,
    shutdown: ShutdownSignal,
    f: F,
) -> (mpsc::Receiver<O>, JoinHandle<StageStats>)
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut + Send + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    let stage = PipelineStage::new(name, input, tx, shutdown);
    (rx, tokio::spawn(stage.run(f)))
}

/// Like [`spawn_stage`], but the stage is [terminal](PipelineStage::terminal):
/// its output must be drained until closed.
pub fn spawn_terminal_stage<I, O, F, Fut, E>(
    name: &'static str,
    input: mpsc::Receiver<I>,
    capacity: usize,
    shutdown: ShutdownSignal,
    f: F,
) -> (mpsc::Receiver<O>, JoinHandle<StageStats>)
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut + Send + 'static,
    Fut: Future<Output = Result<O, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    let stage = PipelineStage::new(name, input, tx, shutdown).terminal();
    (rx, tokio::spawn(stage.run(f)))
}

/// Spawn a task that feeds `items` into a new bounded channel in order, then
/// closes it.
pub fn spawn_source<T>(
    items: Vec<T>,
    capacity: usize,
    mut shutdown: ShutdownSignal,
) -> (mpsc::Receiver<T>, JoinHandle<StageStats>)
where
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);
    let handle = tokio::spawn(async move {
        let mut stats = StageStats::new("source");
        for item in items {
            stats.received += 1;
            let sent = tokio::select! {
                biased;
                _ = shutdown.triggered() => false,
                sent = tx.send(item) => sent.is_ok(),
            };
            if !sent {
                break;
            }
            stats.forwarded += 1;
        }
        stats
    });
    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::shutdown::shutdown_channel;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_pipeline_stage() {
        let (input_tx, input_rx) = mpsc::channel::<i32>(10);
        let (output_tx, mut output_rx) = mpsc::channel::<i32>(10);

        let stage = PipelineStage::new("double", input_rx, output_tx, ShutdownSignal::never());
        let handle = tokio::spawn(stage.run(|x| async move { Ok::<_, String>(x * 2) }));

        input_tx.send(5).await.unwrap();
        input_tx.send(10).await.unwrap();
        drop(input_tx);

        assert_eq!(output_rx.recv().await, Some(10));
        assert_eq!(output_rx.recv().await, Some(20));
        assert_eq!(output_rx.recv().await, None);

        let stats = handle.await.unwrap();
        assert_eq!(stats.received, 2);
        assert_eq!(stats.forwarded, 2);
    }

    #[tokio::test]
    async fn test_stage_drops_failed_items() {
        let (source, _) = spawn_source(vec![1, 2, 3, 4], 1, ShutdownSignal::never());
        let (mut out, handle) = spawn_stage("even", source, 1, ShutdownSignal::never(), |x: i32| {
            async move {
                if x % 2 == 0 {
                    Ok(x)
                } else {
                    Err(format!("{x} is odd"))
                }
            }
        });

        let mut received = Vec::new();
        while let Some(x) = out.recv().await {
            received.push(x);
        }

        assert_eq!(received, vec![2, 4]);
        let stats = handle.await.unwrap();
        assert_eq!(stats.dropped, 2);
        assert_eq!(stats.forwarded, 2);
    }

    #[tokio::test]
    async fn test_empty_input_closes_chain() {
        let (source, _) = spawn_source(Vec::<u8>::new(), 1, ShutdownSignal::never());
        let (mid, _) = spawn_stage("a", source, 1, ShutdownSignal::never(), |x: u8| async move {
            Ok::<_, String>(x)
        });
        let (mut out, handle) = spawn_stage("b", mid, 1, ShutdownSignal::never(), |x: u8| {
            async move { Ok::<_, String>(x) }
        });

        let closed = tokio::time::timeout(Duration::from_secs(1), out.recv()).await;
        assert_eq!(closed.unwrap(), None);
        assert_eq!(handle.await.unwrap().received, 0);
    }

    #[tokio::test]
    async fn test_backpressure_bounds_source() {
        let items: Vec<i32> = (0..10).collect();
        let (mut source, handle) = spawn_source(items, 1, ShutdownSignal::never());

        // Nothing reads yet: the source can only get one item into the channel
        // plus one blocked in `send`.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());

        let mut count = 0;
        while source.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 10);
        assert_eq!(handle.await.unwrap().forwarded, 10);
    }

    #[tokio::test]
    async fn test_shutdown_stops_stage() {
        let (trigger, signal) = shutdown_channel();
        let (input_tx, input_rx) = mpsc::channel::<i32>(1);
        let (mut out, handle) = spawn_stage("idle", input_rx, 1, signal, |x: i32| async move {
            Ok::<_, String>(x)
        });

        trigger.trigger();

        let stats = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.received, 0);
        assert_eq!(out.recv().await, None);
        drop(input_tx);
    }

    #[tokio::test]
    async fn test_stages_overlap_in_time() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let slow = |in_flight: Arc<AtomicUsize>, peak: Arc<AtomicUsize>| {
            move |x: i32| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, String>(x)
                }
            }
        };

        let items: Vec<i32> = (0..6).collect();
        let (source, _) = spawn_source(items.clone(), 1, ShutdownSignal::never());
        let first = slow(in_flight.clone(), peak.clone());
        let (mid, _) = spawn_stage("first", source, 1, ShutdownSignal::never(), first);
        let second = slow(in_flight.clone(), peak.clone());
        let (mut out, _) = spawn_stage("second", mid, 1, ShutdownSignal::never(), second);

        let mut received = Vec::new();
        while let Some(x) = out.recv().await {
            received.push(x);
        }

        assert_eq!(received, items);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_terminal_stage_delivers_after_shutdown() {
        let (trigger, signal) = shutdown_channel();
        let (input_tx, input_rx) = mpsc::channel::<i32>(1);
        let (mut out, handle) = spawn_terminal_stage("last", input_rx, 1, signal, move |x: i32| {
            trigger.trigger();
            async move { Ok::<_, String>(x) }
        });

        input_tx.send(7).await.unwrap();

        assert_eq!(out.recv().await, Some(7));
        assert_eq!(out.recv().await, None);
        assert_eq!(handle.await.unwrap().forwarded, 1);
        drop(input_tx);
    }

    #[tokio::test]
    async fn test_inner_stage_discards_after_shutdown() {
        let (trigger, signal) = shutdown_channel();
        let (input_tx, input_rx) = mpsc::channel::<i32>(1);
        let (mut out, handle) = spawn_stage("inner", input_rx, 1, signal, move |x: i32| {
            trigger.trigger();
            async move { Ok::<_, String>(x) }
        });

        input_tx.send(7).await.unwrap();

        assert_eq!(out.recv().await, None);
        let stats = handle.await.unwrap();
        assert_eq!(stats.received, 1);
        assert_eq!(stats.forwarded, 0);
        drop(input_tx);
    }
}
