use crate::view::state::{Analysis, AnalysisView, Trigger, ViewState};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};

const COMMAND_BUFFER: usize = 16;

/// The simulated "analyzing" wait.
#[async_trait::async_trait]
pub trait Delay: Send + Sync {
    async fn elapse(&self);
}

#[derive(Debug, Clone)]
pub struct TokioDelay {
    duration: Duration,
}

impl TokioDelay {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait::async_trait]
impl Delay for TokioDelay {
    async fn elapse(&self) {
        tokio::time::sleep(self.duration).await;
    }
}

#[derive(Debug)]
enum Command {
    Trigger { reply: oneshot::Sender<Trigger> },
}

type Pending = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Owns the [`AnalysisView`] on a single task and publishes every state change.
pub struct ViewDriver {
    view: AnalysisView,
    delay: Arc<dyn Delay>,
    commands: mpsc::Receiver<Command>,
    states: watch::Sender<ViewState>,
}

impl ViewDriver {
    pub fn spawn(view: AnalysisView, delay: Arc<dyn Delay>) -> ViewHandle {
        let (command_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (states, state_rx) = watch::channel(view.state().clone());

        let driver = Self {
            view,
            delay,
            commands,
            states,
        };
        tokio::spawn(driver.run());

        ViewHandle {
            commands: command_tx,
            states: state_rx,
        }
    }

    async fn run(mut self) {
        let mut pending: Option<Pending> = None;

        loop {
            tokio::select! {
                cmd = self.commands.recv() => {
                    let Some(Command::Trigger { reply }) = cmd else {
                        break;
                    };
                    let outcome = self.view.trigger();
                    if outcome == Trigger::Started {
                        let delay = Arc::clone(&self.delay);
                        pending = Some(Box::pin(async move { delay.elapse().await }));
                        self.publish();
                        tracing::info!("analysis started");
                    } else {
                        tracing::debug!("trigger ignored; analysis already running");
                    }
                    let _ = reply.send(outcome);
                }
                _ = wait_pending(&mut pending), if pending.is_some() => {
                    pending = None;
                    if self.view.complete() {
                        self.publish();
                        if let Some(analysis) = self.view.state().analysis() {
                            tracing::info!(
                                run_id = %analysis.run_id,
                                picks = analysis.picks.len(),
                                best_pick = analysis.best_pick().map(|s| s.symbol.as_str()).unwrap_or("-"),
                                "analysis completed"
                            );
                        }
                    }
                }
            }
        }

        tracing::debug!("view driver stopped");
    }

    fn publish(&self) {
        self.states.send_replace(self.view.state().clone());
    }
}

async fn wait_pending(pending: &mut Option<Pending>) {
    match pending.as_mut() {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

/// Caller-facing side of the driver. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ViewHandle {
    commands: mpsc::Sender<Command>,
    states: watch::Receiver<ViewState>,
}

impl ViewHandle {
    /// Requests a run. The `Loading` state is already published when this returns `Started`.
    pub async fn trigger(&self) -> anyhow::Result<Trigger> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Trigger { reply })
            .await
            .map_err(|_| anyhow::anyhow!("view driver is not running"))?;
        rx.await
            .map_err(|_| anyhow::anyhow!("view driver dropped trigger reply"))
    }

    pub fn state(&self) -> ViewState {
        self.states.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.states.clone()
    }

    /// Waits until the view holds an analysis. Returns immediately if it already does.
    pub async fn wait_analyzed(&self) -> anyhow::Result<Analysis> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|s| s.analysis().is_some())
            .await
            .map_err(|_| anyhow::anyhow!("view driver stopped before analysis completed"))?;
        state
            .analysis()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("view is not analyzed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Notify;

    /// Completes only when the test opens the gate.
    struct GateDelay {
        gate: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl Delay for GateDelay {
        async fn elapse(&self) {
            self.gate.notified().await;
        }
    }

    fn gated() -> (ViewHandle, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let handle = ViewDriver::spawn(
            AnalysisView::reference(),
            Arc::new(GateDelay {
                gate: Arc::clone(&gate),
            }),
        );
        (handle, gate)
    }

    fn symbols(analysis: &Analysis) -> Vec<&str> {
        analysis.picks.iter().map(|s| s.symbol.as_str()).collect()
    }

    #[test]
    fn command_debug_names_the_variant() {
        let (reply, _rx) = oneshot::channel();
        let debug = format!("{:?}", Command::Trigger { reply });
        assert!(debug.starts_with("Trigger"));
    }

    #[tokio::test]
    async fn trigger_publishes_loading_before_analyzed() {
        let (handle, gate) = gated();
        assert_eq!(handle.state(), ViewState::Idle);

        assert_eq!(handle.trigger().await.unwrap(), Trigger::Started);
        assert_eq!(handle.state(), ViewState::Loading);

        gate.notify_one();
        let analysis = handle.wait_analyzed().await.unwrap();
        assert_eq!(symbols(&analysis), ["YESBANK", "SUZLON", "TATASTLBSL", "RPOWER"]);
    }

    #[tokio::test]
    async fn triggers_while_loading_are_ignored_not_queued() {
        let (handle, gate) = gated();
        handle.trigger().await.unwrap();
        assert_eq!(handle.trigger().await.unwrap(), Trigger::Ignored);
        assert_eq!(handle.trigger().await.unwrap(), Trigger::Ignored);

        gate.notify_one();
        handle.wait_analyzed().await.unwrap();

        // Nothing was queued behind the completed run.
        tokio::task::yield_now().await;
        assert!(handle.state().analysis().is_some());
    }

    #[tokio::test]
    async fn never_skips_loading() {
        let (handle, gate) = gated();
        let mut rx = handle.subscribe();

        handle.trigger().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());

        gate.notify_one();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().analysis().is_some());
    }

    #[tokio::test]
    async fn refresh_produces_equivalent_analysis() {
        let (handle, gate) = gated();
        handle.trigger().await.unwrap();
        gate.notify_one();
        let first = handle.wait_analyzed().await.unwrap();

        assert_eq!(handle.trigger().await.unwrap(), Trigger::Started);
        assert!(handle.state().is_loading());
        gate.notify_one();
        let second = handle.wait_analyzed().await.unwrap();

        assert_eq!(first.picks, second.picks);
        assert_ne!(first.run_id, second.run_id);
    }

    #[tokio::test]
    async fn tokio_delay_completes_after_duration() {
        let handle = ViewDriver::spawn(
            AnalysisView::reference(),
            Arc::new(TokioDelay::new(Duration::from_millis(20))),
        );
        handle.trigger().await.unwrap();
        assert!(handle.state().is_loading());

        let analysis = tokio::time::timeout(Duration::from_secs(5), handle.wait_analyzed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(analysis.best_pick().unwrap().symbol, "YESBANK");
    }
}
