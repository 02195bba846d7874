use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::{
    config::GateConfig,
    error::GateError,
    events::Event,
    subscribers::{Subscribe, SubscriberSet},
};

use super::{core::PriorityGate, fifo::FifoGate};

/// Builder for constructing a gate with optional subscribers.
pub struct GateBuilder {
    cfg: GateConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl GateBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: GateConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive gate events (admissions, grants, evictions, aging)
    /// through dedicated workers with bounded queues. With at least one
    /// subscriber, `build` must be called from within a tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds a priority gate.
    ///
    /// Fails with [`GateError::ZeroCapacity`] if the configuration allows no admissions.
    pub fn build(self) -> Result<Arc<PriorityGate>, GateError> {
        self.cfg.validate()?;

        let (events, _) = broadcast::channel(self.cfg.bus_capacity_clamped());
        let shutdown = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let subs = SubscriberSet::spawn(self.subscribers);
            spawn_listener(events.clone(), subs, shutdown.clone());
        }

        Ok(Arc::new(PriorityGate::from_parts(self.cfg, events, shutdown)))
    }

    /// Builds a FIFO gate.
    ///
    /// Fails with [`GateError::AgingUnsupported`] if the configuration enables aging.
    pub fn build_fifo(self) -> Result<FifoGate, GateError> {
        if let Some(interval) = self.cfg.aging_period() {
            return Err(GateError::AgingUnsupported { interval });
        }
        self.build().map(FifoGate::from_gate)
    }
}

/// Feeds gate events to subscribers until the gate is dropped.
///
/// Overflow and panic reports from the subscriber workers go back onto the
/// gate's channel. Events still buffered at shutdown are delivered before the
/// workers are closed.
fn spawn_listener(
    events: broadcast::Sender<Event>,
    mut subs: SubscriberSet,
    token: CancellationToken,
) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                Some(report) = subs.next_report() => {
                    let _ = events.send(report);
                }
                msg = rx.recv() => match msg {
                    Ok(ev) => {
                        subs.emit(ev);
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }

        while let Ok(ev) = rx.try_recv() {
            subs.emit(ev);
        }
        subs.close().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    use crate::{events::EventKind, priority::Priority};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().await.push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_gate_events() {
        let rec = Arc::new(Recorder::default());
        let gate = GateBuilder::new(GateConfig::new(1))
            .with_subscribers(vec![rec.clone()])
            .build()
            .expect("valid config");
        let token = CancellationToken::new();

        gate.wait(Priority::HIGH, &token).await;
        gate.finish();

        for _ in 0..64 {
            if rec.0.lock().await.len() >= 2 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(
            *rec.0.lock().await,
            vec![EventKind::Admitted, EventKind::Released]
        );
    }

    struct Exploder;

    #[async_trait]
    impl Subscribe for Exploder {
        async fn on_event(&self, _ev: &Event) {
            panic!("subscriber exploded");
        }
        fn name(&self) -> &'static str {
            "exploder"
        }
    }

    #[tokio::test]
    async fn test_subscriber_panics_are_republished_on_the_gate() {
        let gate = GateBuilder::new(GateConfig::new(1))
            .with_subscribers(vec![Arc::new(Exploder)])
            .build()
            .expect("valid config");
        let mut rx = gate.subscribe();
        let token = CancellationToken::new();

        gate.wait(Priority::LOW, &token).await;

        let report = tokio::time::timeout(std::time::Duration::from_secs(1), async {
            loop {
                match rx.recv().await {
                    Ok(ev) if ev.kind == EventKind::SubscriberPanicked => break ev,
                    Ok(_) => continue,
                    Err(e) => panic!("gate channel failed: {e}"),
                }
            }
        })
        .await
        .expect("panic report in time");

        assert_eq!(report.source.as_deref(), Some("exploder"));
        assert_eq!(report.reason.as_deref(), Some("subscriber exploded"));
    }

    #[test]
    fn test_build_without_subscribers_needs_no_runtime() {
        let gate = GateBuilder::new(GateConfig::new(4)).build().expect("valid config");
        assert_eq!(gate.capacity(), 4);
        assert_eq!(gate.count(), 0);
    }
}
