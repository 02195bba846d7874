use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use slotgate::{Admission, EventKind, GateConfig, Priority, PriorityGate, WaitQueue};

#[test]
fn wait_queue_extracts_highest_first() {
    let mut q = WaitQueue::new();
    for p in [0, 2, 4] {
        q.insert(Priority::new(p), ());
    }

    let order: Vec<i32> = std::iter::from_fn(|| q.pop())
        .map(|w| w.priority().get())
        .collect();
    assert_eq!(order, vec![4, 2, 0]);
    assert!(q.pop().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn occupancy_never_exceeds_capacity_without_evictions() -> anyhow::Result<()> {
    let gate = PriorityGate::new(GateConfig::new(3).with_aging(Duration::from_millis(1)))?;
    let token = CancellationToken::new();
    let inside = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for i in 0..40 {
        let gate = Arc::clone(&gate);
        let token = token.clone();
        let inside = Arc::clone(&inside);
        let peak = Arc::clone(&peak);
        handles.push(tokio::spawn(async move {
            let priority = Priority::new(i % 4 + 1);
            gate.run(priority, &token, move || async move {
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(())
            })
            .await
        }));
    }

    for h in handles {
        h.await??;
    }

    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(gate.count(), 0);
    assert_eq!(gate.waiting(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn timed_out_waiters_are_balanced_by_finish() -> anyhow::Result<()> {
    let gate = PriorityGate::new(GateConfig::new(1).with_timeout(Duration::from_millis(50)))?;
    let token = CancellationToken::new();
    let mut events = gate.subscribe();

    let held = gate.acquire(Priority::HIGH, &token).await;
    let late = gate.acquire(Priority::LOW, &token).await;
    assert_eq!(late.admission(), Admission::TimedOut);
    assert!(late.admission().is_evicted());
    assert_eq!(gate.count(), 2);

    drop(late);
    drop(held);
    assert_eq!(gate.count(), 0);

    let evictions = std::iter::from_fn(|| events.try_recv().ok())
        .filter(|ev| ev.is_eviction())
        .count();
    assert_eq!(evictions, 1);
    Ok(())
}

#[tokio::test]
async fn cancelled_waiter_leaves_others_queued() -> anyhow::Result<()> {
    let gate = PriorityGate::new(GateConfig::new(1))?;
    let shared = CancellationToken::new();
    let _held = gate.acquire(Priority::LOW, &shared).await;

    let own = CancellationToken::new();
    let g = Arc::clone(&gate);
    let o = own.clone();
    let cancelled = tokio::spawn(async move { g.wait(Priority::HIGH, &o).await });

    let g = Arc::clone(&gate);
    let s = shared.clone();
    let patient = tokio::spawn(async move { g.wait(Priority::LOW, &s).await });

    while gate.waiting() < 2 {
        tokio::task::yield_now().await;
    }
    own.cancel();
    assert_eq!(cancelled.await?, Admission::Cancelled);
    assert_eq!(gate.waiting(), 1);
    assert_eq!(gate.queued_priorities(), vec![Priority::LOW]);

    let mut rx = gate.subscribe();
    gate.finish();
    gate.finish();
    assert_eq!(patient.await?, Admission::Granted);
    assert_eq!(rx.recv().await?.kind, EventKind::Released);
    Ok(())
}
