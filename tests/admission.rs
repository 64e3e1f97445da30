use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jobvisor::{Dispatcher, Event, EventKind, HandlerError, HandlerFn};
use tokio::sync::{Barrier, broadcast};
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

/// Tracks how many handlers run at once.
#[derive(Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
    done: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
        self.done.fetch_add(1, Ordering::SeqCst);
    }
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn never_exceeds_concurrency_limit() {
    let gauge = Arc::new(Gauge::default());
    let g = Arc::clone(&gauge);
    let dispatcher = Dispatcher::new(
        HandlerFn::new(move |_n: u32| {
            let g = Arc::clone(&g);
            async move {
                g.enter();
                sleep(Duration::from_millis(10)).await;
                g.leave();
                Ok::<_, HandlerError>(())
            }
        }),
        3,
    );
    let mut rx = dispatcher.subscribe();

    for n in 0..20 {
        dispatcher.try_submit(n).unwrap();
    }
    timeout(WAIT, dispatcher.join()).await.expect("join timed out");
    dispatcher.shutdown().await;

    assert_eq!(gauge.done.load(Ordering::SeqCst), 20);
    let peak = gauge.peak.load(Ordering::SeqCst);
    assert!((1..=3).contains(&peak), "peak concurrency {peak}");

    let starts: Vec<_> = drain(&mut rx)
        .into_iter()
        .filter(|ev| ev.kind == EventKind::JobStarting)
        .collect();
    assert_eq!(starts.len(), 20);
    assert!(starts.iter().all(|ev| ev.active.unwrap() <= 3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn zero_limit_admits_everything_at_once() {
    const JOBS: usize = 16;
    let barrier = Arc::new(Barrier::new(JOBS));
    let b = Arc::clone(&barrier);
    let dispatcher = Dispatcher::new(
        HandlerFn::new(move |_n: usize| {
            let b = Arc::clone(&b);
            async move {
                // Only passes if every job runs concurrently.
                b.wait().await;
                Ok::<_, HandlerError>(())
            }
        }),
        0,
    );

    for n in 0..JOBS {
        dispatcher.try_submit(n).unwrap();
    }
    timeout(WAIT, dispatcher.join())
        .await
        .expect("jobs were not admitted concurrently");
    dispatcher.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn join_waits_for_slow_handlers() {
    let done = Arc::new(AtomicUsize::new(0));
    let d = Arc::clone(&done);
    let dispatcher = Dispatcher::new(
        HandlerFn::new(move |_n: u32| {
            let d = Arc::clone(&d);
            async move {
                sleep(Duration::from_millis(50)).await;
                d.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HandlerError>(())
            }
        }),
        2,
    );

    for n in 0..5 {
        dispatcher.try_submit(n).unwrap();
    }
    timeout(WAIT, dispatcher.join()).await.expect("join timed out");

    assert_eq!(done.load(Ordering::SeqCst), 5);
    let stats = dispatcher.stats();
    assert_eq!((stats.active, stats.pending, stats.outstanding), (0, 0, 0));
    dispatcher.shutdown().await;
}

#[tokio::test]
async fn join_returns_immediately_without_work() {
    let dispatcher = Dispatcher::new(
        HandlerFn::new(|_n: u32| async { Ok::<_, HandlerError>(()) }),
        1,
    );
    timeout(Duration::from_millis(200), dispatcher.join())
        .await
        .expect("idle join must not block");
    dispatcher.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn single_slot_starts_jobs_in_submission_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let o = Arc::clone(&order);
    let dispatcher = Dispatcher::new(
        HandlerFn::new(move |n: u32| {
            let o = Arc::clone(&o);
            async move {
                o.lock().unwrap().push(n);
                tokio::task::yield_now().await;
                Ok::<_, HandlerError>(())
            }
        }),
        1,
    );

    for n in 0..20 {
        dispatcher.try_submit(n).unwrap();
    }
    timeout(WAIT, dispatcher.join()).await.expect("join timed out");
    dispatcher.shutdown().await;

    assert_eq!(*order.lock().unwrap(), (0..20).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_producers_and_joiners() {
    let done = Arc::new(AtomicUsize::new(0));
    let d = Arc::clone(&done);
    let dispatcher = Dispatcher::new(
        HandlerFn::new(move |_n: usize| {
            let d = Arc::clone(&d);
            async move {
                sleep(Duration::from_millis(2)).await;
                d.fetch_add(1, Ordering::SeqCst);
                Ok::<_, HandlerError>(())
            }
        }),
        4,
    );

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                for n in 0..25 {
                    dispatcher.submit(p * 100 + n).await.unwrap();
                }
            })
        })
        .collect();
    for p in producers {
        p.await.unwrap();
    }

    let joiners: Vec<_> = (0..3)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move { dispatcher.join().await })
        })
        .collect();
    for j in joiners {
        timeout(WAIT, j).await.expect("join timed out").unwrap();
    }

    assert_eq!(done.load(Ordering::SeqCst), 100);
    dispatcher.shutdown().await;
}
