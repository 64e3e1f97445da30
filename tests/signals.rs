//! Lives in its own test binary: the signal is delivered to the whole process.
#![cfg(unix)]

use std::time::Duration;

use jobvisor::{Dispatcher, EventKind, HandlerError, HandlerFn, SubmitError};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn sigterm_stops_a_watching_dispatcher() {
    let dispatcher = Dispatcher::new(
        HandlerFn::new(|_n: u32| async { Ok::<_, HandlerError>(()) }),
        1,
    );
    let mut rx = dispatcher.subscribe();
    dispatcher.stop_on_signal();

    // The watcher installs its handlers on first poll; until then SIGTERM
    // would kill the test process.
    sleep(Duration::from_millis(200)).await;
    assert!(!dispatcher.is_terminated());

    kill(Pid::this(), Signal::SIGTERM).unwrap();
    timeout(WAIT, async {
        while !dispatcher.is_terminated() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("signal did not stop the dispatcher");

    assert_eq!(dispatcher.try_submit(1), Err(SubmitError::Stopped));

    let mut kinds = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        kinds.push(ev.kind);
    }
    assert!(kinds.contains(&EventKind::StopRequested));
    assert_eq!(kinds.last(), Some(&EventKind::Stopped));
}
