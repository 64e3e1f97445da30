//! # Pause / Resume Example
//!
//! Shows how admission control reacts to runtime commands.
//!
//! Demonstrates:
//! - Pausing admission while jobs are running
//! - `join` waiting across a pause
//! - Stopping with pending jobs (they are discarded)
//!
//! ## Run
//! ```bash
//! cargo run --example pause_resume --features logging
//! ```

use std::{sync::Arc, time::Duration};

use jobvisor::{
    Dispatcher, DispatcherBuilder, DispatcherConfig, HandlerError, HandlerFn, LogWriter, Subscribe,
};

fn make_dispatcher() -> Dispatcher<u32> {
    let cfg = DispatcherConfig {
        concurrency: 2,
        ..DispatcherConfig::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    DispatcherBuilder::new(cfg)
        .with_subscribers(subs)
        .build(HandlerFn::new(|n: u32| async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            println!(" ─► job payload {n} done");
            Ok::<_, HandlerError>(())
        }))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let dispatcher = make_dispatcher();

    // ============================================================
    // Demo 1: pause while two jobs are running
    // ============================================================
    for n in 0..6 {
        dispatcher.try_submit(n)?;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    dispatcher.pause();
    println!(" ─► paused: {:?}", dispatcher.stats());

    let joiner = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            dispatcher.join().await;
            println!(" ─► join returned");
        })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    println!(" ─► still paused: {:?}", dispatcher.stats());

    // ============================================================
    // Demo 2: resume and let join complete
    // ============================================================
    dispatcher.resume();
    joiner.await?;

    // ============================================================
    // Demo 3: stop with pending work
    // ============================================================
    for n in 10..16 {
        dispatcher.try_submit(n)?;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    dispatcher.stop();

    if let Err(e) = dispatcher.try_submit(99) {
        println!(" ─► rejected after stop: {e}");
    }

    dispatcher.shutdown().await;
    println!(" ─► final: {:?}", dispatcher.stats());
    Ok(())
}
