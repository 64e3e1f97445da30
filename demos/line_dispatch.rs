//! # Line Dispatch Example
//!
//! Reads object keys (one per line) from a file or stdin and "copies" each of
//! them with bounded concurrency.
//!
//! Demonstrates:
//! - Feeding a line source into a dispatcher
//! - Concurrency and backlog limits from the command line
//! - Stopping on Ctrl-C / SIGTERM while active copies drain
//!
//! ## Run
//! ```bash
//! printf '/photos/a.jpg\nphotos/b.jpg\nfail/c.jpg\n' | \
//!     cargo run --example line_dispatch --features logging -- --concurrency 2
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};

use jobvisor::{
    DispatcherBuilder, DispatcherConfig, HandlerError, HandlerFn, LogWriter, Subscribe, sources,
};

/// Copy every key listed in the input, a few at a time.
#[derive(Parser, Debug)]
#[command(name = "line_dispatch", about)]
struct Cli {
    /// File with one key per line (reads stdin when omitted).
    #[arg(long)]
    paths: Option<PathBuf>,

    /// Maximum concurrent copies (`0` = unbounded).
    #[arg(long, default_value_t = default_concurrency())]
    concurrency: usize,

    /// Maximum keys read ahead of the running copies (`0` = unbounded).
    #[arg(long, default_value_t = 0)]
    backlog: usize,

    /// Simulated time per copy, in milliseconds.
    #[arg(long, default_value_t = 200)]
    work_ms: u64,

    /// Report each key as removed from the source after a successful copy.
    #[arg(long)]
    delete: bool,
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

async fn copy_object(key: &str, work: Duration) -> anyhow::Result<()> {
    tokio::time::sleep(work).await;
    if key.starts_with("fail/") {
        anyhow::bail!("source object is unreadable");
    }
    Ok(())
}

async fn open_input(paths: Option<&PathBuf>) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin>> {
    Ok(match paths {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let work = Duration::from_millis(cli.work_ms);
    let delete = cli.delete;

    let cfg = DispatcherConfig {
        concurrency: cli.concurrency,
        backlog: cli.backlog,
        ..DispatcherConfig::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    let dispatcher = DispatcherBuilder::new(cfg)
        .with_subscribers(subs)
        .build(HandlerFn::new(move |key: String| async move {
            copy_object(&key, work)
                .await
                .with_context(|| format!("copy {key}"))?;
            println!(" ─► {key}: complete");
            if delete {
                println!(" ─► {key}: removed from source");
            }
            Ok::<_, HandlerError>(())
        }));
    dispatcher.stop_on_signal();

    let input = open_input(cli.paths.as_ref()).await?;
    match sources::feed_lines(input, &dispatcher).await {
        Ok(fed) => println!(" ─► queued {fed} keys"),
        Err(e) => eprintln!(" ─► feed ended early ({}): {e}", e.as_label()),
    }

    dispatcher.join().await;
    dispatcher.shutdown().await;
    Ok(())
}
