//! # Line-oriented work source.
//!
//! Feeds every line of an async reader into a `Dispatcher<String>`, one job per line.
//!
//! ## Normalization
//! - a single leading `/` is stripped (`/bucket/key` and `bucket/key` name the same object)
//! - empty lines (after normalization) are skipped
//! - line terminators (`\n`, `\r\n`) are removed by the reader

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{Dispatcher, error::FeedError};

/// Reads `reader` to the end, submitting each non-empty line.
///
/// Uses [`Dispatcher::submit`], so a bounded backlog throttles the reader.
/// Returns the number of submitted jobs; stops at the first read or submit error.
///
/// ## Example
/// ```rust
/// use jobvisor::{Dispatcher, HandlerError, HandlerFn, sources};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let dispatcher = Dispatcher::new(HandlerFn::new(|_key: String| async { Ok::<_, HandlerError>(()) }), 2);
///
///     let fed = sources::feed_lines(&b"/photos/a.jpg\nphotos/b.jpg\n"[..], &dispatcher).await?;
///     assert_eq!(fed, 2);
///
///     dispatcher.join().await;
///     dispatcher.shutdown().await;
///     Ok(())
/// }
/// ```
pub async fn feed_lines<R>(reader: R, dispatcher: &Dispatcher<String>) -> Result<usize, FeedError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut fed = 0;

    while let Some(line) = lines.next_line().await? {
        let Some(key) = normalize(&line) else {
            continue;
        };
        dispatcher.submit(key.to_string()).await?;
        fed += 1;
    }
    Ok(fed)
}

fn normalize(line: &str) -> Option<&str> {
    let key = line.strip_prefix('/').unwrap_or(line);
    if key.is_empty() { None } else { Some(key) }
}
