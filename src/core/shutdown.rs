//! Process termination signals for [`Dispatcher::stop_on_signal`](crate::Dispatcher::stop_on_signal).

/// Completes on the first of `SIGINT`, `SIGTERM` or `SIGQUIT` (Ctrl-C outside unix).
///
/// Fails only if a signal handler cannot be installed.
pub(crate) async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut int = signal(SignalKind::interrupt())?;
        let mut term = signal(SignalKind::terminate())?;
        let mut quit = signal(SignalKind::quit())?;
        tokio::select! {
            _ = int.recv() => {}
            _ = term.recv() => {}
            _ = quit.recv() => {}
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
