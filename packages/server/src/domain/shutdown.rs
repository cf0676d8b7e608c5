//! Process-wide shutdown notification.

use tokio::sync::watch;

/// Receiving side of the shutdown flag; `true` means stop.
pub type ShutdownReceiver = watch::Receiver<bool>;

/// Resolve once shutdown is requested or the sender is gone.
pub async fn wait_for_shutdown(mut shutdown: ShutdownReceiver) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
