// Streaming service - turns a panel's watch channel into a stream of updates
use crate::application::panel_controller::PanelState;
use futures::stream::Stream;
use tokio::sync::watch;

/// Yield the current state immediately, then once per change, until the
/// controller goes away. Intermediate states may be coalesced when the
/// consumer is slower than the panel.
pub fn state_stream<P, T>(
    mut rx: watch::Receiver<PanelState<P, T>>,
) -> impl Stream<Item = PanelState<P, T>>
where
    P: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    async_stream::stream! {
        let current = rx.borrow_and_update().clone();
        yield current;
        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().clone();
            yield next;
        }
    }
}
