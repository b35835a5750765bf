// Panel data controller - fetch/refresh/error lifecycle for one panel
use crate::application::panel_source::PanelSource;
use crate::application::polling::PollingTask;
use crate::domain::snapshot::Snapshot;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::AbortHandle;

/// Everything a panel publishes: the current parameter, the generation that
/// parameter was started under, and the latest snapshot.
///
/// The generation is bumped on every (re)start. A completion only lands if
/// its generation still matches, and the check happens inside the watch
/// channel's write lock, so a superseded response can never overwrite a newer
/// one regardless of arrival order.
#[derive(Debug, Clone)]
pub struct PanelState<P, T> {
    generation: u64,
    param: Option<P>,
    snapshot: Snapshot<T>,
}

impl<P, T> PanelState<P, T> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn param(&self) -> Option<&P> {
        self.param.as_ref()
    }

    pub fn snapshot(&self) -> &Snapshot<T> {
        &self.snapshot
    }
}

/// A retrieve request tagged with the generation it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket<P> {
    generation: u64,
    param: P,
}

#[cfg(test)]
impl<P> Ticket<P> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn param(&self) -> &P {
        &self.param
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshOutcome {
    /// The result replaced the snapshot.
    Applied,
    /// The parameter moved on while the request was in flight.
    Discarded,
    /// Another request for this panel is still in flight.
    Busy,
    /// The panel is not mounted.
    Idle,
}

type DynSource<P, T> = Arc<dyn PanelSource<Param = P, Payload = T>>;

struct Shared<P, T> {
    source: DynSource<P, T>,
    state: watch::Sender<PanelState<P, T>>,
    in_flight: Mutex<()>,
}

impl<P, T> Shared<P, T>
where
    P: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn ticket(&self) -> Option<Ticket<P>> {
        let state = self.state.borrow();
        state.param.clone().map(|param| Ticket {
            generation: state.generation,
            param,
        })
    }

    async fn retrieve(&self, ticket: &Ticket<P>) -> RefreshOutcome {
        let name = self.source.name();
        let result = self.source.retrieve(&ticket.param).await;
        if let Err(e) = &result {
            tracing::warn!(panel = name, param = ?ticket.param, error = %e, "panel refresh failed");
        }

        let snapshot = Snapshot::from_result(result, self.source.origin());
        let applied = self.state.send_if_modified(|state| {
            if state.generation != ticket.generation {
                return false;
            }
            state.snapshot = snapshot;
            true
        });

        if applied {
            RefreshOutcome::Applied
        } else {
            tracing::debug!(
                panel = name,
                stale_generation = ticket.generation,
                "discarding response for superseded parameter"
            );
            RefreshOutcome::Discarded
        }
    }

    /// Waits for any in-flight request to finish first.
    async fn retrieve_exclusive(&self, ticket: &Ticket<P>) -> RefreshOutcome {
        let _guard = self.in_flight.lock().await;
        self.retrieve(ticket).await
    }

    /// Skips the cycle if a request is already in flight.
    async fn try_retrieve(&self, ticket: &Ticket<P>) -> RefreshOutcome {
        match self.in_flight.try_lock() {
            Ok(_guard) => self.retrieve(ticket).await,
            Err(_) => RefreshOutcome::Busy,
        }
    }
}

/// Work in flight on behalf of a mounted panel. Everything in here is
/// aborted on restart and on unmount.
#[derive(Default)]
struct Tasks {
    polling: Option<PollingTask>,
    manual: Vec<AbortHandle>,
}

impl Tasks {
    fn abort_all(&mut self) {
        if let Some(polling) = self.polling.take() {
            polling.cancel();
        }
        for handle in self.manual.drain(..) {
            handle.abort();
        }
    }
}

pub struct PanelController<P, T> {
    shared: Arc<Shared<P, T>>,
    refresh_every: Option<Duration>,
    tasks: Mutex<Tasks>,
}

impl<P, T> PanelController<P, T>
where
    P: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// `refresh_every: None` means the panel only fetches when started or
    /// when its parameter changes.
    pub fn new(source: DynSource<P, T>, refresh_every: Option<Duration>) -> Self {
        let (state, _) = watch::channel(PanelState {
            generation: 0,
            param: None,
            snapshot: Snapshot::loading(source.origin()),
        });

        Self {
            shared: Arc::new(Shared {
                source,
                state,
                in_flight: Mutex::new(()),
            }),
            refresh_every,
            tasks: Mutex::new(Tasks::default()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.shared.source.name()
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.shared.state.borrow().snapshot.clone()
    }

    pub fn state(&self) -> PanelState<P, T> {
        self.shared.state.borrow().clone()
    }

    pub fn param(&self) -> Option<P> {
        self.shared.state.borrow().param.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PanelState<P, T>> {
        self.shared.state.subscribe()
    }

    /// Ticket for the current parameter and generation, if started.
    pub fn ticket(&self) -> Option<Ticket<P>> {
        self.shared.ticket()
    }

    pub async fn is_running(&self) -> bool {
        self.tasks.lock().await.polling.is_some()
    }

    /// Begin polling `param`. Returns false when the panel is already running
    /// on that same parameter.
    pub async fn start(&self, param: P) -> bool {
        let mut tasks = self.tasks.lock().await;
        if tasks.polling.is_some() && self.shared.state.borrow().param.as_ref() == Some(&param) {
            return false;
        }
        self.launch(&mut tasks, param);
        true
    }

    /// Cancel whatever is running and restart on `param`.
    pub async fn on_parameter_change(&self, param: P) {
        let mut tasks = self.tasks.lock().await;
        self.launch(&mut tasks, param);
    }

    /// Silent refresh with the current parameter. Never shows Loading.
    ///
    /// The request runs on its own task so that a restart or unmount can
    /// abort it; an aborted tick reports `Discarded`.
    pub async fn tick(&self) -> RefreshOutcome {
        let handle = {
            let mut tasks = self.tasks.lock().await;
            if tasks.polling.is_none() {
                return RefreshOutcome::Idle;
            }
            let Some(ticket) = self.ticket() else {
                return RefreshOutcome::Idle;
            };
            let shared = self.shared.clone();
            let handle = tokio::spawn(async move { shared.try_retrieve(&ticket).await });
            tasks.manual.retain(|h| !h.is_finished());
            tasks.manual.push(handle.abort_handle());
            handle
        };

        match handle.await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::debug!(panel = self.name(), "manual refresh aborted");
                RefreshOutcome::Discarded
            }
        }
    }

    /// One request cycle for `ticket`; the result is dropped if the ticket is stale.
    #[cfg(test)]
    pub async fn retrieve(&self, ticket: &Ticket<P>) -> RefreshOutcome {
        self.shared.retrieve_exclusive(ticket).await
    }

    /// Unmount: cancel the polling task and any request it is awaiting.
    pub async fn stop(&self) {
        let mut tasks = self.tasks.lock().await;
        let was_running = tasks.polling.is_some();
        tasks.abort_all();
        // Anything that slipped past the abort must not land on an unmounted panel.
        self.shared.state.send_if_modified(|state| {
            state.generation += 1;
            false
        });
        if was_running {
            tracing::debug!(panel = self.name(), "panel polling stopped");
        }
    }

    fn launch(&self, tasks: &mut Tasks, param: P) {
        tasks.abort_all();

        let origin = self.shared.source.origin();
        let mut generation = 0;
        self.shared.state.send_modify(|state| {
            state.generation += 1;
            state.param = Some(param.clone());
            state.snapshot = Snapshot::loading(origin);
            generation = state.generation;
        });

        tracing::info!(
            panel = self.name(),
            generation,
            param = ?param,
            every = ?self.refresh_every,
            "panel polling started"
        );

        let ticket = Ticket { generation, param };
        let initial = {
            let shared = self.shared.clone();
            let ticket = ticket.clone();
            async move {
                shared.retrieve_exclusive(&ticket).await;
            }
        };
        let shared = self.shared.clone();
        let tick = move || {
            let shared = shared.clone();
            let ticket = ticket.clone();
            async move {
                shared.try_retrieve(&ticket).await;
            }
        };

        tasks.polling = Some(PollingTask::spawn(self.refresh_every, initial, tick));
    }
}
