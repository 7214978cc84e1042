//! Section fetch orchestration: on-demand fetches with in-flight de-duplication,
//! plus an eager, staggered prefetch of the whole outline.

pub mod schedule;

pub use schedule::PrefetchSchedule;

use crate::config::PrefetchPolicy;
use crate::event::AppEvent;
use crate::provider::ContentService;
use crate::report::{Outline, SessionState};
use std::sync::mpsc;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Issues at most one provider request per section id at a time.
#[derive(Clone)]
pub struct SectionFetcher {
    outline: Outline,
    state: Arc<SessionState>,
    service: ContentService,
    tx: mpsc::Sender<AppEvent>,
    runtime: Handle,
}

impl SectionFetcher {
    /// Starts a fetch for `id` unless it is cached, in flight, or not in the outline.
    /// Returns the fetch task when one was started.
    pub fn request_section(&self, id: &str) -> Option<JoinHandle<()>> {
        let Some(item) = self.outline.get(id).cloned() else {
            warn!(section = id, "ignoring request for unknown section");
            return None;
        };
        let guard = self.state.try_begin(id)?;
        debug!(section = id, "fetching section");

        let service = self.service.clone();
        let tx = self.tx.clone();
        Some(self.runtime.spawn(async move {
            let content = service.generate(&item.title, &item.sub_items).await;
            let id = guard.id().to_string();
            if content.fallback {
                guard.fail(content);
                warn!(section = %id, "section left unresolved after failed fetch");
                let _ = tx.send(AppEvent::SectionFailed { id });
            } else {
                guard.resolve(content);
                info!(section = %id, "section resolved");
                let _ = tx.send(AppEvent::SectionResolved { id });
            }
        }))
    }
}

pub struct FetchCoordinator {
    fetcher: SectionFetcher,
    policy: PrefetchPolicy,
    schedule: PrefetchSchedule,
}

impl FetchCoordinator {
    pub fn new(
        outline: Outline,
        state: Arc<SessionState>,
        service: ContentService,
        tx: mpsc::Sender<AppEvent>,
        runtime: Handle,
        policy: PrefetchPolicy,
    ) -> Self {
        Self {
            fetcher: SectionFetcher {
                outline,
                state,
                service,
                tx,
                runtime,
            },
            policy,
            schedule: PrefetchSchedule::new(),
        }
    }

    /// Fetches the first section now and schedules the rest at staggered delays.
    pub fn start(&mut self) {
        let items = self.fetcher.outline.items().to_vec();
        for (index, item) in items.iter().enumerate() {
            match self.policy.delay_for(index) {
                None => {
                    self.fetcher.request_section(&item.id);
                }
                Some(delay) => {
                    let fetcher = self.fetcher.clone();
                    let id = item.id.clone();
                    self.schedule
                        .schedule(&self.fetcher.runtime, delay, move || {
                            fetcher.request_section(&id);
                        });
                }
            }
        }
        info!(
            sections = items.len(),
            scheduled = self.schedule.pending(),
            "prefetch schedule started"
        );
    }

    /// Manual navigation: fetch immediately if neither cached nor in flight.
    pub fn request_section(&self, id: &str) -> Option<JoinHandle<()>> {
        self.fetcher.request_section(id)
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.fetcher.state
    }

    pub fn shutdown(&mut self) {
        self.schedule.cancel_all();
    }
}
