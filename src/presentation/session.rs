use crate::annotations::image_ref::ImageRef;
use crate::error::DetectionFailure;
use crate::geometry::layout::Viewport;
use crate::object_detection::client::DetectionClient;
use crate::presentation::state::PresentationState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// What a call to [`DetectionSession::run`] did to the displayed state.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The run's result is now the displayed state.
    Displayed(Arc<PresentationState>),
    /// The detector found nothing usable; the displayed state was cleared.
    NoDetection(DetectionFailure),
    /// A later run was triggered while this one was in flight; its result was discarded.
    Superseded,
}

/// Owns the displayed [`PresentationState`] and drives detection runs against it.
///
/// Runs may overlap. Each run takes a generation number when it starts and may only commit
/// if no newer run has started since, so the last trigger wins.
pub struct DetectionSession {
    client: DetectionClient,
    viewport: Viewport,
    state: RwLock<Arc<PresentationState>>,
    latest_run: AtomicU64,
}

impl DetectionSession {
    pub fn new(client: DetectionClient, viewport: Viewport) -> Self {
        Self {
            client,
            viewport,
            state: RwLock::new(Arc::new(PresentationState::default())),
            latest_run: AtomicU64::new(0),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The currently displayed state.
    pub fn snapshot(&self) -> Arc<PresentationState> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state)
    }

    pub async fn run(&self, image: ImageRef) -> RunOutcome {
        let generation = self.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, uri = image.uri(), "detection run started");

        match self.client.detect(&image).await {
            Ok(result) => {
                let next = Arc::new(PresentationState::from_detection(
                    image,
                    &result,
                    &self.viewport,
                ));
                if !self.commit(generation, Arc::clone(&next)) {
                    return RunOutcome::Superseded;
                }
                info!(
                    generation,
                    objects = next.detections.len(),
                    latency_seconds = next.latency_seconds,
                    "detections displayed"
                );
                RunOutcome::Displayed(next)
            }
            Err(failure) => {
                let cleared = Arc::new(PresentationState::cleared(failure.elapsed_seconds));
                if !self.commit(generation, cleared) {
                    return RunOutcome::Superseded;
                }
                info!(generation, "{}", DetectionFailure::USER_MESSAGE);
                RunOutcome::NoDetection(failure)
            }
        }
    }

    fn commit(&self, generation: u64, next: Arc<PresentationState>) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if self.latest_run.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding superseded detection run");
            return false;
        }
        *state = next;
        true
    }
}
