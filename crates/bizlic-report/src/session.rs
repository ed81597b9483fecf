//! # Interactive Session
//!
//! Binds a [`ReportFetcher`] to a [`ReportView`], and a [`QuestionSource`]
//! to an [`AnswerView`]. Each panel allows one request in flight: a second
//! call issued while the first is pending returns [`Outcome::Ignored`]
//! without touching the store, the service or the view.
//!
//! View locks are never held across an await.

use std::sync::atomic::{AtomicBool, Ordering};

use bizlic_client::{QuestionSource, ReportSource, ServiceError};
use bizlic_core::IntakePayload;
use bizlic_store::ReportStore;
use parking_lot::{Mutex, MutexGuard};

use crate::fetcher::{Provenance, ReportFetcher};
use crate::presenter::{present_answer, transform, AnswerModel, PresentationModel};
use crate::view::{AnswerView, ReportView};

/// Result of a user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    /// Another request on the same panel was still pending.
    Ignored,
}

impl<T> Outcome<T> {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Ignored => None,
        }
    }
}

/// What a completed report action rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub model: PresentationModel,
    pub provenance: Provenance,
}

/// Held while a request is pending; releases the flag on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Report panel.
pub struct ReportSession<S, R, V> {
    fetcher: ReportFetcher<S, R>,
    view: Mutex<V>,
    in_flight: AtomicBool,
}

impl<S, R, V> ReportSession<S, R, V>
where
    S: ReportStore,
    R: ReportSource,
    V: ReportView,
{
    pub fn new(fetcher: ReportFetcher<S, R>, view: V) -> Self {
        Self {
            fetcher,
            view: Mutex::new(view),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn fetcher(&self) -> &ReportFetcher<S, R> {
        &self.fetcher
    }

    pub fn view(&self) -> MutexGuard<'_, V> {
        self.view.lock()
    }

    pub fn into_view(self) -> V {
        self.view.into_inner()
    }

    /// Show the report for `payload`, from cache when possible.
    pub async fn open(
        &self,
        payload: &IntakePayload,
    ) -> Result<Outcome<Rendered>, ServiceError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("report request already in flight; ignoring open");
            return Ok(Outcome::Ignored);
        };
        self.load(payload, false).await.map(Outcome::Completed)
    }

    /// Generate a new report for `payload`, bypassing the cache.
    pub async fn refresh(
        &self,
        payload: &IntakePayload,
    ) -> Result<Outcome<Rendered>, ServiceError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("report request already in flight; ignoring refresh");
            return Ok(Outcome::Ignored);
        };
        self.load(payload, true).await.map(Outcome::Completed)
    }

    /// Drop the cached report and generate a new one.
    pub async fn regenerate(
        &self,
        payload: &IntakePayload,
    ) -> Result<Outcome<Rendered>, ServiceError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("report request already in flight; ignoring regenerate");
            return Ok(Outcome::Ignored);
        };
        if let Err(e) = self.fetcher.clear() {
            tracing::warn!(error = %e, "failed to clear cached report before regeneration");
        }
        self.load(payload, true).await.map(Outcome::Completed)
    }

    async fn load(&self, payload: &IntakePayload, force_refresh: bool) -> Result<Rendered, ServiceError> {
        self.view.lock().show_loading();
        match self.fetcher.load(payload, force_refresh).await {
            Ok(loaded) => {
                let model = transform(&loaded.report);
                self.view.lock().render(&model, loaded.provenance.is_cache());
                Ok(Rendered {
                    model,
                    provenance: loaded.provenance,
                })
            }
            Err(e) => {
                self.view.lock().show_error(&e.user_message());
                Err(e)
            }
        }
    }
}

/// Question panel.
pub struct QuestionPanel<Q, V> {
    source: Q,
    view: Mutex<V>,
    in_flight: AtomicBool,
}

impl<Q: QuestionSource, V: AnswerView> QuestionPanel<Q, V> {
    pub fn new(source: Q, view: V) -> Self {
        Self {
            source,
            view: Mutex::new(view),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn view(&self) -> MutexGuard<'_, V> {
        self.view.lock()
    }

    pub fn into_view(self) -> V {
        self.view.into_inner()
    }

    /// Ask `question` and render the answer.
    ///
    /// Blank questions are rejected before anything is sent.
    pub async fn ask(&self, question: &str) -> Result<Outcome<AnswerModel>, ServiceError> {
        let question = question.trim();
        if question.is_empty() {
            let err = ServiceError::EmptyQuestion;
            self.view.lock().show_answer_error(&err.user_message());
            return Err(err);
        }
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("question already in flight; ignoring");
            return Ok(Outcome::Ignored);
        };

        self.view.lock().show_asking();
        match self.source.ask(question).await {
            Ok(answer) => {
                let model = present_answer(&answer);
                self.view.lock().render_answer(&model);
                Ok(Outcome::Completed(model))
            }
            Err(e) => {
                self.view.lock().show_answer_error(&e.user_message());
                Err(e)
            }
        }
    }
}
