use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::watch;
use tracing::debug;

use content::PracticeSetSource;
use practice_core::Clock;
use practice_core::model::{PracticeSet, QuestionId, SetId};

use super::state::{AnswerEvent, Phase, PracticeSession};
use super::ticker::Ticker;
use super::view::SessionView;
use crate::error::SessionError;

/// Which transition a pending early-exit confirmation will apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitKind {
    /// Finish the session early and show the score.
    Finish,
    /// Abandon the session and return to the set list.
    ToList,
}

/// Result of an exit request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The caller must confirm before anything changes.
    ConfirmationRequired,
    Finished,
    Exited,
}

/// Drives a [`PracticeSession`] with real time and the 1-second ticker.
///
/// The controller is the only owner of the ticker handle: every transition
/// that changes the current question cancels the old ticker before spawning
/// the next one, inside the same call. At most one ticker is ever alive.
pub struct SessionController {
    clock: Clock,
    session: PracticeSession,
    elapsed_tx: watch::Sender<u64>,
    elapsed_rx: watch::Receiver<u64>,
    ticker: Option<Ticker>,
    live_tickers: Arc<AtomicUsize>,
    pending_exit: Option<ExitKind>,
}

impl SessionController {
    #[must_use]
    pub fn new(clock: Clock, sets: Vec<PracticeSet>) -> Self {
        let (elapsed_tx, elapsed_rx) = watch::channel(0);
        Self {
            clock,
            session: PracticeSession::new(sets),
            elapsed_tx,
            elapsed_rx,
            ticker: None,
            live_tickers: Arc::new(AtomicUsize::new(0)),
            pending_exit: None,
        }
    }

    /// Build a controller from a content source.
    ///
    /// # Errors
    ///
    /// Propagates `ContentError` from the source.
    pub async fn from_source(
        clock: Clock,
        source: &dyn PracticeSetSource,
    ) -> Result<Self, SessionError> {
        let sets = source.load_practice_sets().await?;
        Ok(Self::new(clock, sets))
    }

    #[must_use]
    pub fn session(&self) -> &PracticeSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Snapshot for the presentation layer.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::capture(&self.session, self.clock.now())
    }

    /// Live elapsed-seconds channel, updated once per second while a session
    /// runs and reset to 0 on every question change.
    #[must_use]
    pub fn elapsed(&self) -> watch::Receiver<u64> {
        self.elapsed_rx.clone()
    }

    /// Ticker handles currently alive; diagnostic for the one-ticker
    /// invariant.
    #[must_use]
    pub fn live_tickers(&self) -> usize {
        Ticker::live_count(&self.live_tickers)
    }

    #[must_use]
    pub fn pending_exit(&self) -> Option<ExitKind> {
        self.pending_exit
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────
    //

    /// Start a session on `set_id` and begin ticking.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the state machine; the ticker is not
    /// touched on failure.
    pub fn start(&mut self, set_id: &SetId) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.session.start_session(set_id, now)?;
        debug!(set_id = %set_id, "session started");
        self.restart_ticker(now);
        Ok(())
    }

    /// Record one answer edit on the current question.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the state machine.
    pub fn record(
        &mut self,
        question_id: &QuestionId,
        event: AnswerEvent,
    ) -> Result<(), SessionError> {
        self.session.record_answer(question_id, event)
    }

    /// Move to the next question; boundary calls are no-ops that leave the
    /// running ticker alone.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the state machine.
    pub fn next(&mut self) -> Result<bool, SessionError> {
        let now = self.clock.now();
        let moved = self.session.next_question(now)?;
        if moved {
            self.restart_ticker(now);
        }
        Ok(moved)
    }

    /// Move to the previous question; boundary calls are no-ops that leave
    /// the running ticker alone.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the state machine.
    pub fn prev(&mut self) -> Result<bool, SessionError> {
        let now = self.clock.now();
        let moved = self.session.prev_question(now)?;
        if moved {
            self.restart_ticker(now);
        }
        Ok(moved)
    }

    /// Finish normally (the explicit action on the last question). No
    /// confirmation involved.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the state machine.
    pub fn finish(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.session.finish(now)?;
        self.stop_ticker();
        self.pending_exit = None;
        debug!("session finished");
        Ok(())
    }

    /// User-initiated back/exit.
    ///
    /// From `Reviewing` the exit applies immediately. From `InProgress` the
    /// session is left untouched and the caller must confirm via
    /// [`confirm_exit`](Self::confirm_exit); declining with
    /// [`decline_exit`](Self::decline_exit) is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while browsing.
    pub fn request_exit(&mut self, kind: ExitKind) -> Result<ExitOutcome, SessionError> {
        match (self.session.phase(), kind) {
            (Phase::InProgress, _) => {
                self.pending_exit = Some(kind);
                Ok(ExitOutcome::ConfirmationRequired)
            }
            (Phase::Reviewing, ExitKind::ToList) => {
                self.session.exit_to_list()?;
                self.stop_ticker();
                Ok(ExitOutcome::Exited)
            }
            (phase, _) => Err(SessionError::InvalidTransition {
                operation: "request_exit",
                phase,
            }),
        }
    }

    /// Apply the pending early exit.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingExit` when nothing was requested, and propagates
    /// state machine errors.
    pub fn confirm_exit(&mut self) -> Result<ExitOutcome, SessionError> {
        let kind = self.pending_exit.take().ok_or(SessionError::NoPendingExit)?;
        match kind {
            ExitKind::Finish => {
                self.finish()?;
                Ok(ExitOutcome::Finished)
            }
            ExitKind::ToList => {
                self.session.exit_to_list()?;
                self.stop_ticker();
                debug!("session abandoned");
                Ok(ExitOutcome::Exited)
            }
        }
    }

    /// Drop the pending exit request without touching the session.
    pub fn decline_exit(&mut self) {
        self.pending_exit = None;
    }

    /// Restart the reviewed set from scratch.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the state machine.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now();
        self.session.retry(now)?;
        self.restart_ticker(now);
        Ok(())
    }

    //
    // ─── TICKER DISCIPLINE ─────────────────────────────────────────────────
    //

    fn restart_ticker(&mut self, now: chrono::DateTime<chrono::Utc>) {
        // Drop the old handle before spawning the replacement so two tickers
        // never coexist, even transiently.
        self.ticker.take();
        let _ = self.elapsed_tx.send(0);
        self.ticker = Some(Ticker::spawn(
            self.clock,
            now,
            self.elapsed_tx.clone(),
            Arc::clone(&self.live_tickers),
        ));
    }

    fn stop_ticker(&mut self) {
        self.ticker.take();
        let _ = self.elapsed_tx.send(0);
    }
}
