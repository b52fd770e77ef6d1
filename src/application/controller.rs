//! Interview phase controller
//!
//! Sequences question fetch, device acquisition, the two countdowns, capture
//! teardown, upload and result display. All input arrives as
//! [`ControllerEvent`]s on one queue, so transitions never interleave.
//! While a transition waits on the network or the capture sink, the queue is
//! still watched for `Shutdown`.

use std::collections::VecDeque;
use std::future::Future;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::analysis::ResultView;
use crate::domain::error::InterviewError;
use crate::domain::interview::{
    InvalidPhaseTransition, Layout, PhaseState, QuestionReply, TimerKind,
    QUESTIONS_EXHAUSTED_MESSAGE,
};
use crate::domain::recording::{format_clock, Duration};

use super::capture::CaptureManager;
use super::ports::{AnalysisBackend, CaptureDevice, CaptureError, InterviewView, QuestionSource};
use super::session::Session;
use super::timer::{Tick, TimerId};
use super::upload::UploadPipeline;

pub const STATUS_PREPARING: &str = "Prepare your answer...";
pub const STATUS_RECORDING: &str = "Recording in progress...";
pub const STATUS_PROCESSING: &str = "Processing your response...";

/// Shown when the question request itself fails
pub const QUESTION_FETCH_FAILED: &str = "Failed to fetch interview question. Please try again.";

/// Input to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// User asked to begin the interview
    Start,
    /// User asked for the next question
    Next,
    /// One second of a countdown elapsed
    Tick(Tick),
    /// A countdown reached zero
    Expired { timer: TimerId, kind: TimerKind },
    /// Tear everything down and stop
    Shutdown,
}

/// Countdown lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub preparation: Duration,
    pub recording: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            preparation: Duration::default_preparation(),
            recording: Duration::default_recording(),
        }
    }
}

/// Interview phase controller
pub struct InterviewController<D, Q, A, V>
where
    D: CaptureDevice,
    Q: QuestionSource,
    A: AnalysisBackend,
    V: InterviewView,
{
    capture: CaptureManager<D>,
    questions: Q,
    upload: UploadPipeline<A>,
    view: V,
    config: ControllerConfig,
    session: Session<D::Stream>,
    tx: mpsc::UnboundedSender<ControllerEvent>,
    rx: mpsc::UnboundedReceiver<ControllerEvent>,
    /// Events that arrived while a transition was suspended
    deferred: VecDeque<ControllerEvent>,
    stopped: bool,
}

impl<D, Q, A, V> InterviewController<D, Q, A, V>
where
    D: CaptureDevice,
    Q: QuestionSource,
    A: AnalysisBackend,
    V: InterviewView,
{
    pub fn new(
        capture: CaptureManager<D>,
        questions: Q,
        backend: A,
        view: V,
        config: ControllerConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            capture,
            questions,
            upload: UploadPipeline::new(backend),
            view,
            config,
            session: Session::new(),
            tx,
            rx,
            deferred: VecDeque::new(),
            stopped: false,
        }
    }

    /// Handle for posting events from input pumps and signal handlers
    pub fn sender(&self) -> mpsc::UnboundedSender<ControllerEvent> {
        self.tx.clone()
    }

    pub fn session(&self) -> &Session<D::Stream> {
        &self.session
    }

    pub fn phase(&self) -> PhaseState {
        self.session.phase()
    }

    /// Draw the initial screen
    pub fn show(&self) {
        self.show_phase();
    }

    /// Wait for and handle one event. Returns false once the controller has shut down.
    pub async fn step(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        let next = match self.deferred.pop_front() {
            Some(event) => Some(event),
            None => self.rx.recv().await,
        };
        match next {
            Some(event) => self.handle(event).await,
            None => {
                self.stop().await;
                false
            }
        }
    }

    /// Pump events until shutdown
    pub async fn run(&mut self) {
        self.show_phase();
        while self.step().await {}
    }

    /// Apply one event. Returns false after `Shutdown`.
    pub async fn handle(&mut self, event: ControllerEvent) -> bool {
        let phase = self.phase();
        let outcome = match event {
            ControllerEvent::Start if phase == PhaseState::Idle => self.request_question().await,
            ControllerEvent::Next if phase == PhaseState::AwaitingNext => {
                self.request_question().await
            }
            ControllerEvent::Start | ControllerEvent::Next => {
                debug!(?event, %phase, "ignoring user action");
                Ok(())
            }
            ControllerEvent::Tick(tick) => {
                if self.session.timer.owns(tick.timer) {
                    self.view.countdown(tick.kind, &format_clock(tick.remaining));
                }
                Ok(())
            }
            ControllerEvent::Expired { timer, kind } => {
                if !self.session.timer.owns(timer) {
                    debug!(?timer, %kind, "dropping expiry from replaced timer");
                    return true;
                }
                match (kind, phase) {
                    (TimerKind::Preparation, PhaseState::Preparing) => self.begin_recording().await,
                    (TimerKind::Recording, PhaseState::Recording) => self.finish_recording().await,
                    _ => {
                        warn!(%kind, %phase, "timer expired in unexpected phase");
                        Ok(())
                    }
                }
            }
            ControllerEvent::Shutdown => {
                self.stop().await;
                return false;
            }
        };

        if let Err(e) = outcome {
            warn!(error = %e, "rejected phase transition");
        }
        !self.stopped
    }

    async fn request_question(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.session.state.request_question()?;
        self.session.last_error = None;
        self.show_phase();

        let reply = until_shutdown(
            &mut self.rx,
            &mut self.deferred,
            self.questions.next_question(),
        )
        .await;
        let Some(reply) = reply else {
            self.stop().await;
            return Ok(());
        };

        match reply {
            Ok(QuestionReply::Question(question)) => {
                info!(%question, "question received");
                self.session.state.question_received(question.clone())?;
                self.view.question(&question);
                self.enter_preparation().await
            }
            Ok(QuestionReply::Exhausted) => {
                info!("question set exhausted");
                self.session.timer.cancel();
                self.release_resources().await;
                self.session.state.questions_exhausted()?;
                self.show_phase();
                self.view.alert(QUESTIONS_EXHAUSTED_MESSAGE);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "question request failed");
                self.fail(InterviewError::TransportFailure(QUESTION_FETCH_FAILED.to_string()))
                    .await;
                Ok(())
            }
        }
    }

    async fn enter_preparation(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.show_phase();

        if !self.session.has_device() {
            let acquired =
                until_shutdown(&mut self.rx, &mut self.deferred, self.capture.acquire()).await;
            match acquired {
                Some(Ok(handle)) => self.session.capture = Some(handle),
                Some(Err(e)) => {
                    self.fail(e.into()).await;
                    return Ok(());
                }
                None => {
                    self.stop().await;
                    return Ok(());
                }
            }
        }

        self.view.status(STATUS_PREPARING);
        self.start_timer(TimerKind::Preparation, self.config.preparation);
        Ok(())
    }

    async fn begin_recording(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.session.timer.cancel();

        let started = match self.session.capture.as_mut() {
            Some(handle) => self.capture.begin_recording(handle).await,
            None => Err(CaptureError::StreamClosed),
        };
        if let Err(e) = started {
            self.fail(e.into()).await;
            return Ok(());
        }

        self.session.state.start_recording()?;
        self.show_phase();
        self.view.status(STATUS_RECORDING);
        self.start_timer(TimerKind::Recording, self.config.recording);
        Ok(())
    }

    async fn finish_recording(&mut self) -> Result<(), InvalidPhaseTransition> {
        self.session.timer.cancel();

        let finished = match self.session.capture.as_mut() {
            Some(handle) => {
                until_shutdown(
                    &mut self.rx,
                    &mut self.deferred,
                    self.capture.end_recording(handle),
                )
                .await
            }
            None => Some(Err(CaptureError::StreamClosed)),
        };
        self.release_resources().await;

        let Some(finished) = finished else {
            self.stop().await;
            return Ok(());
        };

        let artifact = match finished {
            Ok(artifact) => artifact,
            Err(e) => {
                self.fail(e.into()).await;
                return Ok(());
            }
        };

        self.session.state.start_processing()?;
        self.show_phase();
        self.view.status(STATUS_PROCESSING);
        self.view.result(&ResultView::pending());

        let outcome =
            until_shutdown(&mut self.rx, &mut self.deferred, self.upload.submit(&artifact)).await;
        let Some(outcome) = outcome else {
            self.stop().await;
            return Ok(());
        };

        self.session.state.complete_processing()?;
        self.show_phase();
        self.view.result(&ResultView::render(&outcome));
        Ok(())
    }

    /// End the attempt: stop timers, release the device, show the error, go idle
    async fn fail(&mut self, error: InterviewError) {
        warn!(error = %error, phase = %self.phase(), "interview attempt failed");
        self.session.timer.cancel();
        self.release_resources().await;
        self.session.state.abort();
        self.show_phase();
        self.view.result(&ResultView::failure(&error.to_string()));
        self.session.last_error = Some(error);
    }

    async fn release_resources(&mut self) {
        if let Some(mut handle) = self.session.capture.take() {
            self.capture.release(&mut handle).await;
        }
    }

    async fn stop(&mut self) {
        if self.stopped {
            return;
        }
        info!(phase = %self.phase(), "shutting down interview");
        self.stopped = true;
        self.session.timer.cancel();
        self.release_resources().await;
    }

    fn start_timer(&mut self, kind: TimerKind, duration: Duration) {
        self.view.countdown(kind, &duration.clock());

        let ticks = self.tx.clone();
        let expiry = self.tx.clone();
        self.session.timer.start(
            kind,
            duration,
            move |tick| {
                let _ = ticks.send(ControllerEvent::Tick(tick));
            },
            move |timer| {
                let _ = expiry.send(ControllerEvent::Expired { timer, kind });
            },
        );
    }

    fn show_phase(&self) {
        let phase = self.phase();
        debug!(%phase, "phase");
        self.view.layout(phase, Layout::for_phase(phase));
    }
}

/// Drive `work` to completion unless `Shutdown` arrives first.
///
/// Any other event received meanwhile is kept in `deferred`, in arrival order.
async fn until_shutdown<F: Future>(
    rx: &mut mpsc::UnboundedReceiver<ControllerEvent>,
    deferred: &mut VecDeque<ControllerEvent>,
    work: F,
) -> Option<F::Output> {
    tokio::pin!(work);
    loop {
        tokio::select! {
            biased;
            output = &mut work => return Some(output),
            event = rx.recv() => match event {
                Some(ControllerEvent::Shutdown) | None => return None,
                Some(other) => deferred.push_back(other),
            },
        }
    }
}
