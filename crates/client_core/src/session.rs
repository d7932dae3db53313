use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};

use crate::{
    error::FlowError,
    flow::{Effect, FlowController, FlowEvent, Screen, TimerId},
    SubmissionClient,
};

/// Sink for the looping background track. Playback itself belongs to the
/// front end; the flow only says when to start and stop.
pub trait BackgroundAudio: Send + Sync {
    fn start(&self);
    fn stop(&self);
}

pub struct SilentAudio;

impl BackgroundAudio for SilentAudio {
    fn start(&self) {
        info!("background audio started");
    }

    fn stop(&self) {
        info!("background audio stopped");
    }
}

/// Runs a [`FlowController`] on the tokio runtime: timers become sleeping
/// tasks, writes become spawned requests, and both report back through one
/// channel so every transition still happens on the caller's task.
pub struct FlowSession {
    controller: FlowController,
    client: Arc<dyn SubmissionClient>,
    audio: Arc<dyn BackgroundAudio>,
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,
    timers: HashMap<TimerId, JoinHandle<()>>,
    submission: Option<JoinHandle<()>>,
    notices: Vec<&'static str>,
}

impl FlowSession {
    pub fn new(client: Arc<dyn SubmissionClient>, audio: Arc<dyn BackgroundAudio>) -> Self {
        Self::with_controller(FlowController::new(), client, audio)
    }

    pub fn with_controller(
        controller: FlowController,
        client: Arc<dyn SubmissionClient>,
        audio: Arc<dyn BackgroundAudio>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            client,
            audio,
            events_tx,
            events_rx,
            timers: HashMap::new(),
            submission: None,
            notices: Vec::new(),
        }
    }

    pub fn controller(&self) -> &FlowController {
        &self.controller
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    /// Notices emitted since the last call, oldest first.
    pub fn take_notices(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.notices)
    }

    /// Applies one event and starts whatever work it asks for. Must be called
    /// from within a tokio runtime.
    pub fn dispatch(&mut self, event: FlowEvent) -> Result<(), FlowError> {
        if let FlowEvent::TimerElapsed(timer) = &event {
            self.timers.remove(timer);
        }
        if matches!(
            event,
            FlowEvent::WishStored(_) | FlowEvent::GradesStored(_) | FlowEvent::SubmissionFailed(_)
        ) {
            self.submission = None;
        }

        let effects = self.controller.handle(event)?;
        self.apply(effects);
        Ok(())
    }

    /// Waits for the next timer or submission result and applies it.
    /// Returns `None` when nothing is outstanding.
    pub async fn next_internal_event(&mut self) -> Option<Result<(), FlowError>> {
        if !self.controller.is_busy() {
            return None;
        }
        let event = self.events_rx.recv().await?;
        Some(self.dispatch(event))
    }

    /// Drives outstanding timers and submissions until the controller is idle.
    pub async fn settle(&mut self) -> Result<(), FlowError> {
        while let Some(result) = self.next_internal_event().await {
            result?;
        }
        Ok(())
    }

    /// Cancels pending timers and in-flight writes and stops audio.
    pub fn shutdown(&mut self) {
        let effects = self.controller.teardown();
        self.apply(effects);
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        if let Some(handle) = self.submission.take() {
            handle.abort();
        }
        while self.events_rx.try_recv().is_ok() {}
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleTransition { timer, after } => self.schedule(timer, after),
                Effect::CancelTimer(timer) => {
                    if let Some(handle) = self.timers.remove(&timer) {
                        handle.abort();
                    }
                }
                Effect::SubmitWish(request) => {
                    let client = Arc::clone(&self.client);
                    let events = self.events_tx.clone();
                    self.submission = Some(tokio::spawn(async move {
                        let event = match client.create_wish(&request).await {
                            Ok(wish) => FlowEvent::WishStored(wish),
                            Err(error) => {
                                warn!(%error, "wish submission failed");
                                FlowEvent::SubmissionFailed(error.to_string())
                            }
                        };
                        let _ = events.send(event);
                    }));
                }
                Effect::SubmitGrades(request) => {
                    let client = Arc::clone(&self.client);
                    let events = self.events_tx.clone();
                    self.submission = Some(tokio::spawn(async move {
                        let event = match client.create_grade_submission(&request).await {
                            Ok(submission) => FlowEvent::GradesStored(submission),
                            Err(error) => {
                                warn!(%error, "grade submission failed");
                                FlowEvent::SubmissionFailed(error.to_string())
                            }
                        };
                        let _ = events.send(event);
                    }));
                }
                Effect::StartAudio => self.audio.start(),
                Effect::StopAudio => self.audio.stop(),
                Effect::Notify(notice) => {
                    info!(notice, "flow notice");
                    self.notices.push(notice);
                }
            }
        }
    }

    fn schedule(&mut self, timer: TimerId, after: Duration) {
        let events = self.events_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = events.send(FlowEvent::TimerElapsed(timer));
        });
        self.timers.insert(timer, handle);
    }
}

impl Drop for FlowSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
