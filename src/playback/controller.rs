//! Transport controls and progress state for one media element at a time.

use super::element::{MediaElement, MediaEvent, MediaEventKind, SubscriptionId};
use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::debug;

/// Step used by the skip-back / skip-forward controls.
pub const SKIP_SECONDS: f64 = 15.0;

/// An element together with the registrations made on it.
///
/// [`Attachment::detach`] undoes every registration, so swapping or
/// dropping the controller never leaves listeners behind.
struct Attachment {
    element: Box<dyn MediaElement>,
    subscriptions: Vec<SubscriptionId>,
    events: UnboundedReceiver<MediaEvent>,
}

impl Attachment {
    fn attach(mut element: Box<dyn MediaElement>) -> Self {
        let (sender, events) = unbounded_channel();
        let subscriptions = MediaEventKind::ALL
            .iter()
            .map(|kind| element.subscribe(*kind, sender.clone()))
            .collect();
        Self {
            element,
            subscriptions,
            events,
        }
    }

    fn detach(mut self) -> Box<dyn MediaElement> {
        for id in self.subscriptions.drain(..) {
            self.element.unsubscribe(id);
        }
        self.element
    }
}

/// Serializable view of the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackStatus {
    pub loaded: bool,
    pub playing: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub progress_percent: f64,
    pub elapsed: String,
    pub total: String,
}

/// Play/pause/seek over the currently loaded element.
pub struct PlaybackController {
    attachment: Option<Attachment>,
    current_time: f64,
    duration: Option<f64>,
    playing: bool,
    ended: bool,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            attachment: None,
            current_time: 0.0,
            duration: None,
            playing: false,
            ended: false,
        }
    }

    /// Install `element`, first detaching whatever was loaded.
    ///
    /// Returns the previous element with all of its listeners removed.
    pub fn load(&mut self, element: Box<dyn MediaElement>) -> Option<Box<dyn MediaElement>> {
        let previous = self.unload();
        self.attachment = Some(Attachment::attach(element));
        self.sync();
        previous
    }

    /// Stop and detach the current element.
    pub fn unload(&mut self) -> Option<Box<dyn MediaElement>> {
        let previous = self.attachment.take().map(|attachment| {
            let mut element = attachment.detach();
            element.pause();
            element
        });
        if previous.is_some() {
            debug!("Detached previous media element");
        }
        self.current_time = 0.0;
        self.duration = None;
        self.playing = false;
        self.ended = false;
        previous
    }

    pub fn is_loaded(&self) -> bool {
        self.attachment.is_some()
    }

    /// Apply pending notifications from the element.
    pub fn sync(&mut self) {
        let Some(attachment) = self.attachment.as_mut() else {
            return;
        };
        attachment.element.poll();

        while let Ok(event) = attachment.events.try_recv() {
            match event {
                MediaEvent::TimeUpdate { current_time } => {
                    self.current_time = current_time;
                }
                MediaEvent::LoadedMetadata { duration } => {
                    self.duration = Some(duration).filter(|d| d.is_finite());
                }
                MediaEvent::Ended => {
                    self.playing = false;
                    self.ended = true;
                    if let Some(d) = self.duration {
                        self.current_time = d;
                    }
                }
            }
        }
    }

    /// Flip between playing and paused. Returns whether it is now playing.
    ///
    /// Playing a finished resource starts it again from the beginning.
    pub fn toggle_play(&mut self) -> bool {
        let Some(attachment) = self.attachment.as_mut() else {
            return false;
        };

        if self.playing {
            attachment.element.pause();
            self.playing = false;
        } else {
            if self.ended {
                self.ended = false;
                self.current_time = 0.0;
            }
            attachment.element.play();
            self.playing = true;
        }
        self.playing
    }

    /// Jump to `percent` of the duration, clamped to `[0, 100]`.
    ///
    /// Does nothing while the duration is unknown.
    pub fn seek(&mut self, percent: f64) {
        let Some(duration) = self.finite_duration() else {
            return;
        };
        if percent.is_nan() {
            return;
        }
        self.set_position(percent.clamp(0.0, 100.0) / 100.0 * duration);
    }

    /// Move by `delta_seconds`, clamped to `[0, duration]`.
    pub fn skip(&mut self, delta_seconds: f64) {
        let Some(duration) = self.finite_duration() else {
            return;
        };
        if delta_seconds.is_nan() {
            return;
        }
        self.set_position((self.current_time + delta_seconds).clamp(0.0, duration));
    }

    pub fn skip_back(&mut self) {
        self.skip(-SKIP_SECONDS);
    }

    pub fn skip_forward(&mut self) {
        self.skip(SKIP_SECONDS);
    }

    fn set_position(&mut self, seconds: f64) {
        if let Some(attachment) = self.attachment.as_mut() {
            attachment.element.set_current_time(seconds);
        }
        self.current_time = seconds;
        self.ended = false;
    }

    fn finite_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite())
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Position as a percentage; 0 while the duration is unknown or zero, 100 once ended.
    pub fn progress_percent(&self) -> f64 {
        if self.ended {
            return 100.0;
        }
        match self.finite_duration() {
            Some(d) if d > 0.0 => (self.current_time / d * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            loaded: self.is_loaded(),
            playing: self.playing,
            current_time: self.current_time,
            duration: self.duration,
            progress_percent: self.progress_percent(),
            elapsed: format_time(self.current_time),
            total: format_time(self.duration.unwrap_or(f64::NAN)),
        }
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.unload();
    }
}

/// Format seconds as `m:ss`. Anything that is not a finite, non-negative
/// number shows as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}
