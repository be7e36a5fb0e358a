//! Headless media element.
//!
//! Plays a WAV resource against a monotonic clock instead of an audio device.
//! Duration comes from the container header and is reported on the first poll.

use super::element::{Listeners, MediaElement, MediaEvent, MediaEventKind, SubscriptionId};
use crate::audio::AudioResource;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;

/// Media element driven by elapsed wall-clock time.
pub struct ClockElement {
    resource: AudioResource,
    metadata_loaded: bool,
    duration: f64,
    position: f64,
    playing_since: Option<Instant>,
    listeners: Listeners,
}

impl ClockElement {
    pub fn new(resource: AudioResource) -> Self {
        Self {
            resource,
            metadata_loaded: false,
            duration: f64::NAN,
            position: 0.0,
            playing_since: None,
            listeners: Listeners::default(),
        }
    }

    pub fn resource(&self) -> &AudioResource {
        &self.resource
    }

    pub fn is_playing(&self) -> bool {
        self.playing_since.is_some()
    }

    /// Move the playhead forward by `seconds` of playback.
    ///
    /// Does nothing while paused. Reaching the end stops playback and emits `Ended`.
    pub fn advance(&mut self, seconds: f64) {
        if self.playing_since.is_none() || seconds.is_nan() || seconds <= 0.0 {
            return;
        }
        self.position += seconds;

        if self.duration.is_finite() && self.position >= self.duration {
            self.position = self.duration;
            self.playing_since = None;
            self.listeners.emit(MediaEvent::TimeUpdate {
                current_time: self.position,
            });
            self.listeners.emit(MediaEvent::Ended);
        } else {
            self.listeners.emit(MediaEvent::TimeUpdate {
                current_time: self.position,
            });
        }
    }

    fn load_metadata(&mut self) {
        if self.metadata_loaded {
            return;
        }
        self.metadata_loaded = true;
        self.duration = self.resource.duration_seconds().unwrap_or(f64::NAN);
        self.listeners.emit(MediaEvent::LoadedMetadata {
            duration: self.duration,
        });
    }

    fn at_end(&self) -> bool {
        self.duration.is_finite() && self.position >= self.duration
    }
}

impl MediaElement for ClockElement {
    fn play(&mut self) {
        if self.playing_since.is_some() {
            return;
        }
        if self.at_end() {
            self.position = 0.0;
        }
        self.playing_since = Some(Instant::now());
    }

    fn pause(&mut self) {
        self.poll();
        self.playing_since = None;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        let upper = if self.duration.is_finite() { self.duration } else { f64::MAX };
        self.position = seconds.clamp(0.0, upper);
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
        self.listeners.emit(MediaEvent::TimeUpdate {
            current_time: self.position,
        });
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn subscribe(&mut self, kind: MediaEventKind, sender: UnboundedSender<MediaEvent>) -> SubscriptionId {
        self.listeners.add(kind, sender)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.remove(id);
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn poll(&mut self) {
        self.load_metadata();
        if let Some(since) = self.playing_since {
            let now = Instant::now();
            self.playing_since = Some(now);
            self.advance(now.duration_since(since).as_secs_f64());
        }
    }
}
