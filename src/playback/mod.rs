//! Playback of a finished briefing.

mod clock;
mod controller;
mod element;

pub use clock::ClockElement;
pub use controller::{format_time, PlaybackController, PlaybackStatus, SKIP_SECONDS};
pub use element::{Listeners, MediaElement, MediaEvent, MediaEventKind, SubscriptionId};
