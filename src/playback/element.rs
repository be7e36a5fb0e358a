//! The media element seam: something that plays an audio resource and
//! notifies listeners about progress, metadata and end of playback.

use tokio::sync::mpsc::UnboundedSender;

/// Identifies one listener registration on an element.
pub type SubscriptionId = u64;

/// Kinds of notification an element emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEventKind {
    TimeUpdate,
    LoadedMetadata,
    Ended,
}

impl MediaEventKind {
    pub const ALL: [MediaEventKind; 3] = [
        MediaEventKind::TimeUpdate,
        MediaEventKind::LoadedMetadata,
        MediaEventKind::Ended,
    ];
}

/// A notification from an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    TimeUpdate { current_time: f64 },
    LoadedMetadata { duration: f64 },
    Ended,
}

impl MediaEvent {
    pub fn kind(&self) -> MediaEventKind {
        match self {
            MediaEvent::TimeUpdate { .. } => MediaEventKind::TimeUpdate,
            MediaEvent::LoadedMetadata { .. } => MediaEventKind::LoadedMetadata,
            MediaEvent::Ended => MediaEventKind::Ended,
        }
    }
}

/// A playable audio resource.
pub trait MediaElement: Send {
    fn play(&mut self);

    fn pause(&mut self);

    /// Position in seconds.
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Length in seconds; NaN until metadata has loaded.
    fn duration(&self) -> f64;

    /// Register `sender` for events of `kind`.
    fn subscribe(&mut self, kind: MediaEventKind, sender: UnboundedSender<MediaEvent>) -> SubscriptionId;

    /// Remove a registration. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Number of live registrations.
    fn listener_count(&self) -> usize;

    /// Let the element catch up with time and emit any due events.
    fn poll(&mut self) {}
}

/// Registrations kept by an element.
#[derive(Debug, Default)]
pub struct Listeners {
    next_id: SubscriptionId,
    entries: Vec<(SubscriptionId, MediaEventKind, UnboundedSender<MediaEvent>)>,
}

impl Listeners {
    pub fn add(&mut self, kind: MediaEventKind, sender: UnboundedSender<MediaEvent>) -> SubscriptionId {
        self.next_id += 1;
        self.entries.push((self.next_id, kind, sender));
        self.next_id
    }

    pub fn remove(&mut self, id: SubscriptionId) {
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `event` to every listener of its kind. Closed receivers are skipped.
    pub fn emit(&self, event: MediaEvent) {
        let kind = event.kind();
        for (_, _, sender) in self.entries.iter().filter(|(_, k, _)| *k == kind) {
            let _ = sender.send(event);
        }
    }
}
