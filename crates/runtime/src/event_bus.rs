/// What a recorded event is about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    DatasetLoaded,
    DatasetFailed,
    CountrySelected,
    ViewChanged,
    MarkersSynced,
    CityFocused,
    FocusDropped,
    SearchUpdated,
    TabChanged,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::DatasetLoaded => "dataset-loaded",
            EventKind::DatasetFailed => "dataset-failed",
            EventKind::CountrySelected => "country-selected",
            EventKind::ViewChanged => "view-changed",
            EventKind::MarkersSynced => "markers-synced",
            EventKind::CityFocused => "city-focused",
            EventKind::FocusDropped => "focus-dropped",
            EventKind::SearchUpdated => "search-updated",
            EventKind::TabChanged => "tab-changed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the controller trace.
///
/// `seq` is assigned by the bus and increases by one per emitted event, so
/// the relative order of two events is always observable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub kind: EventKind,
    pub message: String,
}

/// Events kept before the oldest ones are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Ordered trace of controller events.
///
/// Holds at most `capacity` undrained events; emitting past that drops the
/// oldest. Sequence numbers keep counting across drops and drains.
#[derive(Debug)]
pub struct EventBus {
    next_seq: u64,
    capacity: usize,
    events: Vec<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_seq: 0,
            capacity: capacity.max(1),
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, kind: EventKind, message: impl Into<String>) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        if self.events.len() >= self.capacity {
            let excess = self.events.len() + 1 - self.capacity;
            self.events.drain(..excess);
        }
        self.events.push(Event {
            seq,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
