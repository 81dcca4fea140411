use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Length(String),
    ToUpper(String),
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Length(name) => write!(f, "length(): {}", name),
            TraceEvent::ToUpper(name) => write!(f, "toUpper(): {}", name),
        }
    }
}

/// Append-only observation log of per-element pipeline calls.
#[derive(Debug, Default)]
pub struct TraceLog {
    events: Mutex<Vec<TraceEvent>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: TraceEvent) {
        tracing::debug!("{}", event);
        // poisoned lock 只代表其他 worker panic 過，事件本身仍可用
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(ToString::to_string).collect()
    }

    /// Traced length check used by the find-first pipelines.
    pub fn length(&self, name: &str) -> usize {
        self.record(TraceEvent::Length(name.to_string()));
        name.chars().count()
    }

    /// Traced upper-casing used by the find-first pipelines.
    pub fn to_upper(&self, name: &str) -> String {
        self.record(TraceEvent::ToUpper(name.to_string()));
        name.to_uppercase()
    }
}
