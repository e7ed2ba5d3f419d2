use std::time::Instant;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Busy indicator shown while a request is in flight
#[derive(Debug, Default)]
pub struct LoadingIndicator {
    message: Option<String>,
    since: Option<Instant>,
}

impl LoadingIndicator {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.since = Some(Instant::now());
    }

    pub fn hide(&mut self) {
        self.message = None;
        self.since = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn spinner(&self, now: Instant) -> char {
        let elapsed = self
            .since
            .map(|since| now.saturating_duration_since(since).as_millis())
            .unwrap_or(0);
        SPINNER[(elapsed / 100) as usize % SPINNER.len()]
    }
}
