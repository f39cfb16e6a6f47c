// Progress output — what the person who launched the app sees.
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Sink for human-readable launcher progress.
pub trait Reporter {
    fn banner(&self, title: &str);
    /// Announce a stage. Ticks and `finish_line` may follow on the same line.
    fn step(&self, msg: &str);
    /// One failed poll attempt.
    fn tick(&self);
    fn info(&self, msg: &str);
    /// Close a line opened by `step`.
    fn finish_line(&self, ok: bool);
    fn success(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
    fn hint(&self, msg: &str);
}

/// Writes progress to stdout and errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    fn flush() {
        let _ = io::stdout().flush();
    }
}

impl Reporter for ConsoleReporter {
    fn banner(&self, title: &str) {
        let rule = "=".repeat(50);
        println!("{rule}\n{title}\n{rule}");
    }

    fn step(&self, msg: &str) {
        print!("{msg}");
        Self::flush();
    }

    fn tick(&self) {
        print!(".");
        Self::flush();
    }

    fn info(&self, msg: &str) {
        println!("{msg}");
    }

    fn finish_line(&self, ok: bool) {
        println!(" {}", if ok { "✓" } else { "✗" });
    }

    fn success(&self, msg: &str) {
        println!("✓ {msg}");
    }

    fn warn(&self, msg: &str) {
        println!("⚠ {msg}");
    }

    fn error(&self, msg: &str) {
        eprintln!("✗ {msg}");
    }

    fn hint(&self, msg: &str) {
        println!("  {msg}");
    }
}

/// A single reported event, as recorded by [`MemoryReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Banner(String),
    Step(String),
    Tick,
    Info(String),
    FinishLine(bool),
    Success(String),
    Warn(String),
    Error(String),
    Hint(String),
}

/// Records events in memory. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter(Arc<Mutex<Vec<Event>>>);

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// True if any non-tick event's text contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.events().iter().any(|e| match e {
            Event::Banner(s)
            | Event::Step(s)
            | Event::Info(s)
            | Event::Success(s)
            | Event::Warn(s)
            | Event::Error(s)
            | Event::Hint(s) => s.contains(needle),
            Event::Tick | Event::FinishLine(_) => false,
        })
    }

    fn push(&self, event: Event) {
        if let Ok(mut events) = self.0.lock() {
            events.push(event);
        }
    }
}

impl Reporter for MemoryReporter {
    fn banner(&self, title: &str) {
        self.push(Event::Banner(title.to_string()));
    }

    fn step(&self, msg: &str) {
        self.push(Event::Step(msg.to_string()));
    }

    fn tick(&self) {
        self.push(Event::Tick);
    }

    fn info(&self, msg: &str) {
        self.push(Event::Info(msg.to_string()));
    }

    fn finish_line(&self, ok: bool) {
        self.push(Event::FinishLine(ok));
    }

    fn success(&self, msg: &str) {
        self.push(Event::Success(msg.to_string()));
    }

    fn warn(&self, msg: &str) {
        self.push(Event::Warn(msg.to_string()));
    }

    fn error(&self, msg: &str) {
        self.push(Event::Error(msg.to_string()));
    }

    fn hint(&self, msg: &str) {
        self.push(Event::Hint(msg.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reporter_clones_share_events() {
        let a = MemoryReporter::new();
        let b = a.clone();
        a.step("Starting");
        b.tick();
        a.finish_line(true);
        assert_eq!(
            b.events(),
            vec![Event::Step("Starting".into()), Event::Tick, Event::FinishLine(true)]
        );
    }

    #[test]
    fn mentions_ignores_ticks() {
        let r = MemoryReporter::new();
        r.tick();
        r.error("docker is not installed");
        assert!(r.mentions("not installed"));
        assert!(!r.mentions("running"));
    }
}
