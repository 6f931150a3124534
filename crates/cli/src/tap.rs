//! Test Anything Protocol (TAP version 13) writer.

use std::fmt::Display;

pub struct Tap {
    count: usize,
    failures: usize,
}

impl Tap {
    pub fn new() -> Self {
        println!("TAP version 13");
        Self {
            count: 0,
            failures: 0,
        }
    }

    pub fn ok(&mut self, description: &str) {
        self.count += 1;
        println!("ok {} - {}", self.count, description);
    }

    pub fn not_ok(&mut self, description: &str, reason: impl Display) {
        self.count += 1;
        self.failures += 1;
        println!("not ok {} - {}", self.count, description);
        for line in reason.to_string().lines() {
            println!("  # {}", line);
        }
    }

    /// A test that was not applicable; counts as passed.
    pub fn skip(&mut self, description: &str, reason: impl Display) {
        self.count += 1;
        let reason = reason.to_string();
        let first = reason.lines().next().unwrap_or_default();
        println!("ok {} - {} # SKIP {}", self.count, description, first);
    }

    pub fn failure_count(&self) -> usize {
        self.failures
    }

    /// Print the plan line. Must be called exactly once, after the last test.
    pub fn finish(self) {
        println!("1..{}", self.count);
    }
}
