//! Synthetic access-log lines for benchmarks, tests and the
//! `gen-access-log` binary. Output is fully determined by the seed.

use chrono::{DateTime, TimeDelta, Utc};
use std::io::Write;

const METHODS: [&str; 3] = ["GET", "POST", "PUT"];
const PATHS: [&str; 4] = ["/", "/api", "/login", "/data"];
const STATUSES: [u16; 3] = [200, 404, 500];
const CLF_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// 2023-10-10T00:00:00Z
const DEFAULT_START_EPOCH: i64 = 1_696_896_000;

pub struct LogGenerator {
    rng: fastrand::Rng,
    clock: DateTime<Utc>,
}

impl LogGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            clock: DateTime::UNIX_EPOCH + TimeDelta::seconds(DEFAULT_START_EPOCH),
        }
    }

    /// One line, without the trailing newline. Timestamps never go backwards.
    pub fn next_line(&mut self) -> String {
        let ip = format!(
            "{}.{}.{}.{}",
            self.rng.u8(1..=255),
            self.rng.u8(..),
            self.rng.u8(..),
            self.rng.u8(..)
        );
        self.clock += TimeDelta::seconds(self.rng.i64(0..3));

        let method = METHODS[self.rng.usize(..METHODS.len())];
        let path = PATHS[self.rng.usize(..PATHS.len())];
        let status = STATUSES[self.rng.usize(..STATUSES.len())];
        let size = self.rng.u32(100..=5000);

        format!(
            "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
            ip,
            self.clock.format(CLF_TIME_FORMAT),
            method,
            path,
            status,
            size
        )
    }

    /// Write `lines` newline-terminated lines.
    pub fn write_lines<W: Write>(&mut self, out: &mut W, lines: u64) -> std::io::Result<()> {
        for _ in 0..lines {
            writeln!(out, "{}", self.next_line())?;
        }
        Ok(())
    }
}

impl Iterator for LogGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_line())
    }
}

/// Generate `lines` lines into one string.
pub fn generate(seed: u64, lines: usize) -> String {
    let mut text = String::new();
    for line in LogGenerator::new(seed).take(lines) {
        text.push_str(&line);
        text.push('\n');
    }
    text
}
