//! Loop phase statistics.
//!
//! Lightweight timing of the three fixed phases of a loop iteration (input,
//! update, render), plus frame and update counters. The game loop records
//! into this each iteration; callers can read a snapshot at any time or print
//! a summary after a run.
//!
//! ## Usage
//!
//! Print phase summaries from stress runs built with the `profile` feature:
//! ```bash
//! cargo test --release --features profile
//! ```

use std::time::{Duration, Instant};

/// The fixed phases of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Input,
    Update,
    Render,
}

impl Phase {
    const ALL: [Phase; 3] = [Phase::Input, Phase::Update, Phase::Render];

    fn index(self) -> usize {
        match self {
            Phase::Input => 0,
            Phase::Update => 1,
            Phase::Render => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Phase::Input => "input",
            Phase::Update => "update",
            Phase::Render => "render",
        }
    }
}

/// Timing statistics for one phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhaseStats {
    pub total_time: Duration,
    pub call_count: u64,
    pub min_time: Option<Duration>,
    pub max_time: Option<Duration>,
}

impl PhaseStats {
    pub fn avg_time(&self) -> Duration {
        if self.call_count == 0 {
            Duration::ZERO
        } else {
            self.total_time / self.call_count as u32
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.total_time += elapsed;
        self.call_count += 1;
        self.min_time = Some(self.min_time.map_or(elapsed, |m| m.min(elapsed)));
        self.max_time = Some(self.max_time.map_or(elapsed, |m| m.max(elapsed)));
    }
}

/// Accumulated loop statistics.
#[derive(Debug, Default)]
pub struct LoopStats {
    phases: [PhaseStats; 3],
    current: Option<(Phase, Instant)>,
    /// Loop iterations completed (one render each).
    frames: u64,
    /// Fixed updates executed across all iterations.
    updates: u64,
}

impl LoopStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing a phase. Call `end` to stop timing.
    pub fn begin(&mut self, phase: Phase) {
        self.current = Some((phase, Instant::now()));
    }

    /// End the current phase and record its duration.
    pub fn end(&mut self) {
        if let Some((phase, start)) = self.current.take() {
            self.phases[phase.index()].record(start.elapsed());
        }
    }

    /// Record a completed iteration and how many fixed updates it ran.
    pub fn record_iteration(&mut self, updates: u32) {
        self.frames += 1;
        self.updates += u64::from(updates);
    }

    /// Loop iterations completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Fixed updates executed so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Statistics for a specific phase.
    pub fn phase(&self, phase: Phase) -> &PhaseStats {
        &self.phases[phase.index()]
    }

    /// Print a summary of all phases.
    pub fn print_summary(&self) {
        println!(
            "\n=== Loop Summary ({} frames, {} updates) ===",
            self.frames, self.updates
        );
        println!(
            "{:<10} {:>10} {:>10} {:>10} {:>10}",
            "Phase", "Total", "Avg", "Min", "Max"
        );
        println!("{}", "-".repeat(54));

        for phase in Phase::ALL {
            let stats = self.phase(phase);
            println!(
                "{:<10} {:>10.2?} {:>10.2?} {:>10.2?} {:>10.2?}",
                phase.name(),
                stats.total_time,
                stats.avg_time(),
                stats.min_time.unwrap_or(Duration::ZERO),
                stats.max_time.unwrap_or(Duration::ZERO)
            );
        }
        println!();
    }

    /// Reset all statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
