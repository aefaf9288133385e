use super::route::{Direction, DIRECTIONS};
use log::debug;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Time quantum per visit, indexed by `Direction::index`.
pub type Weights = [Duration; 4];

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerState {
    pub served: Direction,
    pub remaining: Duration,
    pub slot_started: Option<Instant>,
}

impl SchedulerState {
    pub fn slot_active(&self) -> bool {
        self.slot_started.is_some()
    }
}

/// Weighted time-sliced round-robin over the four approach lanes.
///
/// The scheduler has no timer of its own. Time only moves forward when
/// somebody calls `tick`, which in the simulation means a vehicle that was
/// refused entry. A lane whose quantum ran out keeps the turn until then.
pub struct LaneScheduler {
    weights: Weights,
    state: Mutex<SchedulerState>,
}

impl LaneScheduler {
    pub fn new(weights: Weights, initial: Direction) -> Self {
        assert!(weights.iter().all(|w| *w > Duration::from_secs(0)),
                "lane weights must be positive");
        LaneScheduler {
            weights: weights,
            state: Mutex::new(SchedulerState {
                served: initial,
                remaining: weights[initial.index()],
                slot_started: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn weight(&self, d: Direction) -> Duration {
        self.weights[d.index()]
    }

    pub fn current_turn(&self) -> Direction {
        self.lock().served
    }

    pub fn snapshot(&self) -> SchedulerState {
        self.lock().clone()
    }

    /// Opens a slot for the served lane if none is running, or rotates to
    /// the next lane once the slot has lasted its quantum. Returns the newly
    /// served lane when a rotation happened.
    pub fn tick(&self, now: Instant) -> Option<Direction> {
        let mut state = self.lock();
        let started = match state.slot_started {
            None => {
                state.slot_started = Some(now);
                return None;
            }
            Some(t) => t,
        };

        if now.saturating_duration_since(started) < state.remaining {
            return None;
        }

        let next = state.served.next();
        debug!("Quantum of {} lane elapsed, serving {}.", state.served, next);
        state.served = next;
        state.remaining = self.weights[next.index()];
        state.slot_started = Some(now);
        Some(next)
    }

    /// Fraction of a full rotation given to each lane.
    pub fn shares(&self) -> [f64; 4] {
        let total = self.weights.iter().map(|w| w.as_secs_f64()).sum::<f64>();
        let mut shares = [0.0; 4];
        for d in DIRECTIONS.iter() {
            shares[d.index()] = self.weights[d.index()].as_secs_f64() / total;
        }
        shares
    }
}
