use super::route::{Direction, VehicleClass, DIRECTIONS};
use log::warn;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// An emergency vehicle is waiting for or crossing into the path.
    Emergency,
    /// The path is occupied by traffic from another approach.
    HeldBy(Direction),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathStatus {
    Clear,
    Blocked(BlockReason),
}

impl PathStatus {
    pub fn is_blocked(&self) -> bool {
        match *self {
            PathStatus::Clear => false,
            PathStatus::Blocked(_) => true,
        }
    }
}

/// State of the gate guarding the path into one exit direction.
///
/// `holder` is the approach that owns the path, and is set exactly when
/// some entry in `counts` is non-zero. Vehicles from the holding approach
/// share the path; everybody else waits for it to drain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub holder: Option<Direction>,
    pub counts: [usize; 4],
    pub emergency: usize,
}

impl Occupancy {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[derive(Default)]
struct PathGate {
    state: Mutex<Occupancy>,
    released: Condvar,
}

/// One gate per exit direction. Gates are locked independently, so traffic
/// heading for different exits never contends.
#[derive(Default)]
pub struct PathRegistry {
    gates: [PathGate; 4],
}

impl PathRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    fn gate(&self, d: Direction) -> (&PathGate, MutexGuard<Occupancy>) {
        let gate = &self.gates[d.index()];
        (gate, gate.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn query(&self, d: Direction, origin: Direction, class: VehicleClass) -> PathStatus {
        let (_, state) = self.gate(d);
        if class == VehicleClass::Regular && state.emergency > 0 {
            return PathStatus::Blocked(BlockReason::Emergency);
        }
        if state.counts[origin.index()] == 0 {
            if let Some(holder) = state.holder {
                return PathStatus::Blocked(BlockReason::HeldBy(holder));
            }
        }
        PathStatus::Clear
    }

    /// Occupies the path into `d` for a vehicle from `origin`.
    ///
    /// Callers are expected to have seen `query` report the path clear.
    /// That check is not atomic with this call, so if another approach took
    /// the path in between, this waits until it has drained.
    pub fn acquire(&self, d: Direction, origin: Direction) {
        let (gate, mut state) = self.gate(d);
        let mut warned = false;
        while let Some(holder) = state.holder {
            if holder == origin {
                break;
            }
            if !warned {
                warn!("Path to {} taken by {} traffic after admission from {}, waiting.",
                      d, holder, origin);
                warned = true;
            }
            state = gate.released.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        state.holder = Some(origin);
        state.counts[origin.index()] += 1;
    }

    pub fn release(&self, d: Direction, origin: Direction) {
        let (gate, mut state) = self.gate(d);
        if state.counts[origin.index()] == 0 {
            panic!("Release of path to {} from {} without a matching acquire.", d, origin);
        }
        state.counts[origin.index()] -= 1;
        if state.total() == 0 {
            state.holder = None;
            gate.released.notify_all();
        }
    }

    pub fn mark_emergency_present(&self, d: Direction) {
        let (_, mut state) = self.gate(d);
        state.emergency += 1;
    }

    pub fn clear_emergency_present(&self, d: Direction) {
        let (_, mut state) = self.gate(d);
        if state.emergency == 0 {
            panic!("No emergency vehicle registered for path to {}.", d);
        }
        state.emergency -= 1;
    }

    pub fn occupancy(&self, d: Direction) -> Occupancy {
        let (_, state) = self.gate(d);
        Occupancy::clone(&state)
    }

    pub fn is_idle(&self) -> bool {
        DIRECTIONS.iter().all(|&d| self.occupancy(d) == Occupancy::default())
    }
}
