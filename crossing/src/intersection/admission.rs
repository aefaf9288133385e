use super::paths::{BlockReason, PathRegistry, PathStatus};
use super::route::{Direction, VehicleDescriptor};
use super::scheduler::LaneScheduler;
use std::time::Instant;

/// Which direction of a vehicle's route is compared with the lane
/// scheduler's turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnBasis {
    Origin,
    Destination,
}

impl TurnBasis {
    pub fn from_name(s: &str) -> Option<TurnBasis> {
        match s.to_lowercase().as_str() {
            "origin" => Some(TurnBasis::Origin),
            "destination" => Some(TurnBasis::Destination),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotLaneTurn { serving: Direction },
    Path(BlockReason),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Admission {
    Admitted { destination: Direction },
    Rejected(Rejection),
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        match *self {
            Admission::Admitted { .. } => true,
            Admission::Rejected(_) => false,
        }
    }
}

pub struct AdmissionController {
    scheduler: LaneScheduler,
    paths: PathRegistry,
    basis: TurnBasis,
}

impl AdmissionController {
    pub fn new(scheduler: LaneScheduler, paths: PathRegistry, basis: TurnBasis) -> Self {
        AdmissionController {
            scheduler: scheduler,
            paths: paths,
            basis: basis,
        }
    }

    pub fn scheduler(&self) -> &LaneScheduler {
        &self.scheduler
    }

    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    /// Checks lane turn and path state without changing either. A positive
    /// answer is only a snapshot; see `PathRegistry::acquire`.
    pub fn try_enter(&self, v: &VehicleDescriptor) -> Admission {
        let destination = v.destination();
        let key = match self.basis {
            TurnBasis::Origin => v.origin,
            TurnBasis::Destination => destination,
        };

        let serving = self.scheduler.current_turn();
        if serving != key {
            return Admission::Rejected(Rejection::NotLaneTurn { serving: serving });
        }

        match self.paths.query(destination, v.origin, v.class) {
            PathStatus::Clear => Admission::Admitted { destination: destination },
            PathStatus::Blocked(reason) => Admission::Rejected(Rejection::Path(reason)),
        }
    }

    pub fn enter(&self, v: &VehicleDescriptor) {
        self.paths.acquire(v.destination(), v.origin);
    }

    pub fn exit(&self, v: &VehicleDescriptor) {
        self.paths.release(v.destination(), v.origin);
    }

    pub fn tick(&self, now: Instant) -> Option<Direction> {
        self.scheduler.tick(now)
    }
}
