use super::admission::{Admission, AdmissionController};
use super::route::{VehicleDescriptor, VehicleId};
use crate::output::history::{LogEvent, VehicleEvent};
use log::{debug, info};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub type EventLogger = Arc<dyn Fn(LogEvent) + Send + Sync>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AgentState {
    Created,
    MarksPresence,
    Polling,
    Admitted,
    ClearsPresence,
    Crossing,
    Exited,
    GaveUp,
}

#[derive(Debug, Copy, Clone)]
pub struct AgentParams {
    pub backoff: Duration,
    pub max_wait: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub id: VehicleId,
    pub state: AgentState,
    pub polls: usize,
    pub waited: Duration,
}

impl Outcome {
    pub fn exited(&self) -> bool {
        self.state == AgentState::Exited
    }
}

/// A vehicle polling the controller for entry, then crossing.
pub struct VehicleAgent {
    vehicle: VehicleDescriptor,
    controller: Arc<AdmissionController>,
    params: AgentParams,
    logger: EventLogger,
    state: AgentState,
}

impl VehicleAgent {
    pub fn new(vehicle: VehicleDescriptor,
               controller: Arc<AdmissionController>,
               params: AgentParams,
               logger: EventLogger) -> Self {
        VehicleAgent {
            vehicle: vehicle,
            controller: controller,
            params: params,
            logger: logger,
            state: AgentState::Created,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    fn log(&self, ev: VehicleEvent) {
        (self.logger)(LogEvent::Vehicle(self.vehicle.id, ev));
    }

    fn outcome(&self, polls: usize, start: Instant) -> Outcome {
        Outcome {
            id: self.vehicle.id,
            state: self.state,
            polls: polls,
            waited: start.elapsed(),
        }
    }

    pub fn spawn(self) -> thread::JoinHandle<Outcome> {
        thread::spawn(move || self.run())
    }

    pub fn run(mut self) -> Outcome {
        let start = Instant::now();
        let destination = self.vehicle.destination();
        let emergency = self.vehicle.is_emergency();

        if emergency {
            self.state = AgentState::MarksPresence;
            self.controller.paths().mark_emergency_present(destination);
            self.log(VehicleEvent::EmergencyMarked(destination));
        }

        self.state = AgentState::Polling;
        self.log(VehicleEvent::Waiting);
        let mut polls = 0;
        loop {
            polls += 1;
            let rejection = match self.controller.try_enter(&self.vehicle) {
                Admission::Admitted { .. } => break,
                Admission::Rejected(r) => r,
            };
            self.log(VehicleEvent::Blocked(rejection));
            if let Some(turn) = self.controller.tick(Instant::now()) {
                (self.logger)(LogEvent::Turn(turn));
            }

            if let Some(max_wait) = self.params.max_wait {
                if start.elapsed() >= max_wait {
                    if emergency {
                        self.controller.paths().clear_emergency_present(destination);
                        self.log(VehicleEvent::EmergencyCleared(destination));
                    }
                    self.state = AgentState::GaveUp;
                    info!("Vehicle {} gave up after {} attempts.", self.vehicle.id, polls);
                    self.log(VehicleEvent::GaveUp);
                    return self.outcome(polls, start);
                }
            }

            debug!("Vehicle {} blocked ({:?}), retrying in {:?}.",
                   self.vehicle.id, rejection, self.params.backoff);
            thread::sleep(self.params.backoff);
        }

        self.state = AgentState::Admitted;
        self.controller.enter(&self.vehicle);
        self.log(VehicleEvent::Admitted(destination));

        if emergency {
            self.state = AgentState::ClearsPresence;
            self.controller.paths().clear_emergency_present(destination);
            self.log(VehicleEvent::EmergencyCleared(destination));
        }

        self.state = AgentState::Crossing;
        self.log(VehicleEvent::Crossing);
        thread::sleep(self.vehicle.crossing);

        // Logged before the release so that crossing intervals in the
        // history never overlap with the next holder of the path.
        self.log(VehicleEvent::Exited);
        self.controller.exit(&self.vehicle);
        self.state = AgentState::Exited;
        info!("Vehicle {} crossed from {} to {} after {} attempts.",
              self.vehicle.id, self.vehicle.origin, destination, polls);
        self.outcome(polls, start)
    }
}
