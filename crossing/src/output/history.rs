use crate::intersection::admission::Rejection;
use crate::intersection::paths::BlockReason;
use crate::intersection::route::{Direction, VehicleId};
use ordered_float::OrderedFloat;
use std::collections::HashMap;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VehicleEvent {
    EmergencyMarked(Direction),
    Waiting,
    Blocked(Rejection),
    Admitted(Direction),
    EmergencyCleared(Direction),
    Crossing,
    Exited,
    GaveUp,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LogEvent {
    Turn(Direction),
    Vehicle(VehicleId, VehicleEvent),
}

/// Log events with their time in seconds since the start of the run.
#[derive(Debug, Default)]
pub struct History {
    pub events: Vec<(f64, LogEvent)>,
}

impl History {
    pub fn push(&mut self, t: f64, ev: LogEvent) {
        self.events.push((t, ev));
    }

    /// Events are pushed from many threads; put them back in time order.
    pub fn sort(&mut self) {
        self.events.sort_by_key(|&(t, _)| OrderedFloat(t));
    }

    pub fn vehicle_events(&self, id: VehicleId) -> Vec<(f64, VehicleEvent)> {
        self.events.iter().filter_map(|&(t, ev)| match ev {
            LogEvent::Vehicle(v, e) if v == id => Some((t, e)),
            _ => None,
        }).collect()
    }

    /// Interval each vehicle spent on its path, from entering to leaving.
    pub fn crossing_intervals(&self) -> HashMap<VehicleId, (f64, f64)> {
        let mut started = HashMap::new();
        let mut intervals = HashMap::new();
        for &(t, ev) in &self.events {
            match ev {
                LogEvent::Vehicle(id, VehicleEvent::Crossing) => { started.insert(id, t); }
                LogEvent::Vehicle(id, VehicleEvent::Exited) => {
                    if let Some(s) = started.remove(&id) {
                        intervals.insert(id, (s, t));
                    }
                }
                _ => {}
            }
        }
        intervals
    }
}

pub fn describe(ev: &VehicleEvent) -> String {
    use self::VehicleEvent::*;
    match *ev {
        EmergencyMarked(d) => format!("emergency waiting for {}", d),
        Waiting => "waiting".to_string(),
        Blocked(Rejection::NotLaneTurn { serving }) => format!("blocked, serving {}", serving),
        Blocked(Rejection::Path(BlockReason::Emergency)) => "blocked, yielding to emergency".to_string(),
        Blocked(Rejection::Path(BlockReason::HeldBy(d))) => format!("blocked, path held by {}", d),
        Admitted(d) => format!("admitted towards {}", d),
        EmergencyCleared(d) => format!("emergency cleared for {}", d),
        Crossing => "crossing".to_string(),
        Exited => "exited".to_string(),
        GaveUp => "gave up".to_string(),
    }
}

/// One event per line on the format `time vehicle event`, with `-` in
/// place of the vehicle for lane turn changes.
pub fn timeline(h: &History) -> Result<String, failure::Error> {
    use std::fmt::Write;
    let mut s = String::new();
    for &(t, ref ev) in &h.events {
        match *ev {
            LogEvent::Turn(d) => write!(s, "{:.3} - serving {}\n", t, d)?,
            LogEvent::Vehicle(id, ref e) => write!(s, "{:.3} {} {}\n", t, id, describe(e))?,
        }
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;

    #[test]
    fn intervals_from_unordered_log() {
        let mut h = History::default();
        h.push(0.5, LogEvent::Vehicle(2, VehicleEvent::Crossing));
        h.push(0.1, LogEvent::Vehicle(1, VehicleEvent::Crossing));
        h.push(0.3, LogEvent::Vehicle(1, VehicleEvent::Exited));
        h.push(0.2, LogEvent::Turn(Direction::East));
        h.push(0.9, LogEvent::Vehicle(2, VehicleEvent::Exited));
        h.push(0.7, LogEvent::Vehicle(3, VehicleEvent::Crossing));
        h.sort();

        assert_eq!(h.events[1], (0.2, LogEvent::Turn(Direction::East)));
        assert_eq!(h.crossing_intervals(), hashmap!{ 1 => (0.1, 0.3), 2 => (0.5, 0.9) });
        assert_eq!(h.vehicle_events(1), vec![(0.1, VehicleEvent::Crossing),
                                             (0.3, VehicleEvent::Exited)]);
    }

    #[test]
    fn timeline_lines() {
        let mut h = History::default();
        h.push(0.0, LogEvent::Vehicle(4, VehicleEvent::Waiting));
        h.push(1.25, LogEvent::Turn(Direction::South));
        h.push(2.0, LogEvent::Vehicle(4, VehicleEvent::Blocked(
            Rejection::Path(BlockReason::HeldBy(Direction::West)))));
        let s = timeline(&h).unwrap();
        assert_eq!(s, "0.000 4 waiting\n1.250 - serving south\n2.000 4 blocked, path held by west\n");
    }
}
