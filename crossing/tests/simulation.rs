use crossing::*;
use crossing::input::config::Config;
use crossing::intersection::agent::AgentState;
use crossing::intersection::route::*;
use crossing::output::history::{History, LogEvent, VehicleEvent};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

fn demo(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn fast() -> Config {
    Config { scale: 0.01, ..Config::default() }
}

fn assert_no_conflicts(vehicles: &[VehicleDescriptor], history: &History) {
    let intervals = history.crossing_intervals();
    for a in vehicles {
        for b in vehicles {
            if a.id >= b.id || a.destination() != b.destination() || a.origin == b.origin {
                continue;
            }
            let (a0, a1) = intervals[&a.id];
            let (b0, b1) = intervals[&b.id];
            assert!(a1 <= b0 || b1 <= a0,
                    "vehicles {} and {} shared the path to {}: {:?} {:?}",
                    a.id, b.id, a.destination(), (a0, a1), (b0, b1));
        }
    }
}

#[test]
fn demo_traffic_crosses_safely() {
    let vehicles = input::vehicles::demo_vehicles();
    let (outcomes, history) = run_with_history(&fast(), &vehicles).unwrap();

    assert_eq!(outcomes.len(), vehicles.len());
    assert!(outcomes.iter().all(|o| o.exited()));
    for v in &vehicles {
        let events = history.vehicle_events(v.id).into_iter().map(|(_, e)| e).collect::<Vec<_>>();
        assert!(events.contains(&VehicleEvent::Admitted(v.destination())));
        assert_eq!(&events[events.len() - 2..], &[VehicleEvent::Crossing, VehicleEvent::Exited]);
    }
    assert_no_conflicts(&vehicles, &history);
}

#[test]
fn files_from_disk() {
    let config = get_config(&demo("intersection.conf")).unwrap();
    assert_eq!(config.weights, [2.0, 1.0, 3.0, 4.0]);
    let vehicles = get_vehicles(&demo("rush_hour.txt")).unwrap();
    assert_eq!(vehicles.len(), 10);

    let config = Config { scale: 0.01, ..config };
    let (outcomes, history) = run_with_history(&config, &vehicles).unwrap();
    assert!(outcomes.iter().all(|o| o.exited()));
    assert_no_conflicts(&vehicles, &history);
}

#[test]
fn same_lane_different_exits_cross_together() {
    let config = Config { weights: [60.0, 1.0, 1.0, 1.0], ..Config::default() };
    let vehicle = |id, intent| VehicleDescriptor {
        id: id,
        class: VehicleClass::Regular,
        origin: Direction::North,
        intent: intent,
        crossing: Duration::from_millis(200),
    };
    let vehicles = vec![vehicle(1, TurnIntent::Straight), vehicle(2, TurnIntent::Right)];
    let (outcomes, history) = run_with_history(&config, &vehicles).unwrap();

    assert!(outcomes.iter().all(|o| o.exited() && o.polls == 1));
    let intervals = history.crossing_intervals();
    let (a0, a1) = intervals[&1];
    let (b0, b1) = intervals[&2];
    assert!(a0 < b1 && b0 < a1, "crossings should overlap: {:?} {:?}", (a0, a1), (b0, b1));
}

#[test]
fn waiting_is_bounded_by_max_wait() {
    let config = Config {
        weights: [60.0, 1.0, 1.0, 1.0],
        backoff: 0.01,
        max_wait: Some(0.05),
        ..Config::default()
    };
    let vehicles = vec![VehicleDescriptor {
        id: 1,
        class: VehicleClass::Regular,
        origin: Direction::South,
        intent: TurnIntent::Left,
        crossing: Duration::from_millis(1),
    }];
    let (outcomes, history) = run_with_history(&config, &vehicles).unwrap();
    assert_eq!(outcomes[0].state, AgentState::GaveUp);
    assert!(history.crossing_intervals().is_empty());
}

#[test]
fn invalid_config_is_an_error() {
    let config = Config { weights: [1.0, 1.0, -1.0, 1.0], ..Config::default() };
    assert!(simulate(&config, &[], Arc::new(|_: LogEvent| {})).is_err());
}

#[test]
fn unrepresentable_durations_are_errors() {
    let ignore = || Arc::new(|_: LogEvent| {});
    let config = Config { weights: [std::f64::INFINITY, 1.0, 1.0, 1.0], ..Config::default() };
    assert!(simulate(&config, &[], ignore()).is_err());
    let config = Config { scale: 1e300, ..Config::default() };
    assert!(simulate(&config, &[], ignore()).is_err());

    let vehicles = vec![VehicleDescriptor {
        id: 1,
        class: VehicleClass::Regular,
        origin: Direction::North,
        intent: TurnIntent::Straight,
        crossing: Duration::from_secs(u64::max_value()),
    }];
    assert!(simulate(&Config { scale: 2.0, ..Config::default() }, &vehicles, ignore()).is_err());
}

#[test]
fn failed_vehicle_waits_for_the_others() {
    let vehicle = |id, origin| VehicleDescriptor {
        id: id,
        class: VehicleClass::Regular,
        origin: origin,
        intent: TurnIntent::Straight,
        crossing: Duration::from_millis(300),
    };
    let vehicles = vec![vehicle(1, Direction::East), vehicle(2, Direction::North)];
    let log = Arc::new(Mutex::new(Vec::new()));
    let logger = {
        let log = log.clone();
        Arc::new(move |e: LogEvent| {
            if e == LogEvent::Vehicle(1, VehicleEvent::Waiting) {
                panic!("logger failed");
            }
            log.lock().unwrap_or_else(PoisonError::into_inner).push(e);
        })
    };

    assert!(simulate(&Config::default(), &vehicles, logger).is_err());
    let log = log.lock().unwrap_or_else(PoisonError::into_inner);
    assert!(log.contains(&LogEvent::Vehicle(2, VehicleEvent::Exited)));
}
