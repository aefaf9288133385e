use crate::intersection::route::*;
use regex::Regex;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Fail, PartialEq)]
pub enum VehicleError {
    #[fail(display = "error in regular expression: {}", _0)]
    RegexError(String),
    #[fail(display = "error converting number")]
    NumberError,
    #[fail(display = "vehicle ids must be positive")]
    ZeroId,
    #[fail(display = "duplicate vehicle id {}", _0)]
    DuplicateId(VehicleId),
    #[fail(display = "unrecognized vehicle: {}", _0)]
    Unrecognized(String),
}

/// Parses vehicle list format, one vehicle per line
///
/// * vehicle 1 regular north straight 2.0
/// * vehicle 2 emergency east left 1.5
///
pub fn parse_vehicles(input: &str) -> Result<Vec<VehicleDescriptor>, VehicleError> {
    let mut vehicles = Vec::new();
    let mut ids = HashSet::new();
    let vehicle_re = Regex::new(r"(?xi) ^ \s* vehicle \s+ (?P<id>\d+) \s+
            (?P<class>regular|emergency) \s+
            (?P<origin>north|east|south|west) \s+
            (?P<intent>straight|left|right) \s+
            (?P<time>[\d\.]+) \s* $").map_err(|e| VehicleError::RegexError(format!("{:?}", e)))?;
    let blank_re = Regex::new(r"^\s*(#.*)?$")
        .map_err(|e| VehicleError::RegexError(format!("{:?}", e)))?;

    for line in input.lines() {
        if blank_re.is_match(line) {
            continue;
        }
        let groups = match vehicle_re.captures(line) {
            Some(g) => g,
            None => return Err(VehicleError::Unrecognized(line.to_string())),
        };
        let id = groups["id"].parse::<VehicleId>().map_err(|_e| VehicleError::NumberError)?;
        if id == 0 {
            return Err(VehicleError::ZeroId);
        }
        if !ids.insert(id) {
            return Err(VehicleError::DuplicateId(id));
        }
        let time = groups["time"].parse::<f64>().map_err(|_e| VehicleError::NumberError)?;
        let crossing = Duration::try_from_secs_f64(time).map_err(|_e| VehicleError::NumberError)?;
        let unrecognized = || VehicleError::Unrecognized(line.to_string());
        vehicles.push(VehicleDescriptor {
            id: id,
            class: VehicleClass::from_name(&groups["class"]).ok_or_else(unrecognized)?,
            origin: Direction::from_name(&groups["origin"]).ok_or_else(unrecognized)?,
            intent: TurnIntent::from_name(&groups["intent"]).ok_or_else(unrecognized)?,
            crossing: crossing,
        });
    }

    Ok(vehicles)
}

/// Traffic used when no vehicle list is given.
pub fn demo_vehicles() -> Vec<VehicleDescriptor> {
    use crate::intersection::route::Direction::*;
    use crate::intersection::route::TurnIntent::*;
    use crate::intersection::route::VehicleClass::*;
    let list = [
        (Regular, North, Straight, 2.0),
        (Regular, East, Left, 1.0),
        (Emergency, South, Straight, 1.5),
        (Regular, West, Right, 2.0),
        (Regular, North, Right, 1.0),
        (Regular, South, Left, 2.5),
        (Emergency, East, Right, 1.0),
        (Regular, West, Straight, 1.5),
    ];
    list.iter().enumerate().map(|(i, &(class, origin, intent, t))| VehicleDescriptor {
        id: i + 1,
        class: class,
        origin: origin,
        intent: intent,
        crossing: Duration::from_secs_f64(t),
    }).collect()
}
