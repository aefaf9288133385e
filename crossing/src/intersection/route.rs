use std::fmt;
use std::time::Duration;

pub type VehicleId = usize;

/// Approach (and exit) directions of the intersection, in the fixed
/// order the lane scheduler rotates through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

pub const DIRECTIONS: [Direction; 4] = [Direction::North, Direction::East,
                                        Direction::South, Direction::West];

impl Direction {
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn next(self) -> Direction {
        DIRECTIONS[(self.index() + 1) % DIRECTIONS.len()]
    }

    pub fn from_name(s: &str) -> Option<Direction> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Direction::North),
            "east" | "e" => Some(Direction::East),
            "south" | "s" => Some(Direction::South),
            "west" | "w" => Some(Direction::West),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TurnIntent {
    Straight,
    Left,
    Right,
}

pub const INTENTS: [TurnIntent; 3] = [TurnIntent::Straight, TurnIntent::Left, TurnIntent::Right];

impl TurnIntent {
    pub fn from_name(s: &str) -> Option<TurnIntent> {
        match s.to_lowercase().as_str() {
            "straight" => Some(TurnIntent::Straight),
            "left" => Some(TurnIntent::Left),
            "right" => Some(TurnIntent::Right),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    Regular,
    Emergency,
}

impl VehicleClass {
    pub fn from_name(s: &str) -> Option<VehicleClass> {
        match s.to_lowercase().as_str() {
            "regular" => Some(VehicleClass::Regular),
            "emergency" => Some(VehicleClass::Emergency),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDescriptor {
    pub id: VehicleId,
    pub class: VehicleClass,
    pub origin: Direction,
    pub intent: TurnIntent,
    pub crossing: Duration,
}

impl VehicleDescriptor {
    pub fn destination(&self) -> Direction {
        resolve(self.origin, self.intent)
    }

    pub fn is_emergency(&self) -> bool {
        self.class == VehicleClass::Emergency
    }
}

/// Exit direction for a vehicle approaching from `origin`, under
/// right-hand traffic. A vehicle coming from the north travels south,
/// so its right-hand turn leaves towards the west.
pub fn resolve(origin: Direction, intent: TurnIntent) -> Direction {
    use self::Direction::*;
    use self::TurnIntent::*;
    match (origin, intent) {
        (North, Straight) => South,
        (North, Right) => West,
        (North, Left) => East,

        (East, Straight) => West,
        (East, Right) => North,
        (East, Left) => South,

        (South, Straight) => North,
        (South, Right) => East,
        (South, Left) => West,

        (West, Straight) => East,
        (West, Right) => South,
        (West, Left) => North,
    }
}
