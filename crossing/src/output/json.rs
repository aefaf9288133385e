use failure::Error;
use super::history::{self, LogEvent, VehicleEvent};
use crate::intersection::route::{VehicleClass, VehicleDescriptor, TurnIntent};
use crate::input::config::Config;

use std::io;

pub fn javascript_history<W: io::Write>(config: &Config,
                                        vehicles: &[VehicleDescriptor],
                                        history: &history::History,
                                        f: &mut W)
                                        -> Result<(), Error> {
    write!(f, "var data = ")?;
    json_history(config, vehicles, history, f)?;
    write!(f, ";")?;
    Ok(())
}

fn event_name(ev: &VehicleEvent) -> &'static str {
    use self::VehicleEvent::*;
    match *ev {
        EmergencyMarked(_) => "emergency_marked",
        Waiting => "waiting",
        Blocked(_) => "blocked",
        Admitted(_) => "admitted",
        EmergencyCleared(_) => "emergency_cleared",
        Crossing => "crossing",
        Exited => "exited",
        GaveUp => "gave_up",
    }
}

pub fn json_history<W: io::Write>(config: &Config,
                                  vehicles: &[VehicleDescriptor],
                                  history: &history::History,
                                  f: &mut W)
                                  -> Result<(), Error> {
    write!(f, "{{ \"config\": {{ \"weights\": [{}, {}, {}, {}], \"backoff\": {}, \
               \"initial\": \"{}\", \"scale\": {} }},\n",
           config.weights[0], config.weights[1], config.weights[2], config.weights[3],
           config.backoff, config.initial, config.scale)?;

    write!(f, "\"vehicles\":{{")?;
    let mut first = true;
    for v in vehicles {
        if first { first = false; } else { write!(f, ", ")?; }
        write!(f, "\"{}\": {{ \"class\": \"{}\", \"origin\": \"{}\", \"intent\": \"{}\", \
                   \"destination\": \"{}\", \"crossing\": {} }}",
               v.id,
               if let VehicleClass::Emergency = v.class { "emergency" } else { "regular" },
               v.origin,
               match v.intent {
                   TurnIntent::Straight => "straight",
                   TurnIntent::Left => "left",
                   TurnIntent::Right => "right",
               },
               v.destination(),
               v.crossing.as_secs_f64())?;
    }
    write!(f, "}},\n")?;

    write!(f, "\"events\":[")?;
    let mut first = true;
    for &(t, ref ev) in &history.events {
        if first { first = false; } else { write!(f, ", ")?; }
        match *ev {
            LogEvent::Turn(d) => {
                write!(f, "{{ \"time\": {}, \"event\": \"turn\", \"value\": \"{}\" }}", t, d)?;
            }
            LogEvent::Vehicle(id, ref e) => {
                write!(f, "{{ \"time\": {}, \"event\": \"{}\", \"vehicle\": {}, \"value\": \"{}\" }}",
                       t, event_name(e), id, history::describe(e))?;
            }
        }
    }
    write!(f, " ]}}")?;
    Ok(())
}
