#[macro_use] extern crate failure_derive;

pub mod input;
pub mod output;
pub mod intersection;

use intersection::admission::AdmissionController;
use intersection::agent::{AgentParams, EventLogger, Outcome, VehicleAgent};
use intersection::paths::PathRegistry;
use intersection::route::VehicleDescriptor;
use intersection::scheduler::LaneScheduler;
use input::config::{Config, ConfigError};
use output::history::{History, LogEvent};
use log::info;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// Runs every vehicle on its own thread against a fresh intersection and
/// waits for all of them. Crossing times are scaled by the configuration.
pub fn simulate(config: &Config, vehicles: &[VehicleDescriptor], logger: EventLogger)
                -> AppResult<Vec<Outcome>> {
    config.validate()?;
    let controller = Arc::new(AdmissionController::new(
        LaneScheduler::new(config.lane_weights()?, config.initial),
        PathRegistry::new(),
        config.basis));
    let params = AgentParams {
        backoff: config.poll_backoff()?,
        max_wait: config.max_wait()?,
    };
    let vehicles = vehicles.iter().map(|v| {
        Ok(VehicleDescriptor { crossing: config.scale_duration(v.crossing)?, ..v.clone() })
    }).collect::<Result<Vec<_>, ConfigError>>()?;

    info!("Starting {} vehicles, serving {} first.", vehicles.len(), config.initial);
    let handles = vehicles.into_iter().map(|vehicle| {
        VehicleAgent::new(vehicle, controller.clone(), params, logger.clone()).spawn()
    }).collect::<Vec<_>>();

    // Every thread is joined before a failure is reported, so none is left
    // running against the logger.
    let results = handles.into_iter().map(|h| h.join()).collect::<Vec<_>>();
    let mut outcomes = Vec::new();
    for r in results {
        match r {
            Ok(o) => outcomes.push(o),
            Err(_) => return Err(failure::err_msg("vehicle thread panicked")),
        }
    }
    Ok(outcomes)
}

/// `simulate`, recording every event with its time since the start.
pub fn run_with_history(config: &Config, vehicles: &[VehicleDescriptor])
                        -> AppResult<(Vec<Outcome>, History)> {
    let log = Arc::new(Mutex::new(History::default()));
    let start = Instant::now();
    let logger = {
        let log = log.clone();
        Arc::new(move |e: LogEvent| {
            let t = start.elapsed().as_secs_f64();
            log.lock().unwrap_or_else(PoisonError::into_inner).push(t, e);
        })
    };
    let outcomes = simulate(config, vehicles, logger)?;

    let mut history = std::mem::replace(
        &mut *log.lock().unwrap_or_else(PoisonError::into_inner), History::default());
    history.sort();
    Ok((outcomes, history))
}


use std::path::Path;
pub type AppResult<T> = Result<T, failure::Error>;

pub fn read_file(f :&Path) -> AppResult<String> {
  use std::fs::File;
  use std::io::prelude::*;
  use std::io::BufReader;

  let file = File::open(f)?;
  let mut file = BufReader::new(&file);
  let mut contents = String::new();
  file.read_to_string(&mut contents)?;
  Ok(contents)
}

pub fn get_config(f :&Path) -> AppResult<Config> {
    let contents = read_file(f)?;
    let c = input::config::parse_config(&contents)?;
    Ok(c)
}

pub fn get_vehicles(f :&Path) -> AppResult<Vec<VehicleDescriptor>> {
    let contents = read_file(f)?;
    let vs = input::vehicles::parse_vehicles(&contents)?;
    Ok(vs)
}
