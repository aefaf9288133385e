use crate::intersection::admission::TurnBasis;
use crate::intersection::route::Direction;
use crate::intersection::scheduler::Weights;
use regex::Regex;
use std::time::Duration;

/// Simulation parameters. Durations are given in seconds and stretched by
/// `scale` when converted for use.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub weights: [f64; 4],
    pub backoff: f64,
    pub initial: Direction,
    pub basis: TurnBasis,
    pub max_wait: Option<f64>,
    pub scale: f64,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            weights: [2.0, 1.0, 3.0, 4.0],
            backoff: 3.0,
            initial: Direction::North,
            basis: TurnBasis::Origin,
            max_wait: None,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    #[fail(display = "error in regular expression: {}", _0)]
    RegexError(String),
    #[fail(display = "error converting number: {}", _0)]
    NumberError(String),
    #[fail(display = "expected 4 lane weights, got {}", _0)]
    WeightCount(usize),
    #[fail(display = "{} must be positive", _0)]
    NotPositive(String),
    #[fail(display = "{} must not be negative", _0)]
    Negative(String),
    #[fail(display = "{} is out of range", _0)]
    OutOfRange(String),
    #[fail(display = "unknown direction: {}", _0)]
    UnknownDirection(String),
    #[fail(display = "unknown turn basis: {}", _0)]
    UnknownBasis(String),
    #[fail(display = "unrecognized configuration: {}", _0)]
    Unrecognized(String),
}

const LANES: [&str; 4] = ["north", "east", "south", "west"];

fn number(s: &str) -> Result<f64, ConfigError> {
    s.parse::<f64>().map_err(|_e| ConfigError::NumberError(s.to_string()))
}

impl Config {
    pub fn set_weights(&mut self, ws: &[f64]) -> Result<(), ConfigError> {
        if ws.len() != 4 {
            return Err(ConfigError::WeightCount(ws.len()));
        }
        self.weights.copy_from_slice(ws);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (w, d) in self.weights.iter().zip(&LANES) {
            if !w.is_finite() {
                return Err(ConfigError::OutOfRange(format!("weight of {} lane", d)));
            }
            if !(*w > 0.0) {
                return Err(ConfigError::NotPositive(format!("weight of {} lane", d)));
            }
        }
        if !self.scale.is_finite() {
            return Err(ConfigError::OutOfRange("time scale".to_string()));
        }
        if !(self.scale > 0.0) {
            return Err(ConfigError::NotPositive("time scale".to_string()));
        }
        if !self.backoff.is_finite() {
            return Err(ConfigError::OutOfRange("backoff".to_string()));
        }
        if !(self.backoff >= 0.0) {
            return Err(ConfigError::Negative("backoff".to_string()));
        }
        if let Some(m) = self.max_wait {
            if !m.is_finite() {
                return Err(ConfigError::OutOfRange("maximum wait".to_string()));
            }
            if !(m >= 0.0) {
                return Err(ConfigError::Negative("maximum wait".to_string()));
            }
        }

        // Finite values can still overflow, or vanish, once scaled.
        for (w, d) in self.lane_weights()?.iter().zip(&LANES) {
            if *w == Duration::from_secs(0) {
                return Err(ConfigError::NotPositive(format!("scaled weight of {} lane", d)));
            }
        }
        self.poll_backoff()?;
        self.max_wait()?;
        Ok(())
    }

    fn duration(&self, what: &str, secs: f64) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(secs * self.scale)
            .map_err(|_e| ConfigError::OutOfRange(what.to_string()))
    }

    pub fn scale_duration(&self, d: Duration) -> Result<Duration, ConfigError> {
        self.duration("crossing time", d.as_secs_f64())
    }

    pub fn lane_weights(&self) -> Result<Weights, ConfigError> {
        let mut ws = [Duration::from_secs(0); 4];
        for (i, d) in LANES.iter().enumerate() {
            ws[i] = self.duration(&format!("weight of {} lane", d), self.weights[i])?;
        }
        Ok(ws)
    }

    pub fn poll_backoff(&self) -> Result<Duration, ConfigError> {
        self.duration("backoff", self.backoff)
    }

    pub fn max_wait(&self) -> Result<Option<Duration>, ConfigError> {
        match self.max_wait {
            Some(m) => Ok(Some(self.duration("maximum wait", m)?)),
            None => Ok(None),
        }
    }
}

/// Parses the configuration format, starting from the defaults.
///
/// * weights 2 1 3 4
/// * backoff 3.0
/// * initial north
/// * turn origin
/// * max_wait 120
/// * scale 0.1
///
pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let re = |s: &str| Regex::new(s).map_err(|e| ConfigError::RegexError(format!("{:?}", e)));
    let weights_re = re(r"^\s*weights((?:\s+[^\s]+)*)\s*$")?;
    let value_re = re(r"^\s*(backoff|initial|turn|max_wait|scale)\s+([^\s]+)\s*$")?;

    for line in input.lines() {
        let line = match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        };
        if line.trim().is_empty() {
            continue;
        }
        if let Some(groups) = weights_re.captures(line) {
            let ws = groups[1].split_whitespace().map(number).collect::<Result<Vec<_>, _>>()?;
            config.set_weights(&ws)?;
            continue;
        }
        if let Some(groups) = value_re.captures(line) {
            let value = &groups[2];
            match &groups[1] {
                "backoff" => config.backoff = number(value)?,
                "initial" => config.initial = Direction::from_name(value)
                    .ok_or_else(|| ConfigError::UnknownDirection(value.to_string()))?,
                "turn" => config.basis = TurnBasis::from_name(value)
                    .ok_or_else(|| ConfigError::UnknownBasis(value.to_string()))?,
                "max_wait" => config.max_wait = Some(number(value)?),
                _ => config.scale = number(value)?,
            }
            continue;
        }
        return Err(ConfigError::Unrecognized(line.to_string()));
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_file() {
        let c = parse_config("# lanes\n\nweights 1 2.5 3 4\nbackoff 0.5\ninitial west  # start here\n\
                              turn destination\nmax_wait 10\nscale 0.1\n").unwrap();
        assert_eq!(c, Config {
            weights: [1.0, 2.5, 3.0, 4.0],
            backoff: 0.5,
            initial: Direction::West,
            basis: TurnBasis::Destination,
            max_wait: Some(10.0),
            scale: 0.1,
        });
        assert_eq!(c.poll_backoff(), Ok(Duration::from_millis(50)));
        assert_eq!(c.lane_weights().unwrap()[1], Duration::from_millis(250));
        assert_eq!(c.max_wait(), Ok(Some(Duration::from_secs(1))));
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn bad_lines() {
        assert_eq!(parse_config("weights 1 2 3"), Err(ConfigError::WeightCount(3)));
        assert_eq!(parse_config("weights 1 0 3 4"),
                   Err(ConfigError::NotPositive("weight of east lane".to_string())));
        assert_eq!(parse_config("weights 1 x 3 4"), Err(ConfigError::NumberError("x".to_string())));
        assert_eq!(parse_config("initial up"), Err(ConfigError::UnknownDirection("up".to_string())));
        assert_eq!(parse_config("turn sideways"), Err(ConfigError::UnknownBasis("sideways".to_string())));
        assert_eq!(parse_config("backoff -1"), Err(ConfigError::Negative("backoff".to_string())));
        assert_eq!(parse_config("backoff inf"), Err(ConfigError::OutOfRange("backoff".to_string())));
        assert_eq!(parse_config("weights 1 1 1e300 1"),
                   Err(ConfigError::OutOfRange("weight of south lane".to_string())));
        assert_eq!(parse_config("lanes 4"), Err(ConfigError::Unrecognized("lanes 4".to_string())));
    }

    #[test]
    fn durations_must_fit() {
        let out_of_range = |s: &str| Err(ConfigError::OutOfRange(s.to_string()));
        assert_eq!(parse_config("weights inf 1 1 1"), out_of_range("weight of north lane"));
        assert_eq!(parse_config("weights 1 1 1 1e300"), out_of_range("weight of west lane"));
        assert_eq!(parse_config("scale 1e300"), out_of_range("weight of north lane"));
        assert_eq!(parse_config("scale infinity"), out_of_range("time scale"));
        assert_eq!(parse_config("backoff inf"), out_of_range("backoff"));
        assert_eq!(parse_config("max_wait 1e300"), out_of_range("maximum wait"));
        assert_eq!(parse_config("weights 1e-300 1 1 1"),
                   Err(ConfigError::NotPositive("scaled weight of north lane".to_string())));

        let c = Config { scale: 1e10, ..Config::default() };
        assert_eq!(c.scale_duration(Duration::from_secs(u64::max_value())),
                   Err(ConfigError::OutOfRange("crossing time".to_string())));
    }
}
