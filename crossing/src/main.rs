use crossing::*;
use crossing::intersection::admission::TurnBasis;
use crossing::intersection::route::Direction;
use crossing::input::config::{Config, ConfigError};
use log::LevelFilter;
use std::path::PathBuf;
use structopt::StructOpt;

/// Crossing -- weighted round-robin intersection simulation
#[derive(StructOpt, Debug)]
#[structopt(name="crossing")]
struct Opt {
    /// Verbose mode (-v, -vv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,

    /// Vehicle list file, one `vehicle <id> <class> <lane> <intent> <seconds>` per line
    #[structopt(parse(from_os_str))]
    vehicles: Option<PathBuf>,

    /// Configuration file
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    config: Option<PathBuf>,

    /// Lane weights in seconds, in the order north east south west
    #[structopt(short = "w", long = "weights", number_of_values = 4)]
    weights: Option<Vec<f64>>,

    /// Seconds between admission attempts of a waiting vehicle
    #[structopt(short = "b", long = "backoff")]
    backoff: Option<f64>,

    /// Lane served first
    #[structopt(short = "i", long = "initial")]
    initial: Option<String>,

    /// Compare the lane turn with the vehicle's origin or destination
    #[structopt(short = "t", long = "turn")]
    turn: Option<String>,

    /// Seconds after which a waiting vehicle gives up
    #[structopt(short = "m", long = "max-wait")]
    max_wait: Option<f64>,

    /// Time scale applied to all durations
    #[structopt(short = "s", long = "scale")]
    scale: Option<f64>,

    /// Output JSON history file
    #[structopt(short = "j", long = "json", parse(from_os_str))]
    json: Option<PathBuf>,

    /// Output JSON history as JavaScript
    #[structopt(short = "J", long = "javascript", parse(from_os_str))]
    javascript: Option<PathBuf>,
}

fn configure(opt: &Opt) -> AppResult<Config> {
    let mut config = match opt.config {
        Some(ref f) => get_config(f)?,
        None => Config::default(),
    };
    if let Some(ref ws) = opt.weights {
        config.set_weights(ws)?;
    }
    if let Some(b) = opt.backoff { config.backoff = b; }
    if let Some(ref d) = opt.initial {
        config.initial = Direction::from_name(d)
            .ok_or_else(|| ConfigError::UnknownDirection(d.clone()))?;
    }
    if let Some(ref t) = opt.turn {
        config.basis = TurnBasis::from_name(t)
            .ok_or_else(|| ConfigError::UnknownBasis(t.clone()))?;
    }
    if let Some(m) = opt.max_wait { config.max_wait = Some(m); }
    if let Some(s) = opt.scale { config.scale = s; }
    config.validate()?;
    Ok(config)
}

fn run(opt :&Opt) -> AppResult<()> {
    let config = configure(opt)?;
    let vehicles = match opt.vehicles {
        Some(ref f) => get_vehicles(f)?,
        None => input::vehicles::demo_vehicles(),
    };
    if opt.verbose >= 1 {
        println!("Vehicles:");
        for x in &vehicles { println!("  - {:?}", x); }
        println!("");
    }

    let (outcomes, history) = run_with_history(&config, &vehicles)?;

    println!("# History:");
    print!("{}", output::history::timeline(&history)?);
    println!("# Vehicles:");
    for o in &outcomes {
        println!("> {} {:?} after {} attempts, {:.3}s", o.id, o.state, o.polls, o.waited.as_secs_f64());
    }

    if let Some(ref json) = opt.json {
        use std::fs::File;
        use std::io::BufWriter;
        let file = File::create(json)?;
        let mut writer = BufWriter::new(&file);
        output::json::json_history(&config, &vehicles, &history, &mut writer)?;
    }

    if let Some(ref javascript) = opt.javascript {
        use std::fs::File;
        use std::io::BufWriter;
        let file = File::create(javascript)?;
        let mut writer = BufWriter::new(&file);
        output::json::javascript_history(&config, &vehicles, &history, &mut writer)?;
    }

    Ok(())
}

pub fn main() {
    let opt = Opt::from_args();
    let level = match opt.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).parse_env("RUST_LOG").init();

    match run(&opt) {
        Ok(()) => {},
        Err(e) => {
            println!("Error:\n{}", e.as_fail());
            std::process::exit(1);
        },
    }
}
