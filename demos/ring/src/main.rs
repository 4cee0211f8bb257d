//! ring: the smallest tsim demo.
//!
//! Two cars loop around a four-intersection network with one traffic light.
//! Every tick prints the delta, one line per car, and one line per light.
//! Pass `--scenario` to run a TOML scenario instead of the built-in network.

mod network;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use tsim_core::{SimConfig, SimRng, TimeStep};
use tsim_engine::{NoopObserver, Scenario, Sim, SimBuilder, SimObserver, UPDATE};
use tsim_graph::Graph;
use tsim_output::{CsvWriter, SimOutputObserver};
use tsim_vehicle::VehicleSpec;

#[derive(Debug, Parser)]
#[command(version, about = "Cars, roads, and traffic lights on a small directed network")]
struct Args {
    /// TOML scenario to run instead of the built-in network.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Master RNG seed.  Overrides the scenario's.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many simulated seconds.
    #[arg(long, default_value_t = 300.0)]
    horizon: f64,

    /// Run exactly this many ticks, ignoring the horizon.
    #[arg(long)]
    ticks: Option<u64>,

    /// Fixed tick length in simulated seconds.
    #[arg(long, default_value_t = 1.0)]
    step: f64,

    /// Measure each tick's delta from the wall clock, capped at this many
    /// ticks per second.
    #[arg(long, value_name = "MAX_TPS")]
    real_time: Option<f64>,

    /// Extra cars on random shortest routes.
    #[arg(long, default_value_t = 0)]
    extra_cars: usize,

    /// Directory for CSV snapshots.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the per-tick dumps.
    #[arg(long)]
    quiet: bool,
}

const DEFAULT_SEED: u64 = 42;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut sim = match &args.scenario {
        Some(path) => {
            let mut scenario = Scenario::load(path)?;
            if let Some(seed) = args.seed {
                scenario.sim.seed = seed;
            }
            scenario.build()?
        }
        None => build_demo(&args)?,
    };
    add_extra_cars(&mut sim, &args)?;

    println!(
        "Network: {} vertices, {} edges | lights: {} | cars: {}",
        sim.graph().vertex_count(),
        sim.graph().edge_count(),
        sim.lights().occupied(),
        sim.vehicles().len(),
    );

    if !args.quiet {
        sim.on(UPDATE, |ev| {
            let mut out = io::stdout().lock();
            let result = writeln!(out, "Delta: {:.3}", ev.delta)
                .and_then(|()| ev.view.dump_cars(&mut out))
                .and_then(|()| ev.view.dump_traffic_lights(&mut out))
                .and_then(|()| writeln!(out));
            if let Err(e) = result {
                log::warn!("dump failed: {e}");
            }
        });
    }

    let wall = Instant::now();
    match &args.output {
        Some(dir) => {
            std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            let mut obs = SimOutputObserver::new(CsvWriter::new(dir)?);
            drive(&mut sim, &args, &mut obs)?;
            if let Some(e) = obs.take_error() {
                eprintln!("output error: {e}");
            }
        }
        None => drive(&mut sim, &args, &mut NoopObserver)?,
    }

    println!(
        "Done: {} ticks, {:.1} simulated s, {} cars still driving ({:.2?} wall)",
        sim.cycle(),
        sim.clock().elapsed_secs,
        sim.vehicles().len(),
        wall.elapsed(),
    );
    Ok(())
}

fn build_demo(args: &Args) -> Result<Sim> {
    let time_step = match args.real_time {
        Some(tps) => TimeStep::RealTime { max_tps: Some(tps) },
        None => TimeStep::Fixed { secs: args.step },
    };
    let config = SimConfig {
        time_step,
        horizon_secs: Some(args.horizon),
        seed: args.seed.unwrap_or(DEFAULT_SEED),
        ..SimConfig::default()
    };

    let graph = network::build_graph()?;
    let lights = network::build_lights(&graph)?;
    let mut sim = SimBuilder::new(config, graph)
        .lights(lights)
        .roads(network::build_roads())
        .build()?;
    for car in network::cars() {
        sim.add_car(car)?;
    }
    Ok(sim)
}

/// Cars between random distinct vertices, skipping unreachable pairs.
fn add_extra_cars(sim: &mut Sim, args: &Args) -> Result<()> {
    if args.extra_cars == 0 {
        return Ok(());
    }
    let mut rng = SimRng::new(sim.config().seed).child(1);
    let vertices = sim.graph().vertices();
    let mut added = 0;
    for attempt in 0..args.extra_cars * 10 {
        if added == args.extra_cars {
            break;
        }
        let (Some(&from), Some(&to)) = (rng.choose(&vertices), rng.choose(&vertices)) else {
            break;
        };
        if from == to {
            continue;
        }
        let Ok(route) = sim.plan_route(from, to) else {
            log::debug!("attempt {attempt}: no route {from} -> {to}");
            continue;
        };
        let spec = VehicleSpec::new(rng.gen_range(60.0..120.0), rng.gen_range(0.0..0.5), route.vertices)
            .labelled(format!("extra{added}"));
        sim.add_car(spec)?;
        added += 1;
    }
    if added < args.extra_cars {
        log::warn!("placed {added} of {} extra cars", args.extra_cars);
    }
    Ok(())
}

fn drive<O: SimObserver>(sim: &mut Sim, args: &Args, obs: &mut O) -> Result<()> {
    match args.ticks {
        Some(n) => sim.run_ticks(n, obs)?,
        None => {
            let reason = sim.run(obs)?;
            log::info!("stopped: {reason:?}");
        }
    }
    Ok(())
}
