//! Integration tests for tsim-engine.

use std::cell::RefCell;
use std::rc::Rc;

use tsim_core::{EdgeId, SimConfig, SparseIndex, Tick, TimeStep, VertexId};
use tsim_graph::{AnyGraph, Graph, GraphKind, RoadAttributes, RoadTable};
use tsim_signal::SignalController;
use tsim_vehicle::VehicleSpec;

use crate::{Sim, SimBuilder, SimObserver, SimView, TickSummary};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn v(n: u32) -> VertexId {
    VertexId(n)
}

fn route(ids: &[u32]) -> Vec<VertexId> {
    ids.iter().copied().map(VertexId).collect()
}

fn config() -> SimConfig {
    SimConfig { seed: 42, ..SimConfig::default() }
}

/// Edges 0→1 1000, 0→2 1400, 1→2 1000, 2→3 1000, 3→0 1000 (ids 0..=4).
fn ring() -> AnyGraph {
    let mut g = AnyGraph::new(GraphKind::Dense);
    for i in 0..4 {
        g.add_vertex(v(i)).unwrap();
    }
    g.add_edge(v(0), v(1), 1000.0).unwrap();
    g.add_edge(v(0), v(2), 1400.0).unwrap();
    g.add_edge(v(1), v(2), 1000.0).unwrap();
    g.add_edge(v(2), v(3), 1000.0).unwrap();
    g.add_edge(v(3), v(0), 1000.0).unwrap();
    g
}

fn ring_sim(config: SimConfig) -> Sim {
    SimBuilder::new(config, ring()).build().unwrap()
}

/// The two-car demo: a light at 2 gating 2→3, a slow labelled road 0→2.
fn demo_sim(seed: u64) -> Sim {
    let mut lights = SparseIndex::new();
    lights.set(2, SignalController::new(0.5, 90.0, [EdgeId(3)]).unwrap());
    let mut roads = RoadTable::new();
    roads.insert(v(0), v(2), RoadAttributes::labelled("kar").with_speed_factor(0.5));
    let cfg = SimConfig { seed, ..SimConfig::default() };
    let mut sim = SimBuilder::new(cfg, ring()).lights(lights).roads(roads).build().unwrap();
    sim.add_car(VehicleSpec::new(100.0, 0.5, route(&[0, 1, 2, 3, 0, 1, 2, 3])).labelled("car1"))
        .unwrap();
    sim.add_car(VehicleSpec::new(90.0, 0.7, route(&[0, 2, 3, 0, 2, 3])).labelled("car2"))
        .unwrap();
    sim
}

#[derive(Default)]
struct Counting {
    starts:    Vec<Tick>,
    ends:      Vec<TickSummary>,
    snapshots: Vec<(Tick, usize)>,
    sim_ends:  Vec<Tick>,
}

impl SimObserver for Counting {
    fn on_tick_start(&mut self, tick: Tick) {
        self.starts.push(tick);
    }
    fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
        self.ends.push(*summary);
    }
    fn on_snapshot(&mut self, tick: Tick, view: &SimView<'_>) {
        self.snapshots.push((tick, view.vehicles.len()));
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        self.sim_ends.push(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::{EngineState, SimError};

    #[test]
    fn builds_successfully_with_defaults() {
        let sim = ring_sim(config());
        assert_eq!(sim.state(), EngineState::Configured);
        assert_eq!(sim.cycle(), 0);
        assert!(sim.vehicles().is_empty());
        assert_eq!(sim.lights().occupied(), 0);
        assert_eq!(sim.graph().edge_count(), 5);
    }

    #[test]
    fn invalid_config_rejected() {
        let cfg = SimConfig { time_step: TimeStep::Fixed { secs: 0.0 }, ..config() };
        let err = SimBuilder::new(cfg, ring()).build().unwrap_err();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn light_must_control_its_own_outgoing_edges() {
        let mut lights = SparseIndex::new();
        // Edge 3 is 2→3, not an edge leaving vertex 1.
        lights.set(1, SignalController::new(0.5, 10.0, [EdgeId(3)]).unwrap());
        let err = SimBuilder::new(config(), ring()).lights(lights).build().unwrap_err();
        assert!(matches!(err, SimError::UnknownEdge { at, edge } if at == v(1) && edge == EdgeId(3)));
    }

    #[test]
    fn light_at_unknown_vertex_rejected() {
        let mut lights = SparseIndex::new();
        lights.set(9, SignalController::new(0.5, 10.0, Vec::new()).unwrap());
        let err = SimBuilder::new(config(), ring()).lights(lights).build().unwrap_err();
        assert!(matches!(err, SimError::Graph(_)));
    }

    #[test]
    fn adjusting_light_books_waits_on_the_uncontrolled_side() {
        let mut lights = SparseIndex::new();
        // Gates 0→1 (edge 0); 0→2 gets the opposite phase.
        let light = SignalController::new(0.5, 10.0, [EdgeId(0)]).unwrap().with_auto_adjust(true);
        lights.set(0, light);
        let mut sim = SimBuilder::new(config(), ring()).lights(lights).build().unwrap();
        sim.add_car(VehicleSpec::new(1000.0, 0.0, route(&[3, 0, 2]))).unwrap();

        let mut halted = 0;
        for _ in 0..10 {
            halted += sim.step_with(1.0).unwrap().halted;
        }
        assert!(halted > 0);
        let light = sim.lights().get(0).unwrap();
        assert_eq!(light.controlled_wait_secs(), 0.0);
        assert_eq!(light.uncontrolled_wait_secs(), halted as f64);
        assert_eq!(light.duty_cycle(), 0.5);
    }

    #[test]
    fn invalid_road_attributes_rejected() {
        let mut roads = RoadTable::new();
        roads.insert(v(0), v(1), RoadAttributes::default().with_speed_factor(0.0));
        let err = SimBuilder::new(config(), ring()).roads(roads).build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn auto_signals_cover_busy_intersections_only() {
        // Star: 0 → 1, 2, 3, 4; ring-ish tail 1 → 2.
        let mut g = AnyGraph::new(GraphKind::Sparse);
        for i in 0..5 {
            g.add_vertex(v(i)).unwrap();
        }
        for to in [4, 2, 3, 1] {
            g.add_edge(v(0), v(to), 10.0).unwrap();
        }
        g.add_edge(v(1), v(2), 10.0).unwrap();
        let to_1 = g.edge_id(v(0), v(1)).unwrap();
        let to_2 = g.edge_id(v(0), v(2)).unwrap();

        let sim = SimBuilder::new(config(), g).auto_signals(60.0).build().unwrap();
        assert_eq!(sim.lights().occupied(), 1);
        let light = sim.lights().get(0).unwrap();
        assert_eq!(light.duty_cycle(), 0.5);
        assert_eq!(light.period(), 60.0);
        assert_eq!(light.controlled().iter().copied().collect::<Vec<_>>(), {
            let mut e = vec![to_1, to_2];
            e.sort();
            e
        });
    }

    #[test]
    fn auto_signals_keep_existing_lights() {
        let mut g = AnyGraph::new(GraphKind::Dense);
        for i in 0..4 {
            g.add_vertex(v(i)).unwrap();
        }
        for to in 1..4 {
            g.add_edge(v(0), v(to), 5.0).unwrap();
        }
        let mut lights = SparseIndex::new();
        lights.set(0, SignalController::new(0.25, 30.0, Vec::new()).unwrap());
        let sim = SimBuilder::new(config(), g).lights(lights).auto_signals(60.0).build().unwrap();
        assert_eq!(sim.lights().get(0).unwrap().duty_cycle(), 0.25);
    }
}

// ── Lifecycle and stop conditions ─────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;
    use crate::{EngineState, SimError, StopReason};

    #[test]
    fn step_moves_to_running() {
        let mut sim = ring_sim(config());
        sim.step().unwrap();
        assert_eq!(sim.state(), EngineState::Running);
        assert_eq!(sim.cycle(), 1);
        assert_eq!(sim.clock().elapsed_secs, 1.0);
    }

    #[test]
    fn horizon_counts_simulated_seconds() {
        let cfg = SimConfig {
            time_step: TimeStep::Fixed { secs: 0.5 },
            horizon_secs: Some(5.0),
            ..config()
        };
        let mut sim = ring_sim(cfg);
        assert_eq!(sim.start().unwrap(), StopReason::Horizon);
        assert_eq!(sim.cycle(), 10);
        assert_eq!(sim.state(), EngineState::Stopped);
    }

    #[test]
    fn tenth_second_steps_stop_exactly_at_horizon() {
        let cfg = SimConfig {
            time_step: TimeStep::Fixed { secs: 0.1 },
            horizon_secs: Some(1.0),
            ..config()
        };
        let mut sim = ring_sim(cfg);
        assert_eq!(sim.start().unwrap(), StopReason::Horizon);
        assert_eq!(sim.cycle(), 10);
    }

    #[test]
    fn stopped_engine_refuses_to_run() {
        let cfg = SimConfig { horizon_secs: Some(1.0), ..config() };
        let mut sim = ring_sim(cfg);
        sim.start().unwrap();
        assert!(matches!(sim.start(), Err(SimError::InvalidState(EngineState::Stopped))));
        assert!(matches!(sim.step(), Err(SimError::InvalidState(_))));
        assert!(matches!(sim.step_with(1.0), Err(SimError::InvalidState(_))));
    }

    #[test]
    fn idle_stop_after_last_vehicle_finishes() {
        let cfg = SimConfig { stop_when_idle: true, ..config() };
        let mut sim = ring_sim(cfg);
        sim.add_car(VehicleSpec::new(500.0, 0.0, route(&[2, 3]))).unwrap();
        assert_eq!(sim.start().unwrap(), StopReason::Idle);
        assert_eq!(sim.cycle(), 2);
        assert!(sim.vehicles().is_empty());
    }

    #[test]
    fn idle_with_no_vehicles_stops_immediately() {
        let cfg = SimConfig { stop_when_idle: true, ..config() };
        let mut sim = ring_sim(cfg);
        assert_eq!(sim.start().unwrap(), StopReason::Idle);
        assert_eq!(sim.cycle(), 0);
    }

    #[test]
    fn stop_handle_from_update_handler() {
        let mut sim = ring_sim(config());
        let handle = sim.stop_handle();
        sim.on("update", move |ev| {
            if ev.tick == Tick(2) {
                handle.stop();
            }
        });
        assert_eq!(sim.start().unwrap(), StopReason::Handle);
        assert_eq!(sim.cycle(), 3);
    }

    #[test]
    fn step_with_rejects_bad_delta() {
        let mut sim = ring_sim(config());
        for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(sim.step_with(d), Err(SimError::Config(_))));
        }
        assert_eq!(sim.cycle(), 0);
    }

    #[test]
    fn real_time_step_respects_max_tps() {
        let cfg = SimConfig { time_step: TimeStep::RealTime { max_tps: Some(200.0) }, ..config() };
        let mut sim = ring_sim(cfg);
        for _ in 0..3 {
            let summary = sim.step().unwrap();
            assert!(summary.delta >= 1.0 / 200.0);
        }
    }
}

// ── Vehicles in the engine ────────────────────────────────────────────────────

#[cfg(test)]
mod traffic {
    use super::*;
    use crate::{SimError, StopReason};

    /// Max speed 100, no misbehavior, ten unit ticks: exactly at the end of
    /// the first edge, still on it.
    #[test]
    fn four_cycle_scenario() {
        let mut sim = ring_sim(config());
        sim.add_car(VehicleSpec::new(100.0, 0.0, route(&[0, 1, 2, 3, 0]))).unwrap();
        for _ in 0..10 {
            sim.step_with(1.0).unwrap();
        }
        let car = &sim.vehicles()[0];
        assert_eq!(car.progress(), 1000.0);
        assert_eq!(car.current_edge(), Some((v(0), v(1))));
    }

    #[test]
    fn four_cycle_runs_to_completion() {
        let cfg = SimConfig { stop_when_idle: true, ..config() };
        let mut sim = ring_sim(cfg);
        sim.add_car(VehicleSpec::new(100.0, 0.0, route(&[0, 1, 2, 3, 0]))).unwrap();
        assert_eq!(sim.start().unwrap(), StopReason::Idle);
        // Four 1000-long edges at 100/s.
        assert_eq!(sim.cycle(), 40);
    }

    #[test]
    fn closed_light_halts_and_accumulates_wait() {
        let mut lights = SparseIndex::new();
        // 1→2 is edge 2.  Closed for phases [5, 10).
        lights.set(1, SignalController::new(0.5, 10.0, [EdgeId(2)]).unwrap().with_phase(4.0));
        let mut sim = SimBuilder::new(config(), ring()).lights(lights).build().unwrap();
        sim.add_car(VehicleSpec::new(1000.0, 0.0, route(&[0, 1, 2]))).unwrap();

        let mut halted = 0;
        for _ in 0..5 {
            let s = sim.step_with(1.0).unwrap();
            halted += s.halted;
            assert_eq!(sim.vehicles()[0].speed(), 0.0);
        }
        assert_eq!(halted, 5);
        assert_eq!(sim.lights().get(1).unwrap().waited_secs(), 5.0);

        let s = sim.step_with(1.0).unwrap();
        assert_eq!(s.finished, 1);
        assert_eq!(s.active, 0);
        assert!(sim.vehicles().is_empty());
    }

    #[test]
    fn pruning_preserves_order() {
        let mut sim = ring_sim(config());
        sim.add_car(VehicleSpec::new(10.0, 0.0, route(&[0, 1])).labelled("a")).unwrap();
        sim.add_car(VehicleSpec::new(1000.0, 0.0, route(&[1, 2])).labelled("b")).unwrap();
        sim.add_car(VehicleSpec::new(10.0, 0.0, route(&[2, 3])).labelled("c")).unwrap();
        sim.step_with(1.0).unwrap();
        let labels: Vec<&str> = sim.vehicles().iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["a", "c"]);
    }

    #[test]
    fn cars_added_between_ticks_join_next_tick() {
        let mut sim = ring_sim(config());
        let a = sim.add_car(VehicleSpec::new(100.0, 0.0, route(&[0, 1]))).unwrap();
        sim.step_with(1.0).unwrap();
        let b = sim.add_car(VehicleSpec::new(100.0, 0.0, route(&[0, 1]))).unwrap();
        assert_eq!((a.0, b.0), (0, 1));
        assert_eq!(sim.vehicles()[1].progress(), 0.0);
        sim.step_with(1.0).unwrap();
        assert_eq!(sim.vehicles()[0].progress(), 200.0);
        assert_eq!(sim.vehicles()[1].progress(), 100.0);
    }

    #[test]
    fn invalid_car_rejected() {
        let mut sim = ring_sim(config());
        assert!(matches!(
            sim.add_car(VehicleSpec::new(100.0, 0.0, route(&[1, 0]))),
            Err(SimError::Vehicle(_))
        ));
        assert!(sim.vehicles().is_empty());
    }

    #[test]
    fn planned_route_is_drivable() {
        let mut sim = ring_sim(config());
        let planned = sim.plan_route(v(0), v(3)).unwrap();
        assert_eq!(planned.vertices, route(&[0, 2, 3]));
        sim.add_car(VehicleSpec::new(100.0, 0.0, planned.vertices)).unwrap();
        assert!(matches!(sim.plan_route(v(0), v(9)), Err(SimError::Graph(_))));
    }
}

// ── Events and observers ──────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use super::*;

    #[test]
    fn update_handlers_fire_in_registration_order() {
        let mut sim = ring_sim(config());
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            sim.on("update", move |ev| log.borrow_mut().push((ev.tick.0, name)));
        }
        sim.step_with(1.0).unwrap();
        sim.step_with(1.0).unwrap();
        assert_eq!(*log.borrow(), [(0, "first"), (0, "second"), (1, "first"), (1, "second")]);
    }

    #[test]
    fn unknown_event_names_never_fire() {
        let mut sim = ring_sim(config());
        let fired = Rc::new(RefCell::new(0));
        let f = Rc::clone(&fired);
        sim.on("collision", move |_| *f.borrow_mut() += 1);
        sim.step_with(1.0).unwrap();
        assert_eq!(*fired.borrow(), 0);
    }

    #[test]
    fn update_event_carries_delta_and_post_tick_state() {
        let mut sim = ring_sim(config());
        sim.add_car(VehicleSpec::new(100.0, 0.0, route(&[0, 1]))).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        sim.on("update", move |ev| {
            s.borrow_mut().push((ev.delta, ev.elapsed_secs, ev.view.vehicles[0].progress()));
        });
        sim.step_with(0.5).unwrap();
        sim.step_with(2.0).unwrap();
        assert_eq!(*seen.borrow(), [(0.5, 0.5, 50.0), (2.0, 2.5, 250.0)]);
    }

    #[test]
    fn observer_hooks_and_snapshot_interval() {
        let cfg = SimConfig { output_interval_ticks: 2, horizon_secs: Some(5.0), ..config() };
        let mut sim = ring_sim(cfg);
        sim.add_car(VehicleSpec::new(100.0, 0.0, route(&[0, 1]))).unwrap();
        let mut obs = Counting::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, [Tick(0), Tick(1), Tick(2), Tick(3), Tick(4)]);
        assert_eq!(obs.ends.len(), 5);
        assert_eq!(obs.snapshots, [(Tick(0), 1), (Tick(2), 1), (Tick(4), 1)]);
        assert_eq!(obs.sim_ends, [Tick(5)]);
    }

    #[test]
    fn run_ticks_ignores_horizon_and_reports_end() {
        let cfg = SimConfig { horizon_secs: Some(2.0), ..config() };
        let mut sim = ring_sim(cfg);
        let mut obs = Counting::default();
        sim.run_ticks(4, &mut obs).unwrap();
        assert_eq!(sim.cycle(), 4);
        assert_eq!(obs.sim_ends, [Tick(4)]);
        assert_ne!(sim.state(), crate::EngineState::Stopped);
    }
}

// ── Dumps and determinism ─────────────────────────────────────────────────────

#[cfg(test)]
mod dumps {
    use super::*;

    fn dump(sim: &Sim) -> String {
        let mut out = Vec::new();
        sim.dump_cars(&mut out).unwrap();
        sim.dump_traffic_lights(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn initial_dump_format() {
        let sim = demo_sim(1);
        assert_eq!(
            dump(&sim),
            "Car #0 'car1' 0----0%--->1 (speed: max: 100.00, current: 0.00)\n\
             Car #1 'car2' 0----0%--->2 (speed: max: 90.00, current: 0.00)\n\
             Traffic light #2 ON  [3] 0%/50% (waited: 0.00)\n"
        );
    }

    #[test]
    fn dump_after_ticks() {
        let mut lights = SparseIndex::new();
        lights.set(2, SignalController::new(0.5, 90.0, [EdgeId(3)]).unwrap());
        let mut sim = SimBuilder::new(config(), ring()).lights(lights).build().unwrap();
        sim.add_car(VehicleSpec::new(100.0, 0.0, route(&[0, 1, 2])).labelled("car1")).unwrap();
        sim.add_car(VehicleSpec::new(50.0, 0.0, route(&[3, 0]))).unwrap();
        for _ in 0..4 {
            sim.step_with(1.0).unwrap();
        }
        assert_eq!(
            dump(&sim),
            "Car #0 'car1' 0----40%--->1 (speed: max: 100.00, current: 100.00)\n\
             Car #1 3----20%--->0 (speed: max: 50.00, current: 50.00)\n\
             Traffic light #2 ON  [3] 4%/50% (waited: 0.00)\n"
        );
        for _ in 0..46 {
            sim.step_with(1.0).unwrap();
        }
        let lights = {
            let mut out = Vec::new();
            sim.dump_traffic_lights(&mut out).unwrap();
            String::from_utf8(out).unwrap()
        };
        assert_eq!(lights, "Traffic light #2 OFF [3] 55%/50% (waited: 0.00)\n");
    }

    #[test]
    fn same_seed_gives_identical_dumps_every_tick() {
        let record = |seed: u64| {
            let mut sim = demo_sim(seed);
            let out = Rc::new(RefCell::new(Vec::<u8>::new()));
            let sink = Rc::clone(&out);
            sim.on("update", move |ev| {
                let mut buf = sink.borrow_mut();
                ev.view.dump_cars(&mut *buf).unwrap();
                ev.view.dump_traffic_lights(&mut *buf).unwrap();
            });
            sim.run_ticks(400, &mut crate::NoopObserver).unwrap();
            let bytes = out.borrow().clone();
            bytes
        };
        let a = record(7);
        let b = record(7);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}

// ── Scenario files ────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario {
    use std::io::Write;

    use super::*;
    use crate::{Scenario, SimError};

    const DEMO: &str = r#"
        [sim]
        seed = 7
        horizon_secs = 30.0
        time_step = { mode = "fixed", secs = 1.0 }

        [graph]
        edges = [
            { from = 0, to = 1, weight = 1000.0 },
            { from = 0, to = 2, weight = 1400.0 },
            { from = 1, to = 2, weight = 1000.0 },
            { from = 2, to = 3, weight = 1000.0 },
            { from = 3, to = 0, weight = 1000.0 },
        ]

        [[lights]]
        at = 2
        duty_cycle = 0.5
        period = 90.0
        edges = [[2, 3]]

        [[roads]]
        from = 0
        to = 2
        label = "kar"
        speed_factor = 0.5

        [[cars]]
        max_speed = 100.0
        misbehavior = 0.5
        route = [0, 1, 2, 3, 0, 1, 2, 3]
        label = "car1"

        [[cars]]
        max_speed = 90.0
        misbehavior = 0.7
        route = [0, 2, 3, 0, 2, 3]
        label = "car2"
    "#;

    #[test]
    fn parses_and_builds_demo() {
        let scenario = Scenario::from_toml_str(DEMO).unwrap();
        assert_eq!(scenario.sim.seed, 7);
        assert_eq!(scenario.sim.horizon_secs, Some(30.0));
        assert_eq!(scenario.cars.len(), 2);

        let sim = scenario.build().unwrap();
        assert_eq!(sim.graph().kind(), GraphKind::Dense);
        assert_eq!(sim.graph().vertices(), route(&[0, 1, 2, 3]));
        assert_eq!(sim.vehicles().len(), 2);
        assert_eq!(sim.vehicles()[1].label(), "car2");
        assert_eq!(sim.roads().get(v(0), v(2)).label, "kar");
        assert_eq!(sim.roads().get(v(0), v(2)).width, 1.0);
        let light = sim.lights().get(2).unwrap();
        assert!(light.controls(EdgeId(3)));
    }

    #[test]
    fn scenario_build_matches_hand_built_engine() {
        let mut a = Scenario::from_toml_str(DEMO).unwrap().build().unwrap();
        let mut b = demo_sim(7);
        for _ in 0..25 {
            a.step_with(1.0).unwrap();
            b.step_with(1.0).unwrap();
        }
        let dump = |s: &Sim| {
            let mut out = Vec::new();
            s.dump_cars(&mut out).unwrap();
            s.dump_traffic_lights(&mut out).unwrap();
            out
        };
        assert_eq!(dump(&a), dump(&b));
    }

    #[test]
    fn explicit_kind_and_defaults() {
        let text = r#"
            [graph]
            kind = "sparse"
            vertices = [5]
            edges = [{ from = 0, to = 1, weight = 2.0 }]
        "#;
        let scenario = Scenario::from_toml_str(text).unwrap();
        assert_eq!(scenario.sim, SimConfig::default());
        let sim = scenario.build().unwrap();
        assert_eq!(sim.graph().kind(), GraphKind::Sparse);
        assert_eq!(sim.graph().vertices(), route(&[0, 1, 5]));
    }

    #[test]
    fn auto_kind_is_sized_by_largest_id() {
        let text = r#"
            [graph]
            edges = [{ from = 0, to = 5000, weight = 10.0 }]
        "#;
        let sim = Scenario::from_toml_str(text).unwrap().build().unwrap();
        assert_eq!(sim.graph().kind(), GraphKind::Sparse);
        assert_eq!(sim.graph().vertices(), route(&[0, 5000]));
    }

    #[test]
    fn gapped_small_ids_stay_dense_and_presized() {
        let text = r#"
            [graph]
            edges = [{ from = 0, to = 2, weight = 1.0 }, { from = 2, to = 7, weight = 1.0 }]
        "#;
        let sim = Scenario::from_toml_str(text).unwrap().build().unwrap();
        match sim.graph() {
            AnyGraph::Dense(d) => assert_eq!(d.capacity(), 8),
            other => panic!("expected dense, got {:?}", other.kind()),
        }
    }

    #[test]
    fn explicit_dense_with_huge_id_is_an_error() {
        let text = r#"
            [graph]
            kind = "dense"
            edges = [{ from = 0, to = 4000000000, weight = 1.0 }]
        "#;
        let err = Scenario::from_toml_str(text).unwrap().build().unwrap_err();
        assert!(matches!(err, SimError::Graph(tsim_graph::GraphError::CapacityExceeded { .. })));
    }

    #[test]
    fn light_auto_adjust_flag() {
        let text = r#"
            [graph]
            edges = [{ from = 0, to = 1, weight = 2.0 }, { from = 0, to = 2, weight = 2.0 }]
            [[lights]]
            at = 0
            duty_cycle = 0.5
            period = 10.0
            edges = [[0, 1]]
            auto_adjust = true
        "#;
        let sim = Scenario::from_toml_str(text).unwrap().build().unwrap();
        assert!(sim.lights().get(0).unwrap().auto_adjust());
        let sim = Scenario::from_toml_str(DEMO).unwrap().build().unwrap();
        assert!(!sim.lights().get(2).unwrap().auto_adjust());
    }

    #[test]
    fn unknown_fields_rejected() {
        let err = Scenario::from_toml_str("colour = 3\n").unwrap_err();
        assert!(matches!(err, SimError::Scenario(_)));
    }

    #[test]
    fn light_edge_from_other_vertex_rejected() {
        let text = r#"
            [graph]
            edges = [{ from = 0, to = 1, weight = 2.0 }, { from = 1, to = 0, weight = 2.0 }]
            [[lights]]
            at = 1
            duty_cycle = 0.5
            period = 10.0
            edges = [[0, 1]]
        "#;
        let err = Scenario::from_toml_str(text).unwrap().build().unwrap_err();
        assert!(matches!(err, SimError::UnknownEdge { .. }));
    }

    #[test]
    fn duplicate_lights_rejected() {
        let text = r#"
            [graph]
            edges = [{ from = 0, to = 1, weight = 2.0 }]
            [[lights]]
            at = 0
            duty_cycle = 0.5
            period = 10.0
            edges = []
            [[lights]]
            at = 0
            duty_cycle = 0.5
            period = 20.0
            edges = []
        "#;
        let err = Scenario::from_toml_str(text).unwrap().build().unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEMO.as_bytes()).unwrap();
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.lights.len(), 1);
        assert!(matches!(Scenario::load("/definitely/not/here.toml"), Err(SimError::Io(_))));
    }
}
