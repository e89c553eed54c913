//! Tests for the playback state machine, the timeline and the real-time player.

use route_demo::error::DemoError;
use route_demo::fleet::{Agent, VehicleKind};
use route_demo::geo::LatLng;
use route_demo::simulation::{Clock, Frame, Player, Simulation};
use std::time::Duration;

fn create_agent(id: usize, path: Vec<(f64, f64)>) -> Agent {
    let path: Vec<LatLng> = path.into_iter().map(|(lat, lng)| LatLng::new(lat, lng)).collect();
    let orders = path.len().saturating_sub(2);
    Agent {
        id,
        kind: VehicleKind::Car,
        color: "#4361ee".to_string(),
        path,
        orders,
        current_pos: 0,
    }
}

/// Agent 1 makes two deliveries (3 steps), agent 2 makes one (2 steps).
fn create_test_simulation() -> Simulation {
    let mut simulation = Simulation::new(Vec::new(), 1.0);
    simulation.load(vec![
        create_agent(1, vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)]),
        create_agent(2, vec![(0.0, 0.0), (2.0, 0.0), (0.0, 0.0)]),
    ]);
    simulation
}

fn positions(simulation: &Simulation) -> Vec<usize> {
    simulation.agents().iter().map(|a| a.current_pos).collect()
}

/// Clock that only records how long it was asked to sleep.
#[derive(Default)]
struct ManualClock {
    slept: Duration,
}

impl Clock for &mut ManualClock {
    fn sleep(&mut self, duration: Duration) {
        self.slept += duration;
    }
}

#[test]
fn test_toggle_requires_routes() {
    let mut simulation = Simulation::default();
    assert!(matches!(simulation.toggle(), Err(DemoError::NoRoutes)));
    assert!(!simulation.is_playing());
}

#[test]
fn test_toggle_arms_and_clears_timer() {
    let mut simulation = create_test_simulation();
    assert_eq!(simulation.timer(), None);

    assert!(simulation.toggle().unwrap());
    assert!(simulation.is_playing());
    assert_eq!(simulation.timer(), Some(Duration::from_secs(1)));

    assert!(!simulation.toggle().unwrap());
    assert_eq!(simulation.timer(), None);
}

#[test]
fn test_speed_change_rearms_running_timer() {
    let mut simulation = create_test_simulation();

    simulation.set_speed(2.0).unwrap();
    assert_eq!(simulation.timer(), None);

    simulation.toggle().unwrap();
    assert_eq!(simulation.timer(), Some(Duration::from_millis(500)));

    simulation.set_speed(4.0).unwrap();
    assert_eq!(simulation.timer(), Some(Duration::from_millis(250)));
    assert_eq!(simulation.speed(), 4.0);

    assert!(simulation.set_speed(0.0).is_err());
    assert!(simulation.set_speed(f64::NAN).is_err());
    assert_eq!(simulation.speed(), 4.0);
}

#[test]
fn test_tick_advances_agents_and_timeline() {
    let mut simulation = create_test_simulation();
    assert_eq!(simulation.max_steps(), 3);

    let outcome = simulation.tick();
    assert_eq!(positions(&simulation), vec![1, 1]);
    assert_eq!(outcome.moved.len(), 2);
    assert_eq!(outcome.moved[1], (2, LatLng::new(2.0, 0.0)));
    assert_eq!(outcome.deliveries.len(), 2);
    assert!((outcome.timeline - 100.0 / 3.0).abs() < 1e-9);
    assert!(!outcome.looped);

    // Agent 2 reaches the depot: a move but no delivery.
    let outcome = simulation.tick();
    assert_eq!(positions(&simulation), vec![2, 2]);
    assert_eq!(outcome.deliveries.len(), 1);
    assert_eq!(outcome.deliveries[0].agent_id, 1);

    let outcome = simulation.tick();
    assert_eq!(positions(&simulation), vec![3, 2]);
    assert_eq!(outcome.moved.len(), 1);
    assert!(outcome.deliveries.is_empty());
    assert!((outcome.timeline - 100.0).abs() < 1e-9);
    assert!(!outcome.looped);
    assert_eq!(simulation.step(), 3);
}

#[test]
fn test_tick_loops_once_everyone_finished() {
    let mut simulation = create_test_simulation();
    for _ in 0..3 {
        simulation.tick();
    }

    let outcome = simulation.tick();
    assert!(outcome.looped);
    assert!(outcome.moved.is_empty());
    assert_eq!(positions(&simulation), vec![0, 0]);

    simulation.tick();
    assert_eq!(positions(&simulation), vec![1, 1]);
}

#[test]
fn test_no_delivery_when_passing_the_depot() {
    let mut simulation = Simulation::new(Vec::new(), 1.0);
    simulation.load(vec![create_agent(
        1,
        vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (2.0, 0.0), (0.0, 0.0)],
    )]);

    let delivered: Vec<usize> = (0..4).map(|_| simulation.tick().deliveries.len()).collect();
    assert_eq!(delivered, vec![1, 0, 1, 0]);
}

#[test]
fn test_seek_maps_slider_to_step() {
    let mut simulation = create_test_simulation();

    simulation.seek(50.0);
    assert_eq!(positions(&simulation), vec![1, 1]);
    assert_eq!(simulation.timeline(), 50.0);

    simulation.seek(100.0);
    assert_eq!(positions(&simulation), vec![3, 2]);

    simulation.seek(250.0);
    assert_eq!(positions(&simulation), vec![3, 2]);
    assert_eq!(simulation.timeline(), 100.0);

    simulation.seek(-10.0);
    assert_eq!(positions(&simulation), vec![0, 0]);
}

#[test]
fn test_seek_with_non_finite_values() {
    let mut simulation = create_test_simulation();
    simulation.seek(50.0);

    simulation.seek(f64::NAN);
    assert_eq!(simulation.timeline(), 0.0);
    assert_eq!(positions(&simulation), vec![0, 0]);

    simulation.seek(f64::INFINITY);
    assert_eq!(simulation.timeline(), 100.0);
    assert_eq!(positions(&simulation), vec![3, 2]);
}

#[test]
fn test_tick_interval_never_panics() {
    let mut simulation = Simulation::new(Vec::new(), 1e-30);
    assert_eq!(simulation.tick_interval(), Duration::from_secs(10));

    simulation.load(vec![create_agent(1, vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)])]);
    assert!(simulation.toggle().unwrap());
    assert_eq!(simulation.timer(), Some(Duration::from_secs(10)));

    assert!(simulation.set_speed(1e-30).is_err());
    assert!(simulation.set_speed(100.0).is_err());
    assert_eq!(Simulation::new(Vec::new(), -2.0).tick_interval(), Duration::from_secs(10));
}

#[test]
fn test_reset_and_restart() {
    let mut simulation = create_test_simulation();
    simulation.toggle().unwrap();
    simulation.tick();
    simulation.tick();

    simulation.reset();
    assert!(!simulation.is_playing());
    assert_eq!(simulation.timer(), None);
    assert_eq!(simulation.step(), 0);
    assert_eq!(simulation.timeline(), 0.0);
    assert_eq!(positions(&simulation), vec![0, 0]);
    assert!(simulation.pulses().is_empty());

    simulation.tick();
    simulation.restart();
    assert!(simulation.is_playing());
    assert_eq!(simulation.timer(), Some(Duration::from_secs(1)));
    assert_eq!(positions(&simulation), vec![0, 0]);

    let mut empty = Simulation::default();
    empty.restart();
    assert!(!empty.is_playing());
}

#[test]
fn test_pulses_fade_out() {
    let mut simulation = create_test_simulation();
    simulation.tick();
    assert_eq!(simulation.pulses().len(), 2);
    assert_eq!(simulation.pulses()[0].radius, 10.0);

    for _ in 0..9 {
        simulation.advance_pulses();
    }
    assert_eq!(simulation.pulses().len(), 2);
    assert!((simulation.pulses()[0].radius - 28.0).abs() < 1e-9);
    assert!(simulation.pulses()[0].opacity < 0.1);

    simulation.advance_pulses();
    assert!(simulation.pulses().is_empty());
}

#[test]
fn test_interpolated_positions() {
    let mut simulation = create_test_simulation();

    let halfway = simulation.interpolated_positions(0.5);
    assert_eq!(halfway[0], (1, LatLng::new(0.0, 0.5)));
    assert_eq!(halfway[1], (2, LatLng::new(1.0, 0.0)));

    simulation.seek(100.0);
    let finished = simulation.interpolated_positions(0.5);
    assert_eq!(finished[0], (1, LatLng::new(0.0, 0.0)));
}

#[test]
fn test_player_plays_in_real_time() {
    let mut simulation = create_test_simulation();
    simulation.toggle().unwrap();

    let mut clock = ManualClock::default();
    let mut frames: Vec<Frame> = Vec::new();
    let mut ticks = 0;

    let played = Player::new(&mut clock)
        .play(
            &mut simulation,
            3,
            |frame| frames.push(frame.clone()),
            |_, _| ticks += 1,
        )
        .unwrap();

    assert_eq!(played, 3);
    assert_eq!(ticks, 3);
    assert_eq!(clock.slept, Duration::from_secs(3));
    // One frame every 50 ms.
    assert_eq!(frames.len(), 60);
    assert!(frames.iter().all(|f| f.fraction > 0.0 && f.fraction < 1.0));
    assert_eq!(frames[0].tick, 0);
    assert_eq!(frames[59].tick, 2);
    assert_eq!(positions(&simulation), vec![3, 2]);
}

#[test]
fn test_player_stops_when_paused() {
    let mut simulation = create_test_simulation();
    let mut clock = ManualClock::default();

    let played = Player::new(&mut clock)
        .play(&mut simulation, 5, |_| {}, |_, _| {})
        .unwrap();
    assert_eq!(played, 0);
    assert_eq!(clock.slept, Duration::ZERO);

    let mut empty = Simulation::default();
    assert!(matches!(
        Player::new(&mut clock).play(&mut empty, 5, |_| {}, |_, _| {}),
        Err(DemoError::NoRoutes)
    ));
}
