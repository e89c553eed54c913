//! Delivery progress simulation along the drawn routes.
//!
//! The simulation is a two-state play/pause machine driven by a single
//! periodic timer. Each timer tick moves every unfinished agent one point
//! along its path; once all agents have arrived back at the depot the next
//! tick rewinds everyone to the start, so playback loops. The timeline
//! slider is kept in sync as a percentage of the longest route.

use crate::config::{validate_speed, SPEED_RANGE};
use crate::error::{DemoError, Result};
use crate::fleet::Agent;
use crate::geo::LatLng;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

/// Slider range upper bound.
pub const TIMELINE_MAX: f64 = 100.0;

/// Pulse animation frame period.
pub const PULSE_FRAME: Duration = Duration::from_millis(50);
const PULSE_START_RADIUS: f64 = 10.0;
const PULSE_END_RADIUS: f64 = 30.0;
const PULSE_RADIUS_STEP: f64 = 2.0;
const PULSE_START_OPACITY: f64 = 0.5;
const PULSE_OPACITY_STEP: f64 = 0.05;

/// Expanding circle shown where an agent just made a delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pulse {
    pub agent_id: usize,
    pub color: String,
    pub center: LatLng,
    pub radius: f64,
    pub opacity: f64,
}

impl Pulse {
    fn new(agent: &Agent, center: LatLng) -> Self {
        Pulse {
            agent_id: agent.id,
            color: agent.color.clone(),
            center,
            radius: PULSE_START_RADIUS,
            opacity: PULSE_START_OPACITY,
        }
    }

    /// Advance one animation frame; returns `false` once the pulse is gone.
    pub fn advance(&mut self) -> bool {
        self.radius += PULSE_RADIUS_STEP;
        self.opacity = (self.opacity - PULSE_OPACITY_STEP).max(0.0);
        self.radius < PULSE_END_RADIUS
    }
}

/// What happened during one timer tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutcome {
    /// Agents that moved, with their new positions
    pub moved: Vec<(usize, LatLng)>,
    /// Deliveries made this tick
    pub deliveries: Vec<Pulse>,
    /// All agents had finished and were rewound to the start
    pub looped: bool,
    /// Slider value after the tick
    pub timeline: f64,
}

/// Playback state of the agents on the map.
#[derive(Debug, Clone)]
pub struct Simulation {
    agents: Vec<Agent>,
    playing: bool,
    speed: f64,
    step: u64,
    timeline: f64,
    timer: Option<Duration>,
    pulses: Vec<Pulse>,
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation::new(Vec::new(), 1.0)
    }
}

impl Simulation {
    pub fn new(agents: Vec<Agent>, speed: f64) -> Self {
        Simulation {
            agents,
            playing: false,
            speed,
            step: 0,
            timeline: 0.0,
            timer: None,
            pulses: Vec::new(),
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.agents.get(index)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Ticks since the last reset.
    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn timeline(&self) -> f64 {
        self.timeline
    }

    /// Active pulse animations.
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    /// Interval of the armed timer, `None` while paused.
    pub fn timer(&self) -> Option<Duration> {
        self.timer
    }

    /// Timer period for the current speed, capped at the slowest allowed speed.
    pub fn tick_interval(&self) -> Duration {
        let slowest = 1.0 / SPEED_RANGE.start();
        let seconds = (1.0 / self.speed).min(slowest);
        Duration::try_from_secs_f64(seconds).unwrap_or_else(|_| Duration::from_secs_f64(slowest))
    }

    /// Longest route in steps.
    pub fn max_steps(&self) -> usize {
        self.agents.iter().map(Agent::last_pos).max().unwrap_or(0)
    }

    /// Replace the agents, stopping playback and rewinding.
    pub fn load(&mut self, agents: Vec<Agent>) {
        self.agents = agents;
        self.reset();
        self.prepare();
    }

    /// Remove all agents.
    pub fn clear(&mut self) {
        self.agents.clear();
        self.reset();
    }

    /// Stop playback and put every agent back at its start.
    pub fn reset(&mut self) {
        self.disarm();
        self.step = 0;
        self.playing = false;
        self.timeline = 0.0;
        self.pulses.clear();
        self.agents.iter_mut().for_each(Agent::reset);
    }

    /// Put agents with a non-empty path at their first point.
    pub fn prepare(&mut self) {
        self.agents
            .iter_mut()
            .filter(|a| !a.path.is_empty())
            .for_each(Agent::reset);
    }

    /// Flip between playing and paused.
    pub fn toggle(&mut self) -> Result<bool> {
        if self.agents.is_empty() {
            return Err(DemoError::NoRoutes);
        }

        self.playing = !self.playing;
        if self.playing {
            self.arm();
        } else {
            self.disarm();
        }
        info!(
            "Simulation {}",
            if self.playing { "playing" } else { "paused" }
        );
        Ok(self.playing)
    }

    /// Rewind and start playing straight away.
    pub fn restart(&mut self) {
        self.reset();
        self.prepare();
        if !self.agents.is_empty() {
            self.playing = true;
            self.arm();
        }
    }

    /// Change playback speed, re-arming the timer when playing.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        validate_speed(speed)?;
        self.speed = speed;
        if self.playing {
            self.disarm();
            self.arm();
        }
        Ok(())
    }

    /// Advance the simulation by one timer period.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let mut all_finished = true;

        for agent in self.agents.iter_mut() {
            if agent.is_finished() {
                continue;
            }
            all_finished = false;
            agent.current_pos += 1;

            let Some(position) = agent.position() else {
                continue;
            };
            outcome.moved.push((agent.id, position));

            let inner = agent.current_pos > 0 && agent.current_pos < agent.last_pos();
            if inner && !agent.at_start_point() {
                outcome.deliveries.push(Pulse::new(agent, position));
            }
        }

        self.step += 1;
        self.timeline = self.progress_timeline();
        self.pulses.extend(outcome.deliveries.iter().cloned());

        if all_finished {
            debug!("All agents finished, looping");
            self.agents.iter_mut().for_each(Agent::reset);
            outcome.looped = true;
        }

        outcome.timeline = self.timeline;
        outcome
    }

    /// Move every agent to the step matching a slider value.
    pub fn seek(&mut self, value: f64) {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, TIMELINE_MAX)
        };
        let step = ((value / TIMELINE_MAX) * self.max_steps() as f64).floor() as usize;
        self.agents.iter_mut().for_each(|a| a.move_to(step));
        self.timeline = value;
        debug!("Seek to {:.0}% (step {})", value, step);
    }

    /// Advance all pulse animations by one frame, dropping finished ones.
    pub fn advance_pulses(&mut self) {
        self.pulses.retain_mut(Pulse::advance);
    }

    /// Agent positions interpolated `fraction` of the way to their next point.
    pub fn interpolated_positions(&self, fraction: f64) -> Vec<(usize, LatLng)> {
        self.agents
            .iter()
            .filter_map(|a| a.interpolated_position(fraction).map(|p| (a.id, p)))
            .collect()
    }

    fn progress_timeline(&self) -> f64 {
        let max_steps = self.max_steps();
        if max_steps == 0 {
            return 0.0;
        }
        let max_progress = self.agents.iter().map(|a| a.current_pos).max().unwrap_or(0);
        max_progress as f64 / max_steps as f64 * TIMELINE_MAX
    }

    fn arm(&mut self) {
        let interval = self.tick_interval();
        debug!("Timer armed every {} ms", interval.as_millis());
        self.timer = Some(interval);
    }

    fn disarm(&mut self) {
        self.timer = None;
    }
}

/// Time source for [`Player`].
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Clock backed by the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// A rendered animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Number of completed ticks
    pub tick: u64,
    /// How far the agents are between two path points, in `[0, 1)`
    pub fraction: f64,
    pub positions: Vec<(usize, LatLng)>,
    pub pulses: Vec<Pulse>,
    pub timeline: f64,
}

/// Plays a simulation in real time.
///
/// Between two timer ticks the player renders animation frames at the pulse
/// frame rate with agent positions interpolated along their current leg.
pub struct Player<C: Clock> {
    clock: C,
}

impl<C: Clock> Player<C> {
    pub fn new(clock: C) -> Self {
        Player { clock }
    }

    /// Play `ticks` timer periods, calling `on_frame` for every frame and
    /// `on_tick` after every tick. Stops early when playback is paused.
    pub fn play<F, T>(
        &mut self,
        simulation: &mut Simulation,
        ticks: u64,
        mut on_frame: F,
        mut on_tick: T,
    ) -> Result<u64>
    where
        F: FnMut(&Frame),
        T: FnMut(&Simulation, &TickOutcome),
    {
        if simulation.agents().is_empty() {
            return Err(DemoError::NoRoutes);
        }

        let mut played = 0;
        while played < ticks {
            let Some(interval) = simulation.timer() else {
                break;
            };
            let frames = frames_per_tick(interval);
            let frame_duration = interval / frames;

            for f in 0..frames {
                self.clock.sleep(frame_duration);
                simulation.advance_pulses();
                let fraction = f64::from(f + 1) / f64::from(frames + 1);
                on_frame(&Frame {
                    tick: simulation.step(),
                    fraction,
                    positions: simulation.interpolated_positions(fraction),
                    pulses: simulation.pulses().to_vec(),
                    timeline: simulation.timeline(),
                });
            }

            let outcome = simulation.tick();
            on_tick(simulation, &outcome);
            played += 1;
        }

        Ok(played)
    }
}

/// Number of animation frames that fit in one timer period.
fn frames_per_tick(interval: Duration) -> u32 {
    let frames = interval.as_millis() / PULSE_FRAME.as_millis();
    frames.clamp(1, 1000) as u32
}
