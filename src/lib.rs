//! # Route demo
//!
//! Engine behind a multi-vehicle delivery routing demo.
//!
//! A depot is placed at a city center and delivery orders are scattered
//! around it. A [`planner::Planner`] assigns the orders to agents, the routes
//! are drawn as map layers and a [`simulation::Simulation`] animates the
//! agents along their routes on a play/pause timeline.
//!
//! The bundled [`planner::EvenSlicePlanner`] does no optimization: it hands
//! every agent an equally sized, consecutive slice of the orders.

pub mod config;
pub mod error;
pub mod fleet;
pub mod geo;
pub mod plan;
pub mod planner;
pub mod render;
pub mod report;
pub mod scenario;
pub mod simulation;
pub mod utils;

use crate::config::{Config, AGENTS_RANGE, LOCATIONS_RANGE};
use crate::error::{DemoError, Result};
use crate::fleet::LegendEntry;
use crate::geo::{Bounds, City};
use crate::plan::{Plan, SolveRequest};
use crate::planner::{EvenSlicePlanner, Planner};
use crate::render::FeatureCollection;
use crate::report::{AgentDetails, AgentProfile, RouteSummary, SolutionReport, Statistics};
use crate::scenario::{OrderDetails, Scenario};
use crate::simulation::{Simulation, TickOutcome};

use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::RangeInclusive;

/// One demo session: the map state plus the simulation running on it.
pub struct RouteDemo<P: Planner = EvenSlicePlanner> {
    pub config: Config,
    planner: P,
    rng: ChaCha8Rng,
    scenario: Option<Scenario>,
    plan: Option<Plan>,
    simulation: Simulation,
    selected_agent: Option<usize>,
}

impl RouteDemo<EvenSlicePlanner> {
    /// Create a session using the even slice planner.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_planner(config, EvenSlicePlanner)
    }
}

impl<P: Planner> RouteDemo<P> {
    /// Create a session with a custom planner.
    pub fn with_planner(config: Config, planner: P) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let simulation = Simulation::new(Vec::new(), config.speed);

        Ok(RouteDemo {
            config,
            planner,
            rng,
            scenario: None,
            plan: None,
            simulation,
            selected_agent: None,
        })
    }

    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Heading shown above the map.
    pub fn title(&self) -> String {
        self.config.city.title()
    }

    /// Replace the map contents with a freshly generated scenario.
    pub fn generate(&mut self) -> &Scenario {
        self.clear();
        let scenario = Scenario::generate(&self.config, &mut self.rng);
        info!(
            "Generated {} delivery locations around {}",
            scenario.len(),
            self.config.city
        );
        self.scenario.insert(scenario)
    }

    /// Switch city, clearing the map and generating new locations.
    pub fn change_city(&mut self, city: City) -> &Scenario {
        self.config.city = city;
        self.generate()
    }

    /// Adjust the agent count by `delta`; ignored when out of range.
    pub fn change_agents(&mut self, delta: i64) -> bool {
        step_within(&mut self.config.num_agents, delta, AGENTS_RANGE)
    }

    /// Adjust the location count by `delta`; ignored when out of range.
    pub fn change_locations(&mut self, delta: i64) -> bool {
        step_within(&mut self.config.num_locations, delta, LOCATIONS_RANGE)
    }

    /// Ask the planner for routes and prepare the simulation.
    pub fn solve(&mut self) -> Result<&Plan> {
        let scenario = match &self.scenario {
            Some(s) if !s.is_empty() => s,
            _ => {
                warn!("Solve requested without locations");
                return Err(DemoError::NoLocations);
            }
        };

        let request = SolveRequest {
            depot: scenario.depot.location,
            locations: scenario.locations(),
            num_salesmen: self.config.num_agents,
            algorithm: self.config.algorithm,
        };
        self.clear_routes();

        let plan = self.planner.solve(&request)?;
        let agents = match &self.scenario {
            Some(scenario) => fleet::draw_routes(&plan, scenario, &mut self.rng)?,
            None => return Err(DemoError::NoLocations),
        };

        self.selected_agent = if agents.is_empty() { None } else { Some(0) };
        self.simulation.load(agents);
        let plan: &Plan = self.plan.insert(plan);
        Ok(plan)
    }

    /// Remove the routes and agents, keeping the locations.
    pub fn clear_routes(&mut self) {
        self.plan = None;
        self.selected_agent = None;
        self.simulation.clear();
    }

    /// Remove everything from the map.
    pub fn clear(&mut self) {
        self.scenario = None;
        self.clear_routes();
    }

    /// Flip play/pause; returns whether the simulation is now playing.
    pub fn toggle(&mut self) -> Result<bool> {
        if self.simulation.agents().is_empty() {
            warn!("Playback requested before routes were solved");
        }
        self.simulation.toggle()
    }

    pub fn restart(&mut self) {
        self.simulation.restart();
    }

    pub fn reset(&mut self) {
        self.simulation.reset();
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.simulation.tick()
    }

    /// Move agents to the position matching a timeline slider value.
    pub fn seek(&mut self, value: f64) {
        self.simulation.seek(value);
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.simulation.set_speed(speed)?;
        self.config.speed = speed;
        Ok(())
    }

    /// Mutable access for driving the simulation with a [`simulation::Player`].
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// Show the agent at 0-based `index` in the details panel.
    pub fn select_agent(&mut self, index: usize) -> Result<AgentDetails> {
        let details = self.agent_details(index)?;
        self.selected_agent = Some(index);
        Ok(details)
    }

    /// Detail card of the agent at 0-based `index`.
    pub fn agent_details(&self, index: usize) -> Result<AgentDetails> {
        self.simulation
            .agent(index)
            .map(|agent| AgentDetails::new(agent, self.simulation.speed()))
            .ok_or(DemoError::UnknownAgent(index + 1))
    }

    /// Detail card of the currently selected agent.
    pub fn selected_agent_details(&self) -> Option<AgentDetails> {
        self.selected_agent
            .and_then(|index| self.agent_details(index).ok())
    }

    pub fn order_details(&self, index: usize) -> Result<OrderDetails> {
        self.scenario
            .as_ref()
            .ok_or(DemoError::NoLocations)?
            .order_details(index)
    }

    pub fn route_summary(&self) -> Option<RouteSummary> {
        self.plan.as_ref().map(RouteSummary::from_plan)
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        fleet::legend(self.simulation.agents(), self.config.num_agents)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::new(
            self.scenario.as_ref(),
            self.plan.as_ref(),
            self.config.num_agents,
        )
    }

    /// Map area to show: all markers when present, else the city viewport.
    pub fn fit_bounds(&self) -> Bounds {
        match &self.scenario {
            Some(scenario) => scenario.fit_bounds(self.config.fit_padding),
            None => Bounds::viewport(
                self.config.city.center(),
                self.config.city.zoom(),
                self.config.viewport_width,
                self.config.viewport_height,
            ),
        }
    }

    pub fn report(&self) -> Result<SolutionReport> {
        let (scenario, plan) = self.solved()?;
        SolutionReport::new(plan, scenario, self.config.algorithm)
    }

    /// Profile of the agent with 1-based `agent_id`.
    pub fn agent_profile(&mut self, agent_id: usize) -> Result<AgentProfile> {
        let (scenario, plan) = match (&self.scenario, &self.plan) {
            (Some(s), Some(p)) => (s, p),
            _ => return Err(DemoError::NoRoutes),
        };
        AgentProfile::new(plan, scenario, agent_id, &mut self.rng)
    }

    /// GeoJSON layers for the current map.
    pub fn map_layers(&self) -> Result<FeatureCollection> {
        let scenario = self.scenario.as_ref().ok_or(DemoError::NoLocations)?;
        Ok(render::map_layers(
            scenario,
            self.simulation.agents(),
            self.simulation.pulses(),
        ))
    }

    pub fn console_map(&self) -> Result<String> {
        let scenario = self.scenario.as_ref().ok_or(DemoError::NoLocations)?;
        Ok(render::console_map(scenario, self.simulation.agents()))
    }

    fn solved(&self) -> Result<(&Scenario, &Plan)> {
        match (&self.scenario, &self.plan) {
            (Some(s), Some(p)) => Ok((s, p)),
            _ => Err(DemoError::NoRoutes),
        }
    }
}

fn step_within(value: &mut usize, delta: i64, range: RangeInclusive<usize>) -> bool {
    let next = *value as i64 + delta;
    if next < *range.start() as i64 || next > *range.end() as i64 {
        return false;
    }
    *value = next as usize;
    true
}
