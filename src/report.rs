//! Detail panels, statistics and solution reports.

use crate::error::{DemoError, Result};
use crate::fleet::Agent;
use crate::plan::{Algorithm, Plan};
use crate::scenario::Scenario;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display speed in km/h per unit of simulation speed.
const KMH_PER_SPEED_UNIT: f64 = 30.0;
/// Average speed used to estimate route durations.
const AVERAGE_SPEED: f64 = 40.0;
const VEHICLE_CAPACITY: u32 = 100;

/// Agent detail card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetails {
    pub id: usize,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub vehicle: String,
    pub total_orders: usize,
    pub current_location: String,
    pub status: String,
    /// Displayed speed in km/h
    pub speed_kmh: u32,
    pub progress_percent: u32,
    pub completed_deliveries: usize,
    pub remaining_deliveries: usize,
    /// Estimated seconds until the agent is back at the depot
    pub eta_seconds: u64,
}

impl AgentDetails {
    pub fn new(agent: &Agent, speed: f64) -> Self {
        let last = agent.last_pos();
        let current_location = if agent.current_pos == 0 {
            "Starting at depot".to_string()
        } else if agent.current_pos >= last {
            "Returned to depot".to_string()
        } else if agent.at_start_point() {
            "At depot".to_string()
        } else {
            format!("Delivery location {}", agent.current_pos)
        };

        let remaining_steps = last.saturating_sub(agent.current_pos) as f64;

        AgentDetails {
            id: agent.id,
            name: agent.name(),
            color: agent.color.clone(),
            icon: agent.kind.icon().to_string(),
            vehicle: agent.kind.name().to_string(),
            total_orders: agent.orders,
            current_location,
            status: "Active".to_string(),
            speed_kmh: (speed * KMH_PER_SPEED_UNIT).round() as u32,
            progress_percent: (agent.progress() * 100.0).round() as u32,
            completed_deliveries: agent.current_pos.min(agent.orders),
            remaining_deliveries: agent.orders.saturating_sub(agent.current_pos),
            eta_seconds: (remaining_steps / speed).round() as u64,
        }
    }
}

impl fmt::Display for AgentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  Vehicle Type: {}", self.vehicle)?;
        writeln!(f, "  Total Orders: {}", self.total_orders)?;
        writeln!(f, "  Current Location: {}", self.current_location)?;
        writeln!(f, "  Status: {}", self.status)?;
        writeln!(f, "  Speed: {} km/h", self.speed_kmh)?;
        writeln!(f, "  Progress: {}%", self.progress_percent)?;
        writeln!(f, "  Completed Deliveries: {}", self.completed_deliveries)?;
        writeln!(f, "  Remaining Deliveries: {}", self.remaining_deliveries)?;
        write!(f, "  Est. Time Remaining: {} sec", self.eta_seconds)
    }
}

/// Aggregate figures for the drawn routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub agents: usize,
    pub orders: usize,
    pub route_points: usize,
    pub orders_per_agent: f64,
}

impl RouteSummary {
    pub fn from_plan(plan: &Plan) -> Self {
        let agents = plan.routes.len();
        let orders = plan.order_count();
        let route_points = plan.routes.iter().map(|r| r.route.len()).sum();
        RouteSummary {
            agents,
            orders,
            route_points,
            orders_per_agent: if agents == 0 {
                0.0
            } else {
                orders as f64 / agents as f64
            },
        }
    }
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Delivery Agents: {}", self.agents)?;
        writeln!(f, "Orders: {}", self.orders)?;
        writeln!(f, "Route Points: {}", self.route_points)?;
        write!(f, "Orders per Agent: {:.1}", self.orders_per_agent)
    }
}

/// The statistics panel next to the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_distance: String,
    pub computation_time: String,
    pub locations_per_agent: usize,
}

impl Statistics {
    pub fn new(scenario: Option<&Scenario>, plan: Option<&Plan>, num_agents: usize) -> Self {
        let mut stats = Statistics::default();
        if let Some(plan) = plan {
            stats.total_distance = format!("{:.2} km", plan.total_distance);
            stats.computation_time = format!("{:.2} ms", plan.computation_time);
        }
        if let Some(scenario) = scenario {
            stats.locations_per_agent = scenario.locations_per_agent(num_agents);
        }
        stats
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Statistics {
            total_distance: "0 km".to_string(),
            computation_time: "0 ms".to_string(),
            locations_per_agent: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub algorithm: Algorithm,
    pub total_distance: f64,
    pub computation_time: f64,
    pub num_agents: usize,
    /// Visits excluding the depot at both ends of every route
    pub total_stops: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDetail {
    pub agent_id: usize,
    pub num_stops: usize,
    pub distance: f64,
    pub path: Vec<usize>,
}

/// Full report on a solved plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionReport {
    pub summary: ReportSummary,
    pub route_details: Vec<RouteDetail>,
}

impl SolutionReport {
    pub fn new(plan: &Plan, scenario: &Scenario, algorithm: Algorithm) -> Result<Self> {
        let total_points: usize = plan.routes.iter().map(|r| r.route.len()).sum();
        let route_details = plan
            .routes
            .iter()
            .map(|r| {
                Ok(RouteDetail {
                    agent_id: r.salesman,
                    num_stops: r.stop_count(),
                    distance: r.distance(|i| scenario.point(i))?,
                    path: r.route.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SolutionReport {
            summary: ReportSummary {
                algorithm,
                total_distance: plan.total_distance,
                computation_time: plan.computation_time,
                num_agents: plan.routes.len(),
                total_stops: total_points.saturating_sub(2 * plan.routes.len()),
            },
            route_details,
        })
    }
}

/// Vehicle assigned to an agent id in the fleet registry.
pub fn registry_vehicle(agent_id: usize) -> &'static str {
    match agent_id {
        1 => "Truck",
        2 => "Van",
        3 => "Scooter",
        4 => "Car",
        5 => "Motorcycle",
        _ => "Vehicle",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAgent {
    pub id: usize,
    pub name: String,
    pub vehicle: String,
    pub status: String,
    pub capacity: u32,
    pub utilization: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRoute {
    pub total_stops: usize,
    pub total_distance: f64,
    /// Hours at the average speed, two decimals
    pub estimated_time: f64,
    pub path: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOrder {
    pub order_id: String,
    pub customer: String,
    pub location: usize,
    pub items: u32,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatistics {
    pub orders_delivered: usize,
    pub on_time_rate: u32,
    pub efficiency_score: u32,
}

/// Operational profile of one agent with synthesized order data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub agent: ProfileAgent,
    pub route: ProfileRoute,
    pub orders: Vec<ProfileOrder>,
    pub statistics: ProfileStatistics,
}

impl AgentProfile {
    /// Build the profile of `agent_id` from a plan.
    pub fn new<R: Rng + ?Sized>(
        plan: &Plan,
        scenario: &Scenario,
        agent_id: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let route = plan
            .route_for(agent_id)
            .ok_or(DemoError::UnknownAgent(agent_id))?;
        let distance = route.distance(|i| scenario.point(i))?;
        let inner = if route.route.len() >= 2 {
            &route.route[1..route.route.len() - 1]
        } else {
            &[][..]
        };

        let orders: Vec<ProfileOrder> = inner
            .iter()
            .enumerate()
            .map(|(i, &location)| ProfileOrder {
                order_id: format!("ORD-{}-{}", agent_id, i + 1),
                customer: format!("Customer {}", i + 1),
                location,
                items: rng.gen_range(1..=5),
                priority: *[Priority::High, Priority::Medium, Priority::Low]
                    .choose(rng)
                    .unwrap_or(&Priority::Medium),
            })
            .collect();

        Ok(AgentProfile {
            agent: ProfileAgent {
                id: agent_id,
                name: format!("Agent {}", agent_id),
                vehicle: registry_vehicle(agent_id).to_string(),
                status: "Active".to_string(),
                capacity: VEHICLE_CAPACITY,
                utilization: rng.gen_range(60..=95),
            },
            route: ProfileRoute {
                total_stops: route.stop_count(),
                total_distance: distance,
                estimated_time: (distance / AVERAGE_SPEED * 100.0).round() / 100.0,
                path: route.route.clone(),
            },
            statistics: ProfileStatistics {
                orders_delivered: orders.len(),
                on_time_rate: rng.gen_range(80..=100),
                efficiency_score: rng.gen_range(75..=98),
            },
            orders,
        })
    }
}

/// Catalogue entry describing an algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmInfo {
    pub key: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<(String, f64)>,
}

/// Describe every algorithm a planner may be asked for.
pub fn algorithm_catalogue() -> Vec<AlgorithmInfo> {
    Algorithm::ALL
        .iter()
        .map(|a| AlgorithmInfo {
            key: a.key().to_string(),
            name: a.name().to_string(),
            description: a.description().to_string(),
            parameters: a
                .parameters()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        })
        .collect()
}
