//! Route assignment representation: which agent visits which locations.

use crate::error::{DemoError, Result};
use crate::geo::{distance_km, LatLng};
use crate::scenario::DEPOT_INDEX;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Optimization algorithms a backend planner may be asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "smo-aco")]
    SmoAco,
    #[serde(rename = "smo")]
    Smo,
    #[serde(rename = "aco")]
    Aco,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::SmoAco, Algorithm::Smo, Algorithm::Aco];

    pub fn key(&self) -> &'static str {
        match self {
            Algorithm::SmoAco => "smo-aco",
            Algorithm::Smo => "smo",
            Algorithm::Aco => "aco",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::SmoAco => "Spider Monkey - Ant Colony Hybrid",
            Algorithm::Smo => "Spider Monkey Optimization",
            Algorithm::Aco => "Ant Colony Optimization",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::SmoAco => {
                "A hybrid optimization approach that combines the exploration capabilities of \
                 Spider Monkey Optimization with the exploitation strengths of Ant Colony Optimization."
            }
            Algorithm::Smo => {
                "A swarm intelligence algorithm inspired by the fission-fusion social structure \
                 of spider monkeys."
            }
            Algorithm::Aco => {
                "A probabilistic technique for solving computational problems which can be \
                 reduced to finding good paths through graphs."
            }
        }
    }

    /// Default tuning parameters advertised for the algorithm.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        match self {
            Algorithm::SmoAco => vec![("iterations", 25.0), ("monkeys", 20.0), ("ants", 20.0)],
            Algorithm::Smo => vec![("iterations", 50.0), ("monkeys", 20.0)],
            Algorithm::Aco => vec![
                ("iterations", 50.0),
                ("ants", 20.0),
                ("alpha", 1.0),
                ("beta", 2.0),
                ("evaporation_rate", 0.5),
            ],
        }
    }
}

impl FromStr for Algorithm {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        Algorithm::ALL
            .iter()
            .copied()
            .find(|a| a.key() == key)
            .ok_or_else(|| DemoError::UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Request handed to a planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub depot: LatLng,
    pub locations: Vec<LatLng>,
    pub num_salesmen: usize,
    pub algorithm: Algorithm,
}

impl SolveRequest {
    /// Resolve a route index against the request's depot and locations.
    pub fn point(&self, index: usize) -> Option<LatLng> {
        if index == DEPOT_INDEX {
            Some(self.depot)
        } else {
            self.locations.get(index - 1).copied()
        }
    }
}

/// The stops of a single agent, depot included at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRoute {
    /// 1-based agent number
    pub salesman: usize,
    /// Route indices, `0` being the depot
    pub route: Vec<usize>,
}

impl AgentRoute {
    pub fn new(salesman: usize, route: Vec<usize>) -> Self {
        AgentRoute { salesman, route }
    }

    /// Number of delivery stops (non-depot indices).
    pub fn order_count(&self) -> usize {
        self.route.iter().filter(|&&i| i != DEPOT_INDEX).count()
    }

    /// Number of stops excluding the depot at both ends.
    pub fn stop_count(&self) -> usize {
        self.route.len().saturating_sub(2)
    }

    /// Total length of the route in kilometres.
    ///
    /// Fails with [`DemoError::UnknownOrder`] on the first index `resolve`
    /// cannot place.
    pub fn distance<F>(&self, resolve: F) -> Result<f64>
    where
        F: Fn(usize) -> Option<LatLng>,
    {
        let points = self
            .route
            .iter()
            .map(|&i| resolve(i).ok_or(DemoError::UnknownOrder(i)))
            .collect::<Result<Vec<_>>>()?;

        Ok(points
            .iter()
            .tuple_windows()
            .map(|(from, to)| distance_km(from, to))
            .sum())
    }
}

impl fmt::Display for AgentRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Agent {}: {}",
            self.salesman,
            self.route.iter().join(" -> ")
        )
    }
}

/// A complete route assignment as returned by a planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub routes: Vec<AgentRoute>,
    /// Sum of all route lengths in kilometres
    pub total_distance: f64,
    /// Planner run time in milliseconds
    pub computation_time: f64,
}

impl Plan {
    /// Build a plan, computing the total distance from the routes.
    pub fn new<F>(routes: Vec<AgentRoute>, resolve: F, computation_time: f64) -> Result<Self>
    where
        F: Fn(usize) -> Option<LatLng>,
    {
        let mut total_distance = 0.0;
        for route in &routes {
            total_distance += route.distance(&resolve)?;
        }
        Ok(Plan {
            routes,
            total_distance,
            computation_time,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of deliveries across all routes.
    pub fn order_count(&self) -> usize {
        self.routes.iter().map(AgentRoute::order_count).sum()
    }

    /// Route of the agent with the given 1-based id.
    pub fn route_for(&self, salesman: usize) -> Option<&AgentRoute> {
        self.routes.iter().find(|r| r.salesman == salesman)
    }
}
