//! Route planners.
//!
//! A planner turns a [`SolveRequest`] into a [`Plan`]. The only planner
//! shipped here is [`EvenSlicePlanner`], a stand-in for an optimizing backend
//! that hands each agent a contiguous slice of the locations in the order
//! they were generated.

use crate::error::{DemoError, Result};
use crate::plan::{AgentRoute, Plan, SolveRequest};
use crate::scenario::DEPOT_INDEX;
use log::{debug, info};
use std::time::Instant;

/// Produces a route assignment for a request.
pub trait Planner {
    fn solve(&self, request: &SolveRequest) -> Result<Plan>;
}

/// Splits locations into consecutive, equally sized chunks, one per agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenSlicePlanner;

impl EvenSlicePlanner {
    /// Compute the route indices without evaluating distances.
    ///
    /// Each agent gets `ceil(n / k)` locations; trailing agents may end up
    /// without a route when the locations run out.
    pub fn slice_routes(num_locations: usize, num_salesmen: usize) -> Vec<AgentRoute> {
        if num_locations == 0 || num_salesmen == 0 {
            return Vec::new();
        }

        let per_agent = num_locations.div_ceil(num_salesmen);
        let mut routes = Vec::with_capacity(num_salesmen);

        for i in 0..num_salesmen {
            let start = i * per_agent;
            if start >= num_locations {
                break;
            }
            let end = ((i + 1) * per_agent).min(num_locations);

            let mut route = Vec::with_capacity(end - start + 2);
            route.push(DEPOT_INDEX);
            route.extend((start..end).map(|j| j + 1));
            route.push(DEPOT_INDEX);

            routes.push(AgentRoute::new(i + 1, route));
        }

        routes
    }
}

impl Planner for EvenSlicePlanner {
    fn solve(&self, request: &SolveRequest) -> Result<Plan> {
        if request.locations.is_empty() {
            return Err(DemoError::NoLocations);
        }
        if request.num_salesmen == 0 {
            return Err(DemoError::InvalidConfig {
                message: "at least one agent is required".to_string(),
            });
        }

        let start_time = Instant::now();
        let routes = Self::slice_routes(request.locations.len(), request.num_salesmen);
        for route in &routes {
            debug!("{}", route);
        }

        let mut plan = Plan::new(routes, |i| request.point(i), 0.0)?;
        plan.computation_time = start_time.elapsed().as_secs_f64() * 1000.0;

        info!(
            "Planned {} routes for {} locations ({}), total distance {:.2} km",
            plan.routes.len(),
            request.locations.len(),
            request.algorithm,
            plan.total_distance
        );

        Ok(plan)
    }
}
