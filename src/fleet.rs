//! Delivery agents drawn on the map from a plan.

use crate::error::{DemoError, Result};
use crate::geo::{lerp, LatLng};
use crate::plan::Plan;
use crate::scenario::Scenario;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Route colors, cycled by agent position.
pub const COLORS: [&str; 10] = [
    "#4361ee", "#3a0ca3", "#7209b7", "#f72585", "#4cc9f0", "#ff9e00", "#38b000", "#ff006e",
    "#fb5607", "#8338ec",
];

/// Color for the agent at 0-based position `index`.
pub fn color_for(index: usize) -> &'static str {
    COLORS[index % COLORS.len()]
}

/// Kind of vehicle an agent rides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Bike,
    Scooter,
    Car,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 3] = [VehicleKind::Bike, VehicleKind::Scooter, VehicleKind::Car];

    /// Map icon name.
    pub fn icon(&self) -> &'static str {
        match self {
            VehicleKind::Bike => "motorcycle",
            VehicleKind::Scooter => "bicycle",
            VehicleKind::Car => "car",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VehicleKind::Bike => "Bike Courier",
            VehicleKind::Scooter => "Scooter",
            VehicleKind::Car => "Car Delivery",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&VehicleKind::Bike)
    }
}

/// An agent following its route on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// 1-based agent number, same as the plan's salesman id
    pub id: usize,
    pub kind: VehicleKind,
    pub color: String,
    /// Resolved route points, depot at both ends
    pub path: Vec<LatLng>,
    /// Deliveries on the route
    pub orders: usize,
    /// Index into `path` of the point the agent is at
    pub current_pos: usize,
}

impl Agent {
    pub fn name(&self) -> String {
        format!("Agent {}", self.id)
    }

    /// Index of the last path point.
    pub fn last_pos(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_finished(&self) -> bool {
        self.current_pos >= self.last_pos()
    }

    pub fn position(&self) -> Option<LatLng> {
        self.path.get(self.current_pos).copied()
    }

    /// Whether the agent sits on a point equal to its starting point.
    pub fn at_start_point(&self) -> bool {
        match (self.path.first(), self.position()) {
            (Some(start), Some(current)) => *start == current,
            _ => false,
        }
    }

    /// Fraction of the route completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let last = self.last_pos();
        if last == 0 {
            return 0.0;
        }
        self.current_pos as f64 / last as f64
    }

    /// Position between the current path point and the next one.
    pub fn interpolated_position(&self, fraction: f64) -> Option<LatLng> {
        let current = self.position()?;
        match self.path.get(self.current_pos + 1) {
            Some(next) => Some(lerp(&current, next, fraction)),
            None => Some(current),
        }
    }

    pub fn move_to(&mut self, pos: usize) {
        self.current_pos = pos.min(self.last_pos());
    }

    pub fn reset(&mut self) {
        self.current_pos = 0;
    }
}

/// Build one agent per planned route, each with a randomly chosen vehicle.
pub fn draw_routes<R: Rng + ?Sized>(
    plan: &Plan,
    scenario: &Scenario,
    rng: &mut R,
) -> Result<Vec<Agent>> {
    plan.routes
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let path = route
                .route
                .iter()
                .map(|&i| scenario.point(i).ok_or(DemoError::UnknownOrder(i)))
                .collect::<Result<Vec<_>>>()?;

            Ok(Agent {
                id: route.salesman,
                kind: VehicleKind::random(rng),
                color: color_for(index).to_string(),
                path,
                orders: route.order_count(),
                current_pos: 0,
            })
        })
        .collect()
}

/// One entry in the map legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub id: usize,
    pub color: String,
    pub icon: String,
}

impl LegendEntry {
    pub fn label(&self) -> String {
        format!("Agent {}", self.id)
    }
}

/// Legend for drawn agents, or a preview for `num_agents` when none are drawn.
pub fn legend(agents: &[Agent], num_agents: usize) -> Vec<LegendEntry> {
    if agents.is_empty() {
        (0..num_agents)
            .map(|i| LegendEntry {
                id: i + 1,
                color: color_for(i).to_string(),
                icon: VehicleKind::ALL[i % VehicleKind::ALL.len()].icon().to_string(),
            })
            .collect()
    } else {
        agents
            .iter()
            .map(|a| LegendEntry {
                id: a.id,
                color: a.color.clone(),
                icon: a.kind.icon().to_string(),
            })
            .collect()
    }
}
