//! Map output: GeoJSON layers and a console rendering.

use crate::fleet::Agent;
use crate::geo::{Bounds, LatLng};
use crate::scenario::Scenario;
use crate::simulation::Pulse;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

const ROUTE_WEIGHT: &str = "4";
const ROUTE_OPACITY: &str = "0.7";
const ROUTE_DASH: &str = "10, 10";

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: (f64, f64) },
    LineString { coordinates: Vec<(f64, f64)> },
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub struct Feature {
    pub properties: BTreeMap<String, String>,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Features whose `layer` property equals `layer`.
    pub fn layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features
            .iter()
            .filter(move |f| f.properties.get("layer").map(String::as_str) == Some(layer))
    }
}

fn props(pairs: &[(&str, String)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn point(location: &LatLng) -> Geometry {
    Geometry::Point {
        coordinates: location.lng_lat(),
    }
}

/// Build the map layers: depot, order markers, route lines, agents and pulses.
pub fn map_layers(scenario: &Scenario, agents: &[Agent], pulses: &[Pulse]) -> FeatureCollection {
    let mut features = Vec::with_capacity(1 + scenario.orders.len() + agents.len() * 2);

    features.push(Feature {
        properties: props(&[
            ("layer", "depot".to_string()),
            ("marker-symbol", "warehouse".to_string()),
            ("name", "Distribution Center".to_string()),
            ("city", scenario.depot.city.display_name()),
        ]),
        geometry: point(&scenario.depot.location),
    });

    features.extend(scenario.orders.iter().map(|order| Feature {
        properties: props(&[
            ("layer", "order".to_string()),
            ("marker-symbol", "house-user".to_string()),
            ("name", format!("Order #{}", order.id)),
            ("customer", order.customer.clone()),
            ("order", order.item.clone()),
            ("time", order.order_time.clone()),
        ]),
        geometry: point(&order.location),
    }));

    for agent in agents {
        features.push(Feature {
            properties: props(&[
                ("layer", "route".to_string()),
                ("agent", agent.id.to_string()),
                ("stroke", agent.color.clone()),
                ("stroke-width", ROUTE_WEIGHT.to_string()),
                ("stroke-opacity", ROUTE_OPACITY.to_string()),
                ("stroke-dasharray", ROUTE_DASH.to_string()),
            ]),
            geometry: Geometry::LineString {
                coordinates: agent.path.iter().map(LatLng::lng_lat).collect(),
            },
        });
    }

    features.extend(agents.iter().filter_map(|agent| {
        agent.position().map(|position| Feature {
            properties: props(&[
                ("layer", "agent".to_string()),
                ("agent", agent.id.to_string()),
                ("name", agent.name()),
                ("marker-color", agent.color.clone()),
                ("marker-symbol", agent.kind.icon().to_string()),
                ("vehicle", agent.kind.name().to_string()),
                ("orders", agent.orders.to_string()),
                ("progress", format!("{:.0}", agent.progress() * 100.0)),
            ]),
            geometry: point(&position),
        })
    }));

    features.extend(pulses.iter().map(|pulse| Feature {
        properties: props(&[
            ("layer", "pulse".to_string()),
            ("agent", pulse.agent_id.to_string()),
            ("stroke", pulse.color.clone()),
            ("radius", format!("{:.0}", pulse.radius)),
            ("opacity", format!("{:.2}", pulse.opacity)),
        ]),
        geometry: point(&pulse.center),
    }));

    FeatureCollection { features }
}

const GRID_WIDTH: usize = 80;
const GRID_HEIGHT: usize = 25;
const ROUTE_SYMBOLS: [char; 10] = ['*', '+', 'x', '#', '@', '&', '%', '=', '^', '$'];

/// Render the scenario, routes and agent positions as text.
///
/// Orders are drawn with their agent's route symbol (`.` when unassigned),
/// the depot as `D` and agents by the last digit of their id.
pub fn console_map(scenario: &Scenario, agents: &[Agent]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = draw_console_map(&mut out, scenario, agents);
    out
}

fn draw_console_map(out: &mut String, scenario: &Scenario, agents: &[Agent]) -> std::fmt::Result {
    let points: Vec<LatLng> = std::iter::once(scenario.depot.location)
        .chain(scenario.orders.iter().map(|o| o.location))
        .collect();
    let bounds = Bounds::from_points(&points).unwrap_or_else(|| Bounds::new(0.0, 0.0, 0.0, 0.0));

    let cell = |p: &LatLng| -> (usize, usize) {
        let scale = |value: f64, min: f64, span: f64, size: usize| -> usize {
            if span <= f64::EPSILON {
                size / 2
            } else {
                (((value - min) / span) * (size as f64 - 1.0)).round() as usize
            }
        };
        let x = scale(p.lng, bounds.west, bounds.lng_span(), GRID_WIDTH);
        // North is up.
        let y = (GRID_HEIGHT - 1).saturating_sub(scale(p.lat, bounds.south, bounds.lat_span(), GRID_HEIGHT));
        (x.min(GRID_WIDTH - 1), y.min(GRID_HEIGHT - 1))
    };

    let mut grid = vec![vec![' '; GRID_WIDTH]; GRID_HEIGHT];

    for order in &scenario.orders {
        let (x, y) = cell(&order.location);
        grid[y][x] = '.';
    }
    for (index, agent) in agents.iter().enumerate() {
        let symbol = ROUTE_SYMBOLS[index % ROUTE_SYMBOLS.len()];
        for p in agent.path.iter().skip(1).take(agent.path.len().saturating_sub(2)) {
            let (x, y) = cell(p);
            grid[y][x] = symbol;
        }
    }
    let (dx, dy) = cell(&scenario.depot.location);
    grid[dy][dx] = 'D';
    for agent in agents {
        if let Some(position) = agent.position() {
            let (x, y) = cell(&position);
            grid[y][x] = char::from_digit((agent.id % 10) as u32, 10).unwrap_or('?');
        }
    }

    writeln!(out, "{}", scenario.depot.city.title())?;
    writeln!(out, "{}", "-".repeat(GRID_WIDTH))?;
    for row in &grid {
        writeln!(out, "{}", row.iter().collect::<String>())?;
    }
    writeln!(out, "{}", "-".repeat(GRID_WIDTH))?;

    writeln!(out, "Legend:")?;
    writeln!(out, "D - Depot")?;
    writeln!(out, ". - Unassigned order")?;
    for (index, agent) in agents.iter().enumerate() {
        writeln!(
            out,
            "{} - Route of {} ({}, {})",
            ROUTE_SYMBOLS[index % ROUTE_SYMBOLS.len()],
            agent.name(),
            agent.kind.name(),
            agent.color
        )?;
    }

    Ok(())
}
