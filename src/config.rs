//! Configuration parameters for the routing demo.

use crate::error::{DemoError, Result};
use crate::geo::City;
use crate::plan::Algorithm;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// Allowed number of delivery locations.
pub const LOCATIONS_RANGE: RangeInclusive<usize> = 5..=100;
/// Allowed number of delivery agents.
pub const AGENTS_RANGE: RangeInclusive<usize> = 1..=10;
/// Allowed simulation speed multipliers.
pub const SPEED_RANGE: RangeInclusive<f64> = 0.1..=10.0;

/// Configuration settings for a demo session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// City the depot is placed in
    pub city: City,
    /// Number of delivery locations to generate
    pub num_locations: usize,
    /// Number of delivery agents (salesmen)
    pub num_agents: usize,
    /// Algorithm requested from the planner
    pub algorithm: Algorithm,
    /// Seed for reproducible runs, entropy when absent
    pub seed: Option<u64>,
    /// Share of the visible map used for scattering locations
    pub spread_ratio: f64,
    /// Map viewport width in pixels
    pub viewport_width: u32,
    /// Map viewport height in pixels
    pub viewport_height: u32,
    /// Simulation speed multiplier
    pub speed: f64,
    /// Padding applied when fitting the map to the markers
    pub fit_padding: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            city: City::Bangalore,
            num_locations: 20,
            num_agents: 3,
            algorithm: Algorithm::SmoAco,
            seed: None,
            spread_ratio: 0.8,
            viewport_width: 1024,
            viewport_height: 600,
            speed: 1.0,
            fit_padding: 0.1,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file; missing fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in its allowed range.
    pub fn validate(&self) -> Result<()> {
        if !LOCATIONS_RANGE.contains(&self.num_locations) {
            return Err(invalid(format!(
                "num_locations must be within {}..={}, got {}",
                LOCATIONS_RANGE.start(),
                LOCATIONS_RANGE.end(),
                self.num_locations
            )));
        }
        if !AGENTS_RANGE.contains(&self.num_agents) {
            return Err(invalid(format!(
                "num_agents must be within {}..={}, got {}",
                AGENTS_RANGE.start(),
                AGENTS_RANGE.end(),
                self.num_agents
            )));
        }
        if !(self.spread_ratio > 0.0 && self.spread_ratio <= 1.0) {
            return Err(invalid(format!(
                "spread_ratio must be within (0, 1], got {}",
                self.spread_ratio
            )));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(invalid("viewport must not be empty".to_string()));
        }
        validate_speed(self.speed)?;
        if self.fit_padding < 0.0 {
            return Err(invalid(format!(
                "fit_padding must not be negative, got {}",
                self.fit_padding
            )));
        }
        Ok(())
    }

    /// Set the city.
    pub fn with_city(mut self, city: City) -> Self {
        self.city = city;
        self
    }

    /// Set the number of delivery locations.
    pub fn with_num_locations(mut self, n: usize) -> Self {
        self.num_locations = n;
        self
    }

    /// Set the number of agents.
    pub fn with_num_agents(mut self, n: usize) -> Self {
        self.num_agents = n;
        self
    }

    /// Set the requested algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the spread ratio.
    pub fn with_spread_ratio(mut self, ratio: f64) -> Self {
        self.spread_ratio = ratio;
        self
    }

    /// Set the viewport size in pixels.
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the simulation speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }
}

/// Check a simulation speed multiplier against [`SPEED_RANGE`].
pub fn validate_speed(speed: f64) -> Result<()> {
    if !SPEED_RANGE.contains(&speed) {
        return Err(invalid(format!(
            "speed must be within {}..={}, got {}",
            SPEED_RANGE.start(),
            SPEED_RANGE.end(),
            speed
        )));
    }
    Ok(())
}

fn invalid(message: String) -> DemoError {
    DemoError::InvalidConfig { message }
}
