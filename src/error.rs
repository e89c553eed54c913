//! Error types for the routing demo.

use thiserror::Error;

/// Everything that can go wrong while driving the demo.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Please generate locations first!")]
    NoLocations,

    #[error("Please solve the routes first!")]
    NoRoutes,

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("No order #{0}")]
    UnknownOrder(usize),

    #[error("No route found for agent {0}")]
    UnknownAgent(usize),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DemoError>;
