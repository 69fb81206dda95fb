pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod model;
pub mod normalize;
pub mod output;
pub mod services;
pub mod simulation;
pub mod stats;
