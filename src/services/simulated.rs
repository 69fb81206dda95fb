use async_trait::async_trait;
use tracing::info;

use super::data_source::{DataSource, Mode, UpstreamStatus};
use crate::error::GatewayError;
use crate::model::{LineCode, Stop, StopQuery, Vehicle};
use crate::simulation::SimulationEngine;

/// Serves synthetic data; never fails and never touches the network.
#[derive(Debug, Default, Clone)]
pub struct SimulatedSource {
    engine: SimulationEngine,
}

impl SimulatedSource {
    pub fn new(engine: SimulationEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl DataSource for SimulatedSource {
    fn mode(&self) -> Mode {
        Mode::Simulation
    }

    async fn vehicles(&self, line: Option<&str>) -> Result<Vec<Vehicle>, GatewayError> {
        info!("Using simulation mode for bus data");
        Ok(self.engine.simulate_vehicles(line))
    }

    async fn lines(&self) -> Result<Vec<LineCode>, GatewayError> {
        info!("Using simulation mode for bus lines");
        Ok(self.engine.simulate_lines())
    }

    async fn stops(&self, query: &StopQuery) -> Result<Vec<Stop>, GatewayError> {
        info!("Using simulation mode for bus stops");
        Ok(self.engine.simulate_stops(query))
    }

    async fn upstream_status(&self) -> UpstreamStatus {
        UpstreamStatus::Simulated
    }
}
