//! Query orchestration.
//!
//! A [`DataSource`] answers the three logical queries. [`LiveSource`] talks
//! to the upstream API and normalizes its payloads; [`SimulatedSource`]
//! synthesizes data. [`GatewayService`] picks one at startup and delegates.

mod data_source;
mod gateway;
mod live;
mod simulated;

pub use data_source::{DataSource, Mode, UpstreamStatus};
pub use gateway::{GatewayService, GatewayStatus};
pub use live::LiveSource;
pub use simulated::SimulatedSource;
