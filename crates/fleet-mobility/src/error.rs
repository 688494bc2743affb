use fleet_core::TruckId;
use fleet_network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("truck {0} needs a plan of at least one node")]
    EmptyPlan(TruckId),

    #[error("{field} must be within 0..=100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },

    #[error("plan resolution failed: {0}")]
    Network(#[from] NetworkError),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
