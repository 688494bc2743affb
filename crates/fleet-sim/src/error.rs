use fleet_core::TruckId;
use fleet_mobility::MobilityError;
use fleet_network::NetworkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("truck not found: {0}")]
    TruckNotFound(TruckId),

    #[error("duplicate truck id: {0}")]
    DuplicateTruck(TruckId),

    #[error("ticker thread panicked")]
    TickerPanicked,

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

pub type SimResult<T> = Result<T, SimError>;
