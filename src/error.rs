use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoadGraphError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Junction boundary geometry could not be produced. Fatal for the current tile.
    #[error("Algorithm failure: {0}")]
    Algorithm(String),

    #[error("GeoJSON error: {0}")]
    Geojson(String),
}

pub type Result<T> = std::result::Result<T, RoadGraphError>;
