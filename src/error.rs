//! Error types for island map generation

use std::fmt;

/// Errors that can occur during map generation or queries
#[derive(Debug, Clone)]
pub enum MapgenError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Generation failed due to geometry issues
    GenerationFailed(String),
    /// Requested region ID does not exist
    RegionNotFound(usize),
}

impl fmt::Display for MapgenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapgenError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            MapgenError::GenerationFailed(msg) => write!(f, "generation failed: {}", msg),
            MapgenError::RegionNotFound(id) => write!(f, "region not found: {}", id),
        }
    }
}

impl std::error::Error for MapgenError {}

/// Result type alias for map generation operations
pub type Result<T> = std::result::Result<T, MapgenError>;
