use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid frame stride: {value} (must be between 1 and 99999)")]
    InvalidStride { value: usize },

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Track for agent {agent_id} is not strictly increasing at frame {frame}")]
    NonMonotonicTrack { agent_id: i64, frame: i64 },

    #[error("Track for agent {agent_id} contains no samples")]
    EmptyTrack { agent_id: i64 },

    #[error("Object name already taken: {name}")]
    NameCollision { name: String },

    #[error("Object exists with a different kind or owner: {name}")]
    KindMismatch { name: String },

    #[error("Unknown collection: {name}")]
    UnknownCollection { name: String },

    #[error("Stale object handle: {id}")]
    StaleHandle { id: u64 },

    #[error("Boundary {index} has {vertex_count} vertices, need at least 2")]
    DegenerateBoundary { index: usize, vertex_count: usize },
}

/// Fatal import failures surfaced to the caller. Recoverable per-entity
/// failures are counted in the summary instead of raised.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Trajectory backend unavailable: {reason}")]
    DependencyMissing { reason: String },

    #[error("Source unreadable: {reason}")]
    SourceUnreadable { reason: String },

    #[error("Source contains no agents and no geometry: {path}")]
    SourceEmpty { path: String },
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ImportResult<T> = Result<T, ImportError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
