use crate::ScopeLevel;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("{level} {id} not found in scope tree")]
    NotFound { level: ScopeLevel, id: i64 },
    #[error("duplicate {level} {id} in directory snapshot")]
    DuplicateNode { level: ScopeLevel, id: i64 },
    #[error("{level} {id} references a parent missing from the directory snapshot")]
    OrphanNode { level: ScopeLevel, id: i64 },
    #[error("{level} {id} was listed under parent {listed_under} but names parent {recorded}")]
    MisplacedNode {
        level: ScopeLevel,
        id: i64,
        listed_under: i64,
        recorded: i64,
    },
    #[error("invalid grant record: {0}")]
    InvalidRecord(String),
}

impl ScopeError {
    pub(crate) fn not_found(level: ScopeLevel, id: i64) -> Self {
        Self::NotFound { level, id }
    }
}

pub type ScopeResult<T> = Result<T, ScopeError>;
