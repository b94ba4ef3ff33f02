use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state not registered: {type_name}")]
    NotRegistered { type_name: &'static str },
    #[error("no snapshot captured for state: {type_name}")]
    NotSnapshotted { type_name: &'static str },
}
