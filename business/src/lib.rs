//! Business logic for the user directory client.
//!
//! The crate splits into a REST client behind the [`DirectoryApi`] trait
//! and a set of commands that drive the observable [`DirectoryState`]
//! through a `roster_states::StateCtx`. A host wires it up by registering
//! the states, dispatching commands and awaiting their futures on its own
//! runtime, then calling `sync` to apply the results.

mod api;
mod config;
mod connectivity;
mod create_user;
mod directory;
mod error;
mod fetch_positions;
mod fetch_users;
pub mod http;
mod models;
mod multipart;
mod token_store;
mod validation;

pub use api::{ApiHandle, DirectoryApi, HttpDirectoryApi, NewUser};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use connectivity::{ConnectivityCommand, ConnectivitySignal, ConnectivityState};
pub use create_user::{CreateUserCommand, PhotoInput};
pub use directory::DirectoryState;
pub use error::ApiError;
pub use fetch_positions::FetchPositionsCommand;
pub use fetch_users::{FetchMoreUsersCommand, FetchUsersCommand, FetchUsersRequest};
pub use models::{
    CreateUserOutcome, PagedUsers, PageLinks, Position, PositionsResponse, TokenResponse, User,
};
pub use multipart::MultipartForm;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use validation::{email_valid, name_valid, phone_valid};
