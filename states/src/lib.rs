//! A small observable-state store.
//!
//! States live in a [`StateCtx`] keyed by concrete type. Side effects are
//! expressed as [`Command`]s: dispatched with a cloned snapshot of their
//! inputs, they publish results through an [`Updater`] channel that the
//! owning context drains with [`StateCtx::sync`]. Subscribers observe a
//! [`StateEvent`] for every applied mutation.

mod command;
mod ctx;
mod error;
mod snapshot;
mod state;
mod updater;

pub use command::Command;
pub use ctx::StateCtx;
pub use error::StateError;
pub use snapshot::CommandSnapshot;
pub use state::{State, state_assign_impl};
pub use updater::{StateEvent, Updater};
