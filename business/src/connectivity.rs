//! Connectivity edge handling.
//!
//! The platform feeds raw reachability reports into
//! [`ConnectivitySignal`]; [`ConnectivityCommand`] deduplicates them and
//! refetches the directory when the network comes back while the list is
//! still empty.

use std::future::Future;
use std::pin::Pin;

use log::info;
use roster_states::{Command, CommandSnapshot, State, Updater, state_assign_impl};

use crate::api::ApiHandle;
use crate::config::ClientConfig;
use crate::directory::DirectoryState;
use crate::fetch_users::run_fetch;

/// Latest raw reachability report from the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectivitySignal {
    pub connected: bool,
}

impl State for ConnectivitySignal {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn std::any::Any + Send>> {
        Some(Box::new(*self))
    }

    fn assign_box(&mut self, new_self: Box<dyn std::any::Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Deduplicated connectivity as the rest of the app observes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectivityState {
    pub online: bool,
    /// False until the first report lands; the first report always counts
    /// as a change.
    pub observed: bool,
}

impl ConnectivityState {
    pub fn is_change(&self, connected: bool) -> bool {
        !self.observed || self.online != connected
    }
}

impl State for ConnectivityState {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn std::any::Any + Send>> {
        Some(Box::new(*self))
    }

    fn assign_box(&mut self, new_self: Box<dyn std::any::Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Process the latest [`ConnectivitySignal`]. Repeats of the current
/// status are dropped; a transition to online with an empty directory
/// kicks off a first-page fetch.
#[derive(Debug, Default)]
pub struct ConnectivityCommand;

impl Command for ConnectivityCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let api = snap.state::<ApiHandle>().api();
        let signal = snap.state::<ConnectivitySignal>();
        let connectivity = snap.state::<ConnectivityState>();
        let config = snap.state::<ClientConfig>();
        let directory = snap.state::<DirectoryState>();

        Box::pin(async move {
            if !connectivity.is_change(signal.connected) {
                return;
            }
            updater.set(ConnectivityState {
                online: signal.connected,
                observed: true,
            });

            if signal.connected && directory.users.is_empty() {
                info!("network restored, loading directory");
                run_fetch(api, updater, 1, config.page_size, false).await;
            }
        })
    }
}
