//! Commands that load pages of the user list.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use log::{error, info};
use roster_states::{Command, CommandSnapshot, State, Updater, state_assign_impl};

use crate::api::{ApiHandle, DirectoryApi};
use crate::config::ClientConfig;
use crate::directory::DirectoryState;

/// Page selector for the next fetch. Mutate this state before
/// dispatching [`FetchUsersCommand`] to load something other than the
/// first page; the page size comes from [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchUsersRequest {
    pub page: u32,
}

impl Default for FetchUsersRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl State for FetchUsersRequest {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn std::any::Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn std::any::Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// Shared fetch path for first loads, reloads and load-more.
pub(crate) async fn run_fetch(
    api: Arc<dyn DirectoryApi>,
    updater: Updater,
    page: u32,
    count: u32,
    more: bool,
) {
    updater.mutate::<DirectoryState>(move |state| {
        if more {
            state.begin_loading_more();
        } else {
            state.begin_loading();
        }
    });

    match api.get_users(page, count).await {
        Ok(response) => {
            info!(
                "fetched users page {page}: {} of {} total",
                response.users.len(),
                response.total_users
            );
            let now = Utc::now();
            updater.mutate::<DirectoryState>(move |state| state.merge_page(&response, count, now));
        }
        Err(err) => {
            error!("failed to fetch users page {page}: {err}");
            updater.mutate::<DirectoryState>(move |state| state.fail(&err));
        }
    }
}

/// Load the page named by [`FetchUsersRequest`]. Page 1 replaces the
/// displayed list.
#[derive(Debug, Default)]
pub struct FetchUsersCommand;

impl Command for FetchUsersCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let api = snap.state::<ApiHandle>().api();
        let request = snap.state::<FetchUsersRequest>();
        let config = snap.state::<ClientConfig>();
        Box::pin(run_fetch(
            api,
            updater,
            request.page,
            config.page_size,
            false,
        ))
    }
}

/// Append the next page, if one exists and nothing is in flight.
#[derive(Debug, Default)]
pub struct FetchMoreUsersCommand;

impl Command for FetchMoreUsersCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let api = snap.state::<ApiHandle>().api();
        let config = snap.state::<ClientConfig>();
        let directory = snap.state::<DirectoryState>();
        Box::pin(async move {
            if !directory.can_load_more() {
                return;
            }
            run_fetch(
                api,
                updater,
                directory.current_page + 1,
                config.page_size,
                true,
            )
            .await;
        })
    }
}
