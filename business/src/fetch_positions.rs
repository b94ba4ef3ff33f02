//! Command that loads the position list for the sign-up form.

use std::future::Future;
use std::pin::Pin;

use log::error;
use roster_states::{Command, CommandSnapshot, Updater};

use crate::api::ApiHandle;
use crate::directory::DirectoryState;

#[derive(Debug, Default)]
pub struct FetchPositionsCommand;

impl Command for FetchPositionsCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let api = snap.state::<ApiHandle>().api();
        Box::pin(async move {
            updater.mutate::<DirectoryState>(DirectoryState::begin_loading);
            match api.get_positions().await {
                Ok(positions) => {
                    updater.mutate::<DirectoryState>(move |state| state.set_positions(positions));
                }
                Err(err) => {
                    error!("failed to fetch positions: {err}");
                    updater.mutate::<DirectoryState>(move |state| state.fail(&err));
                }
            }
        })
    }
}
