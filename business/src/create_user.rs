//! Registration command: validate locally, upload, retry once on an
//! expired token.

use std::future::Future;
use std::pin::Pin;

use log::{error, info};
use roster_states::{Command, CommandSnapshot, State, Updater, state_assign_impl};

use crate::api::{ApiHandle, DirectoryApi};
use crate::directory::DirectoryState;
use crate::error::ApiError;

/// Photo bytes staged by the presentation layer before dispatching
/// [`CreateUserCommand`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoInput {
    pub bytes: Option<Vec<u8>>,
}

impl State for PhotoInput {
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

const AUTH_FAILED_MESSAGE: &str = "Cannot create user. Authentication failed (token expired?).";
const EMAIL_INVALID_MESSAGE: &str = "Email should be valid.";

/// Register the user described by the form in [`DirectoryState`].
///
/// Invalid fields abort before any network traffic. A 401 on upload
/// triggers exactly one token refresh and one retry; any further failure
/// surfaces as an authentication error.
#[derive(Debug, Default)]
pub struct CreateUserCommand;

impl Command for CreateUserCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let api = snap.state::<ApiHandle>().api();
        let mut form_check = snap.state::<DirectoryState>();
        let photo = snap.state::<PhotoInput>();

        Box::pin(async move {
            form_check.photo_field_valid = photo.bytes.is_some();
            let valid = form_check.validate_fields();

            // Publish the per-field verdicts whether or not we proceed.
            let flags = (
                form_check.name_field_valid,
                form_check.email_field_valid,
                form_check.phone_field_valid,
                form_check.photo_field_valid,
            );
            updater.mutate::<DirectoryState>(move |state| {
                state.has_attempted_sign_up = true;
                state.name_field_valid = flags.0;
                state.email_field_valid = flags.1;
                state.phone_field_valid = flags.2;
                state.photo_field_valid = flags.3;
            });

            if !valid {
                info!("sign-up blocked by local validation");
                return;
            }
            let Some(photo_bytes) = photo.bytes else {
                return;
            };

            updater.mutate::<DirectoryState>(DirectoryState::begin_loading);
            let fields = form_check.new_user_fields();

            match api.create_user(&fields, &photo_bytes).await {
                Ok(outcome) => match outcome.new_user_id() {
                    Some(id) => hydrate_and_prepend(api.as_ref(), &updater, id).await,
                    None => {
                        error!("create user succeeded without a usable id: {outcome:?}");
                        updater.mutate::<DirectoryState>(|state| {
                            state.fail_message(EMAIL_INVALID_MESSAGE);
                        });
                    }
                },
                Err(ApiError::Unauthorized) => {
                    info!("registration token rejected, refreshing once");
                    // A failed refresh is its own error, not an auth
                    // failure of the create call.
                    if let Err(err) = api.refresh_token().await {
                        error!("token refresh failed: {err}");
                        updater.mutate::<DirectoryState>(move |state| state.fail(&err));
                        return;
                    }
                    match api.create_user(&fields, &photo_bytes).await {
                        Ok(outcome) => match outcome.new_user_id() {
                            Some(id) => hydrate_and_prepend(api.as_ref(), &updater, id).await,
                            None => updater.mutate::<DirectoryState>(|state| {
                                state.fail_message(AUTH_FAILED_MESSAGE);
                            }),
                        },
                        Err(err) => {
                            error!("create user retry failed: {err}");
                            updater.mutate::<DirectoryState>(|state| {
                                state.fail_message(AUTH_FAILED_MESSAGE);
                            });
                        }
                    }
                }
                Err(err) => {
                    error!("create user failed: {err}");
                    updater.mutate::<DirectoryState>(move |state| state.fail(&err));
                }
            }
        })
    }
}

/// Fetch the full record of a freshly created user and put it at the top
/// of the list.
async fn hydrate_and_prepend(api: &dyn DirectoryApi, updater: &Updater, id: i64) {
    match api.get_user(id).await {
        Ok(user) => {
            info!("registered user {id}");
            updater.mutate::<DirectoryState>(move |state| state.insert_new_user(user));
        }
        Err(err) => {
            error!("failed to fetch newly created user {id}: {err}");
            updater.mutate::<DirectoryState>(move |state| state.fail(&err));
        }
    }
}
