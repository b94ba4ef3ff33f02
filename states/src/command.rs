use std::future::Future;
use std::pin::Pin;

use crate::{CommandSnapshot, Updater};

/// A manual-only unit of work with side effects, typically network IO.
///
/// Commands read their inputs from the snapshot taken at dispatch time and
/// publish results through the [`Updater`]; they never touch the context
/// directly. Each dispatch completes exactly once, and commands must not
/// run concurrently with themselves; callers gate on the relevant loading
/// flags before dispatching again.
pub trait Command {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}
