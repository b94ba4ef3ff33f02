use std::any::{TypeId, type_name};

use crate::State;

/// A queued state change produced by an async command.
pub(crate) struct Mutation {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) apply: Box<dyn FnOnce(&mut dyn State) + Send>,
}

/// Change notification delivered to subscribers after a mutation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEvent {
    pub type_name: &'static str,
}

/// Send-safe handle for publishing state changes from async commands.
///
/// Changes are queued on a channel and applied in arrival order by
/// [`StateCtx::sync`](crate::StateCtx::sync) on the owning context.
#[derive(Clone)]
pub struct Updater {
    send: flume::Sender<Mutation>,
}

impl Updater {
    pub(crate) fn new(send: flume::Sender<Mutation>) -> Self {
        Self { send }
    }

    /// Replace a state wholesale.
    pub fn set<T: State>(&self, value: T) {
        self.queue::<T>(Box::new(move |state| state.assign_box(Box::new(value))));
    }

    /// Queue an in-place mutation of a single state.
    pub fn mutate<T: State>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        self.queue::<T>(Box::new(move |state| {
            match state.as_any_mut().downcast_mut::<T>() {
                Some(typed) => f(typed),
                None => log::error!("mutate: type mismatch for {}", type_name::<T>()),
            }
        }));
    }

    fn queue<T: State>(&self, apply: Box<dyn FnOnce(&mut dyn State) + Send>) {
        let mutation = Mutation {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            apply,
        };
        if self.send.send(mutation).is_err() {
            // The context went away; nothing left to update.
            log::warn!("updater: discarding mutation for {}", type_name::<T>());
        }
    }
}
