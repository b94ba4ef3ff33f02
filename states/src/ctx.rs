use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::updater::Mutation;
use crate::{Command, CommandSnapshot, State, StateError, StateEvent, Updater};

/// Owner of all observable session state.
///
/// One instance per logical session. Mutations are applied on the owning
/// context only, either directly via [`update`](Self::update) or queued
/// by commands and drained via [`sync`](Self::sync), and every applied
/// mutation is announced to subscribers before the next operation reads
/// shared state.
pub struct StateCtx {
    states: HashMap<TypeId, Box<dyn State>>,
    send: flume::Sender<Mutation>,
    recv: flume::Receiver<Mutation>,
    subscribers: Vec<flume::Sender<StateEvent>>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            states: HashMap::new(),
            send,
            recv,
            subscribers: Vec::new(),
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        self.states.insert(TypeId::of::<T>(), Box::new(state));
    }

    /// Typed read access.
    ///
    /// # Panics
    /// Panics when the state was never registered; registration is a
    /// composition-time contract.
    pub fn state_ref<T: State>(&self) -> &T {
        self.try_state_ref::<T>().unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_state_ref<T: State>(&self) -> Result<&T, StateError> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<T>())
            .ok_or(StateError::NotRegistered {
                type_name: type_name::<T>(),
            })
    }

    /// Mutate a state in place and notify subscribers.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        let state = self
            .states
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<T>())
            .unwrap_or_else(|| panic!("state not registered: {}", type_name::<T>()));
        f(state);
        self.notify(type_name::<T>());
    }

    /// Snapshot of all snapshot-capable states, for command inputs.
    pub fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, state) in &self.states {
            if let Some(cloned) = state.snapshot() {
                snap.insert_cloned(*id, cloned);
            }
        }
        snap
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    /// Capture a snapshot and hand back the command future for the driver
    /// to await. Results arrive through the updater and are applied on
    /// the next [`sync`](Self::sync).
    pub fn dispatch(&self, command: &dyn Command) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        command.run(self.snapshot(), self.updater())
    }

    /// Apply queued mutations in arrival order, announcing each one.
    /// Returns the number applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(mutation) = self.recv.try_recv() {
            match self.states.get_mut(&mutation.type_id) {
                Some(state) => {
                    (mutation.apply)(&mut **state);
                    applied += 1;
                    self.notify(mutation.type_name);
                }
                None => log::warn!("sync: mutation for unregistered state {}", mutation.type_name),
            }
        }
        applied
    }

    /// Subscribe to change notifications. Dropped receivers are pruned on
    /// the next notification.
    pub fn subscribe(&mut self) -> flume::Receiver<StateEvent> {
        let (send, recv) = flume::unbounded();
        self.subscribers.push(send);
        recv
    }

    fn notify(&mut self, type_name: &'static str) {
        self.subscribers
            .retain(|s| s.send(StateEvent { type_name }).is_ok());
    }
}
