use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::{State, StateError};

/// Cloned state values captured when a command is dispatched.
///
/// Commands read their inputs from here instead of borrowing the context,
/// so the context stays free for the driver loop while the command awaits
/// network IO.
#[derive(Default)]
pub struct CommandSnapshot {
    inner: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl CommandSnapshot {
    pub fn new() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }

    pub fn insert_cloned(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.inner.insert(id, value);
    }

    /// Typed access to a snapshotted state.
    ///
    /// # Panics
    /// Panics when the state was never registered or does not snapshot.
    /// Missing registration is a composition-time bug, not a runtime
    /// condition.
    pub fn state<T: State + Clone>(&self) -> T {
        self.try_state::<T>().unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_state<T: State + Clone>(&self) -> Result<T, StateError> {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .cloned()
            .ok_or(StateError::NotSnapshotted {
                type_name: type_name::<T>(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_assign_impl;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Flag {
        on: bool,
    }

    impl State for Flag {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
            Some(Box::new(self.clone()))
        }

        fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
            state_assign_impl(self, new_self);
        }
    }

    #[test]
    fn returns_cloned_state() {
        let mut snap = CommandSnapshot::new();
        snap.insert_cloned(TypeId::of::<Flag>(), Box::new(Flag { on: true }));
        assert_eq!(snap.state::<Flag>(), Flag { on: true });
    }

    #[test]
    fn missing_state_is_an_error() {
        let snap = CommandSnapshot::new();
        assert_eq!(
            snap.try_state::<Flag>(),
            Err(StateError::NotSnapshotted {
                type_name: type_name::<Flag>()
            })
        );
    }
}
