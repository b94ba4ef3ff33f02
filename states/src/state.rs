use std::any::Any;

/// A unit of observable session state.
///
/// States are stored in a [`StateCtx`](crate::StateCtx) keyed by their
/// concrete type. A state that serves as a command input must return a
/// cloned copy from [`snapshot`](State::snapshot); states that are only
/// ever read on the owning context may leave the default `None`.
pub trait State: Any + Send {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Cloned copy handed to commands at dispatch time.
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }

    /// Replace this state with a new value of the same concrete type.
    fn assign_box(&mut self, new_self: Box<dyn Any + Send>);
}

/// Helper for `State::assign_box` implementations.
pub fn state_assign_impl<T: State + Sized>(slot: &mut T, new_self: Box<dyn Any + Send>) {
    match new_self.downcast::<T>() {
        Ok(value) => *slot = *value,
        Err(_) => log::error!(
            "assign_box: type mismatch for {}",
            std::any::type_name::<T>()
        ),
    }
}
