/// Where a single keyed fetch currently stands
///
/// `Pending` is the initial state, `Failed` and `Succeeded` are final for the
/// key the fetch was made for.
#[derive(Debug, Clone, Default)]
pub enum FetchState<T, E> {
    #[default]
    Pending,
    Failed(E),
    Succeeded(T),
}

impl<T, E> FetchState<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Moves a pending state to its final state, does nothing otherwise
    ///
    /// Returns whether the transition happened.
    pub fn resolve(&mut self, result: Result<T, E>) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = match result {
            Ok(value) => Self::Succeeded(value),
            Err(err) => Self::Failed(err),
        };
        true
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }
}
