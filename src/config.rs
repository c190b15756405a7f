//! Director configuration.

/// What happens when a show request arrives while a transition is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// The newer request wins. The running transition still plays out, but
    /// its completion no longer switches scenes.
    #[default]
    Supersede,
    /// The newer request fails with
    /// [`DirectorError::TransitionInFlight`](crate::DirectorError::TransitionInFlight).
    Reject,
    /// Transitions run independently and every completion switches scenes,
    /// in the order they complete.
    Overlap,
}

/// Settings for a [`SceneDirector`](crate::SceneDirector).
#[derive(Clone, Debug, Default)]
pub struct DirectorConfig {
    pub transition_policy: TransitionPolicy,
    /// Title applied to the surface when the director is created.
    pub title: Option<String>,
}

impl DirectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.transition_policy = policy;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
