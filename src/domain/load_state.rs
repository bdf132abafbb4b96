use crate::errors::LoadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoading { end_of_pagination_reached: bool },
    Loading,
    Error(LoadError),
}

impl LoadState {
    pub fn idle() -> Self {
        LoadState::NotLoading {
            end_of_pagination_reached: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadState::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn end_reached(&self) -> bool {
        matches!(
            self,
            LoadState::NotLoading {
                end_of_pagination_reached: true
            }
        )
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Refresh,
    Prepend,
    Append,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStates {
    pub refresh: LoadState,
    pub prepend: LoadState,
    pub append: LoadState,
}

impl LoadStates {
    pub fn get(&self, direction: Direction) -> &LoadState {
        match direction {
            Direction::Refresh => &self.refresh,
            Direction::Prepend => &self.prepend,
            Direction::Append => &self.append,
        }
    }

    pub fn set(&mut self, direction: Direction, state: LoadState) {
        match direction {
            Direction::Refresh => self.refresh = state,
            Direction::Prepend => self.prepend = state,
            Direction::Append => self.append = state,
        }
    }

    /// The list may be shown only once the refresh has settled without error.
    pub fn is_renderable(&self) -> bool {
        !self.refresh.is_loading() && self.refresh.error().is_none()
    }

    pub fn first_error(&self) -> Option<&LoadError> {
        self.refresh
            .error()
            .or_else(|| self.prepend.error())
            .or_else(|| self.append.error())
    }
}

/// Engine state as seen by a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading(Direction),
    Ready,
    Error(Direction),
    Exhausted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn load_error() -> LoadError {
        LoadError {
            kind: ErrorKind::Connectivity,
            message: "refused".to_string(),
        }
    }

    #[test]
    fn test_renderable_only_after_refresh_settles() {
        let mut states = LoadStates::default();
        assert!(states.is_renderable());

        states.refresh = LoadState::Loading;
        assert!(!states.is_renderable());

        states.refresh = LoadState::Error(load_error());
        assert!(!states.is_renderable());

        states.refresh = LoadState::idle();
        states.append = LoadState::Error(load_error());
        assert!(states.is_renderable());
    }

    #[test]
    fn test_first_error_prefers_refresh() {
        let mut states = LoadStates::default();
        assert!(states.first_error().is_none());

        let append_error = LoadError {
            kind: ErrorKind::Api,
            message: "append".to_string(),
        };
        states.append = LoadState::Error(append_error.clone());
        assert_eq!(states.first_error(), Some(&append_error));

        states.refresh = LoadState::Error(load_error());
        assert_eq!(states.first_error(), Some(&load_error()));
    }
}
