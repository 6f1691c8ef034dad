//! Switch preference backend contract

use crate::error::PanelError;

/// Default and current value shared by every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendState {
    default_value: bool,
    value: bool,
}

impl BackendState {
    /// Start at the default value
    pub fn new(default_value: bool) -> Self {
        Self {
            default_value,
            value: default_value,
        }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn default_value(&self) -> bool {
        self.default_value
    }

    /// Record a value that was applied successfully
    pub fn applied(&mut self, value: bool) {
        self.value = value;
    }
}

/// A boolean setting shown as a switch in the settings panel
///
/// Callers check `is_valid` before showing or using a switch; `set_value` is
/// still safe to call on an invalid one.
pub trait SwitchBackend {
    /// Current value
    fn value(&self) -> bool;

    /// Value the switch starts with and resets to
    fn default_value(&self) -> bool;

    /// Apply a new value
    fn set_value(&mut self, value: bool) -> Result<(), PanelError>;

    /// Whether this switch applies to the current device/configuration
    fn is_valid(&self) -> bool;

    /// Re-apply the default value through `set_value`
    fn reset_to_default(&mut self) -> Result<(), PanelError> {
        let default_value = self.default_value();
        self.set_value(default_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        state: BackendState,
        calls: Vec<bool>,
    }

    impl SwitchBackend for Counting {
        fn value(&self) -> bool {
            self.state.value()
        }

        fn default_value(&self) -> bool {
            self.state.default_value()
        }

        fn set_value(&mut self, value: bool) -> Result<(), PanelError> {
            self.calls.push(value);
            self.state.applied(value);
            Ok(())
        }

        fn is_valid(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_state_starts_at_default() {
        let state = BackendState::new(true);
        assert!(state.value());
        assert!(state.default_value());
    }

    #[test]
    fn test_reset_goes_through_set_value() {
        for default in [true, false] {
            let mut backend = Counting {
                state: BackendState::new(default),
                calls: Vec::new(),
            };
            backend.set_value(!default).unwrap();
            assert_eq!(backend.value(), !default);

            backend.reset_to_default().unwrap();
            assert_eq!(backend.value(), backend.default_value());
            assert_eq!(backend.calls, vec![!default, default]);
        }
    }
}
