//! Configuration errors
//!
//! The tick path never fails: numeric problems are clamped in place and stale
//! bodies are skipped. Everything that can go wrong is caught while the table is
//! being built from its configuration.

use std::fmt;

/// Error raised while loading or validating a table configuration
#[derive(Debug)]
pub enum ConfigError {
    /// An input action name that no [`crate::InputAction`] matches
    UnknownAction {
        /// The name as written in the configuration
        name: String,
    },

    /// A known action bound to a body that cannot use it
    ActionNotAllowed {
        name: String,
        /// What the action was bound to
        role: &'static str,
    },

    /// A numeric value that is non-finite or outside its allowed range
    OutOfRange {
        /// Field name (for logging)
        field: &'static str,
        /// The rejected value
        value: f32,
        /// Human-readable description of the allowed range
        expected: &'static str,
    },

    /// Two bodies on the table share an id
    DuplicateBody { id: u32 },

    /// The configuration text is not valid JSON for a table
    Parse(serde_json::Error),

    /// The configuration file could not be read
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownAction { name } => {
                write!(f, "unknown input action '{name}'")
            }
            ConfigError::ActionNotAllowed { name, role } => {
                write!(f, "input action '{name}' cannot drive a {role}")
            }
            ConfigError::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "{field} = {value} is out of range (expected {expected})"),
            ConfigError::DuplicateBody { id } => write!(f, "body id {id} is used more than once"),
            ConfigError::Parse(e) => write!(f, "invalid table config: {e}"),
            ConfigError::Io(e) => write!(f, "cannot read table config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field() {
        let err = ConfigError::OutOfRange {
            field: "max_ball_speed",
            value: -1.0,
            expected: "> 0",
        };
        let text = err.to_string();
        assert!(text.contains("max_ball_speed"));
        assert!(text.contains("-1"));
    }

    #[test]
    fn test_display_names_misbound_action() {
        let err = ConfigError::ActionNotAllowed {
            name: "launch_ball".into(),
            role: "flipper",
        };
        assert_eq!(err.to_string(), "input action 'launch_ball' cannot drive a flipper");
    }

    #[test]
    fn test_parse_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::from(json_err);
        assert!(std::error::Error::source(&err).is_some());
    }
}
