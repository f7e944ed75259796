use std::fmt;

/// Fatal generation error
///
/// Everything in this taxonomy aborts the run; the parser and the merge
/// engine never produce these (malformed field lines degrade to best-effort
/// specs, unmatched merge structure degrades to a warned no-op).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A mandatory config field is absent
    ///
    /// Raised when a unit is asked to compose without a class name, without
    /// any props/events, or without a required sibling-file reference.
    MissingRequiredField {
        /// Human-readable description of the missing field
        what: String,
    },
    /// A referenced sibling file is absent or unusable
    ///
    /// The bloc generator reads the generated state/event files (and the
    /// optional repository file) to recover class names; this is raised when
    /// a file cannot be read or contains no recognizable `class` declaration.
    MissingDependency {
        /// Path of the file that could not be used
        path: String,
        /// Why it could not be used
        reason: String,
    },
    /// A code-block substitution referenced a key with no value
    ///
    /// User `code`/`partcode` blocks may reference `%state`, `%event` and
    /// `%bloc`; any other `%key` placeholder has nothing to pack into it.
    TooManyValues {
        /// The offending placeholder key
        key: String,
    },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::MissingRequiredField { what } => {
                write!(f, "Missing required field: {what}")
            }
            GenError::MissingDependency { path, reason } => {
                write!(f, "Missing dependency '{path}': {reason}")
            }
            GenError::TooManyValues { key } => {
                write!(
                    f,
                    "Too many values: placeholder '%{key}' has no value to pack; \
                    supported keys are %state, %event and %bloc"
                )
            }
        }
    }
}

impl std::error::Error for GenError {}
