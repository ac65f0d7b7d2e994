//! Error types for option declaration, parsing, and lookup.
//!
//! [`ParseError`] and [`CliError::Validation`] are user-facing and should be
//! reported as a one-line message. [`DeclarationError`] and [`LookupError`]
//! indicate a programming mistake in the calling utility.

use thiserror::Error;

/// Invalid option declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// Option name is empty or whitespace-only.
    #[error("option name cannot be empty")]
    EmptyName,
    /// Short flag is not a single dash followed by one character (e.g. `"s"`).
    #[error("invalid short flag format: {0}")]
    InvalidShortFlag(String),
    /// Long spec does not start with `--` followed by a name.
    #[error("invalid long flag format: {0}")]
    InvalidLongFlag(String),
    /// A flag is already owned by an option with a different name.
    #[error("flag {flag} already declared by option '{owner}'")]
    DuplicateFlag {
        /// The clashing flag spelling.
        flag: String,
        /// Name of the option that already owns it.
        owner: String,
    },
    /// A transform was given to an option that takes no value.
    #[error("option '{0}' takes no value but declares a value transform")]
    TransformWithoutValue(String),
    /// A zero-argument action was given to an option that takes a value.
    #[error("option '{0}' takes a value but declares a flag action")]
    ActionWithValue(String),
}

/// Command-line parse failure.
///
/// Messages follow the conventional wording of option parsers so that
/// output reads like `invalid option: --bogus`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Flag-like token that matches no declared option.
    #[error("invalid option: {0}")]
    InvalidOption(String),
    /// Value-taking flag at the end of the argument vector.
    #[error("missing argument: {0}")]
    MissingArgument(String),
    /// Inline value (`--flag=x`) given to a boolean flag.
    #[error("needless argument: {0}")]
    NeedlessArgument(String),
    /// Long prefix matching more than one option.
    #[error("ambiguous option: {flag} ({})", candidates.join(", "))]
    AmbiguousOption {
        /// The abbreviated flag as given.
        flag: String,
        /// Long flags it could expand to.
        candidates: Vec<String>,
    },
    /// Transform rejected the supplied value.
    #[error("invalid argument: {flag} {value} ({reason})")]
    InvalidArgument {
        /// Flag the value was supplied for.
        flag: String,
        /// Raw value as given.
        value: String,
        /// Transform failure message.
        reason: String,
    },
    /// Token with unusable flag syntax (e.g. `---x` or `--=v`).
    #[error("malformed option: {0}")]
    MalformedOption(String),
}

/// Option value lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The name was never declared.
    #[error("undeclared option: {0}")]
    Undeclared(String),
    /// The stored value has a different type than requested.
    #[error("option '{name}' holds a {found} value, not {expected}")]
    TypeMismatch {
        /// Option name.
        name: String,
        /// Requested type.
        expected: &'static str,
        /// Stored value type.
        found: &'static str,
    },
}

/// Any failure raised while building, parsing, or reading a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// Invalid option declaration.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
    /// Invalid command-line input.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Caller-level validation after a successful parse.
    #[error("{0}")]
    Validation(String),
    /// Lookup of an undeclared or mistyped option.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl CliError {
    /// Returns `true` for errors caused by user input rather than a bug.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CliError::Parse(_) | CliError::Validation(_))
    }
}
