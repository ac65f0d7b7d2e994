//! Option declaration types.
//!
//! This module defines the data model behind a [`CommandLine`](crate::CommandLine):
//! the parsed [`Value`] stored for each option, the [`FlagSpec`] describing how
//! an option is spelled on the command line, and the [`OptionSpec`] builder
//! used to declare options.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::DeclarationError;

/// Name of the built-in help option.
pub const HELP_OPTION: &str = "help";

/// A parsed option value.
///
/// Values are produced by an option's transform (or the implicit "store
/// true" behaviour of boolean flags) and by declared defaults.
///
/// # Examples
///
/// ```
/// use a10_monitoring_core::Value;
///
/// assert_eq!(Value::from(80.0).to_string(), "80");
/// assert_eq!(Value::from(0.5).to_string(), "0.5");
/// assert_eq!(Value::from("10.0.0.1:80").to_string(), "10.0.0.1:80");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean flag state.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Raw or transformed text.
    Text(String),
}

impl Value {
    /// Short name of the variant, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Typed extraction from a [`Value`].
///
/// Implemented for the types callers read options as. `f64` also accepts
/// integer values so that an integer default can back a float option.
pub trait FromValue: Sized {
    /// Name of the expected type, used in type mismatch errors.
    const EXPECTED: &'static str;

    /// Converts the value, or returns `None` if the variant does not fit.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(x) => Some(*x),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

static SHORT_FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-([a-zA-Z0-9])$").expect("static regex must compile"));
static LONG_SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--([a-zA-Z0-9][-_a-zA-Z0-9]*)(?:[\s=]+(\S.*?))?\s*$")
        .expect("static regex must compile")
});

/// How an option is spelled on the command line.
///
/// Parsed from a short flag such as `-s` and a long spec such as
/// `--slb HOST[:PORT]`. A placeholder after the long name marks the option
/// as taking a value.
///
/// # Examples
///
/// ```
/// use a10_monitoring_core::FlagSpec;
///
/// let spec = FlagSpec::parse(Some("-s"), "--slb HOST[:PORT]").unwrap();
/// assert_eq!(spec.short, Some('s'));
/// assert_eq!(spec.long, "slb");
/// assert!(spec.takes_value());
/// assert_eq!(spec.summary(), "-s, --slb HOST[:PORT]");
///
/// let flag = FlagSpec::parse(None, "--version").unwrap();
/// assert!(!flag.takes_value());
/// assert_eq!(flag.summary(), "    --version");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// Short flag character (`s` for `-s`).
    pub short: Option<char>,
    /// Long flag name without dashes (`slb` for `--slb`).
    pub long: String,
    /// Value placeholder (`HOST[:PORT]`), present for value-taking options.
    pub placeholder: Option<String>,
}

impl FlagSpec {
    /// Parses a short flag and long spec.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::InvalidShortFlag`] or
    /// [`DeclarationError::InvalidLongFlag`] for malformed input.
    pub fn parse(short: Option<&str>, long: &str) -> Result<Self, DeclarationError> {
        let short = match short {
            Some(raw) => {
                let caps = SHORT_FLAG_RE
                    .captures(raw)
                    .ok_or_else(|| DeclarationError::InvalidShortFlag(raw.to_string()))?;
                caps[1].chars().next()
            }
            None => None,
        };

        let caps = LONG_SPEC_RE
            .captures(long.trim())
            .ok_or_else(|| DeclarationError::InvalidLongFlag(long.to_string()))?;

        Ok(Self {
            short,
            long: caps[1].to_string(),
            placeholder: caps.get(2).map(|m| m.as_str().to_string()),
        })
    }

    /// Returns `true` if the option consumes a value.
    pub fn takes_value(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Returns the `-x` spelling, if any.
    pub fn short_flag(&self) -> Option<String> {
        self.short.map(|c| format!("-{c}"))
    }

    /// Returns the `--name` spelling.
    pub fn long_flag(&self) -> String {
        format!("--{}", self.long)
    }

    /// Returns the long spec as shown in usage text (`--slb HOST[:PORT]`).
    pub fn long_spec(&self) -> String {
        match &self.placeholder {
            Some(placeholder) => format!("--{} {placeholder}", self.long),
            None => self.long_flag(),
        }
    }

    /// Returns the flag column text used in usage output.
    ///
    /// Options without a short flag are padded so that long flags line up.
    pub fn summary(&self) -> String {
        match self.short_flag() {
            Some(short) => format!("{short}, {}", self.long_spec()),
            None => format!("    {}", self.long_spec()),
        }
    }

    /// Width this spec needs in the flag column, including the margin.
    pub fn column_width(&self) -> usize {
        let short = if self.short.is_some() { 4 } else { 0 };
        2 + short + self.long_spec().len()
    }
}

/// Converts a raw command-line value into a [`Value`].
pub(crate) type Transform = Box<dyn Fn(&str) -> Result<Value, String>>;

/// What happens when an option's flag is seen.
pub(crate) enum Action {
    /// Boolean flag without a transform: store `true`.
    Set,
    /// Boolean flag with a zero-argument transform.
    Compute(Box<dyn Fn() -> Value>),
    /// Value-taking option: run the transform over the raw value.
    Convert(Option<Transform>),
    /// Stop parsing and ask the caller to print this text and exit.
    Exit(String),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Set => f.write_str("Set"),
            Action::Compute(_) => f.write_str("Compute(..)"),
            Action::Convert(Some(_)) => f.write_str("Convert(..)"),
            Action::Convert(None) => f.write_str("Convert(raw)"),
            Action::Exit(text) => f.debug_tuple("Exit").field(text).finish(),
        }
    }
}

/// Declaration of a single command-line option.
///
/// Built with [`OptionSpec::new`] and the `with_*` builder methods, then
/// registered through [`CommandLine::option`](crate::CommandLine::option),
/// which validates the flag syntax.
///
/// # Examples
///
/// ```
/// use a10_monitoring_core::OptionSpec;
///
/// let warning = OptionSpec::new(
///     "warning_threshold",
///     Some("-w"),
///     "--warning PCT",
///     "Warning threshold, as percent (0-100)",
/// )
/// .with_default(80.0)
/// .with_transform(|v| v.parse::<f64>());
///
/// assert_eq!(warning.name(), "warning_threshold");
/// assert_eq!(
///     warning.description_lines(),
///     vec!["Warning threshold, as percent (0-100) (default: 80)"]
/// );
/// ```
pub struct OptionSpec {
    pub(crate) name: String,
    pub(crate) short: Option<String>,
    pub(crate) long: String,
    pub(crate) description: String,
    pub(crate) default: Option<Value>,
    transform: Option<Transform>,
    action: Option<Box<dyn Fn() -> Value>>,
    exit_text: Option<String>,
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("description", &self.description)
            .field("default", &self.default)
            .field("transform", &self.transform.is_some())
            .field("action", &self.action.is_some())
            .field("exit_text", &self.exit_text)
            .finish()
    }
}

impl OptionSpec {
    /// Creates a declaration. `long` may embed a value placeholder.
    pub fn new(name: &str, short: Option<&str>, long: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            short: short.map(String::from),
            long: long.to_string(),
            description: description.to_string(),
            default: None,
            transform: None,
            action: None,
            exit_text: None,
        }
    }

    /// Sets the value reported when the option is never supplied.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the transform applied to each supplied value.
    ///
    /// Only valid for options whose long spec has a placeholder.
    pub fn with_transform<F, T, E>(mut self, transform: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + 'static,
        T: Into<Value>,
        E: fmt::Display,
    {
        self.transform = Some(Box::new(move |raw| {
            transform(raw).map(Into::into).map_err(|e| e.to_string())
        }));
        self
    }

    /// Sets the zero-argument transform run each time a boolean flag is seen.
    pub fn with_action<F, T>(mut self, action: F) -> Self
    where
        F: Fn() -> T + 'static,
        T: Into<Value>,
    {
        self.action = Some(Box::new(move || action().into()));
        self
    }

    /// Makes a boolean flag stop parsing and request that `text` be printed.
    pub fn exits_with(mut self, text: impl Into<String>) -> Self {
        self.exit_text = Some(text.into());
        self
    }

    /// Logical name, used as the lookup key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Help text lines, with the default appended to the last line.
    pub fn description_lines(&self) -> Vec<String> {
        let mut description = self.description.clone();
        if let Some(default) = &self.default {
            description.push_str(&format!(" (default: {default})"));
        }
        description.split('\n').map(str::to_string).collect()
    }

    pub(crate) fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    pub(crate) fn has_action(&self) -> bool {
        self.action.is_some() || self.exit_text.is_some()
    }

    /// Resolves the builder state into the option stored by the parser.
    pub(crate) fn declare(self, flags: FlagSpec) -> DeclaredOption {
        let description = self.description_lines();
        let action = if flags.takes_value() {
            Action::Convert(self.transform)
        } else if let Some(text) = self.exit_text {
            Action::Exit(text)
        } else if let Some(action) = self.action {
            Action::Compute(action)
        } else {
            Action::Set
        };

        DeclaredOption {
            name: self.name,
            flags,
            description,
            default: self.default,
            action,
        }
    }
}

/// A validated option held by a [`CommandLine`](crate::CommandLine).
#[derive(Debug)]
pub struct DeclaredOption {
    pub(crate) name: String,
    pub(crate) flags: FlagSpec,
    pub(crate) description: Vec<String>,
    pub(crate) default: Option<Value>,
    pub(crate) action: Action,
}

impl DeclaredOption {
    /// Logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parsed flag spellings.
    pub fn flags(&self) -> &FlagSpec {
        &self.flags
    }

    /// Help text lines.
    pub fn description(&self) -> &[String] {
        &self.description
    }

    /// Declared default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns `true` if `flag` is this option's short or long spelling.
    pub fn matches(&self, flag: &str) -> bool {
        self.flags.short_flag().as_deref() == Some(flag) || self.flags.long_flag() == flag
    }
}
