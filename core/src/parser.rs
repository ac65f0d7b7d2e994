//! Option registry, argument parsing, and value lookup.
//!
//! [`CommandLine`] owns the declared options of one utility. Calling
//! [`CommandLine::parse`] scans an argument vector left to right, storing
//! each recognised flag's transformed value and collecting everything else as
//! positional arguments. Help requests and bare interactive invocations are
//! reported as [`ParseOutcome::Stop`] so that the outermost caller decides
//! when to print and exit.

use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::Path;

use tracing::debug;

use crate::error::{CliError, DeclarationError, LookupError, ParseError};
use crate::types::{Action, DeclaredOption, FlagSpec, FromValue, HELP_OPTION, OptionSpec, Value};
use crate::usage;
use crate::validate::validate_option;

/// Where standard input comes from.
///
/// A bare invocation is treated as a help request only when input is
/// interactive; a monitoring scheduler running the utility with redirected
/// or empty stdin proceeds to normal validation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Stdin is a terminal.
    Interactive,
    /// Stdin is piped, redirected, or closed.
    Redirected,
}

impl Input {
    /// Probes the process's stdin.
    pub fn detect() -> Self {
        if std::io::stdin().is_terminal() {
            Input::Interactive
        } else {
            Input::Redirected
        }
    }
}

/// Why parsing stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `-h` / `--help` was given.
    Help,
    /// No arguments with interactive input.
    BareInvocation,
    /// A flag declared with [`OptionSpec::exits_with`] was given.
    Requested,
}

/// Request to print `output` and terminate successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    /// What triggered the stop.
    pub reason: StopReason,
    /// Text to print on stdout.
    pub output: String,
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ParseOutcome {
    /// Values and positional arguments are ready to read.
    Proceed,
    /// The caller should print the stop text and exit with success.
    Stop(Stop),
}

/// Token classification used while scanning.
enum Token<'a> {
    /// `--`: everything after is positional.
    Terminator,
    /// `--name` or `--name=value`.
    Long {
        name: &'a str,
        inline: Option<&'a str>,
    },
    /// `-abc`: one or more clustered short flags.
    Short(&'a str),
    /// Anything that is not flag-shaped, including a lone `-`.
    Positional,
}

fn classify(token: &str) -> Result<Token<'_>, ParseError> {
    if token == "--" {
        return Ok(Token::Terminator);
    }
    if let Some(rest) = token.strip_prefix("--") {
        let (name, inline) = match rest.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (rest, None),
        };
        if name.is_empty() || name.starts_with('-') {
            return Err(ParseError::MalformedOption(token.to_string()));
        }
        return Ok(Token::Long { name, inline });
    }
    match token.strip_prefix('-') {
        Some(cluster) if !cluster.is_empty() => Ok(Token::Short(cluster)),
        _ => Ok(Token::Positional),
    }
}

/// Declared options plus the state of the most recent parse.
///
/// # Examples
///
/// ```
/// use a10_monitoring_core::{CommandLine, Input, OptionSpec, ParseOutcome};
///
/// let mut cli = CommandLine::new("query-a10-api");
/// cli.option(OptionSpec::new("slb", Some("-s"), "--slb HOST[:PORT]", "SLB host"))?;
/// cli.option(OptionSpec::new("metric", Some("-m"), "--metric METRIC", "A10 metric name"))?;
///
/// let outcome = cli.parse(
///     ["-s", "10.0.0.1:80", "-m", "slb.virtual_server.getAll", "port_num=1"],
///     Input::Redirected,
/// )?;
/// assert_eq!(outcome, ParseOutcome::Proceed);
/// assert_eq!(cli.get::<String>("slb")?.as_deref(), Some("10.0.0.1:80"));
/// assert_eq!(cli.positional(), ["port_num=1"]);
/// # Ok::<(), a10_monitoring_core::CliError>(())
/// ```
#[derive(Debug)]
pub struct CommandLine {
    appname: String,
    description: Vec<String>,
    examples: Vec<String>,
    options: Vec<DeclaredOption>,
    values: HashMap<String, Value>,
    positional: Vec<String>,
}

impl CommandLine {
    /// Creates a command line with the built-in `-h` / `--help` option.
    pub fn new(appname: impl Into<String>) -> Self {
        let help_flags = FlagSpec {
            short: Some('h'),
            long: HELP_OPTION.to_string(),
            placeholder: None,
        };
        let help = OptionSpec::new(HELP_OPTION, Some("-h"), "--help", "Display this help text.")
            .declare(help_flags);

        Self {
            appname: appname.into(),
            description: Vec::new(),
            examples: Vec::new(),
            options: vec![help],
            values: HashMap::new(),
            positional: Vec::new(),
        }
    }

    /// Creates a command line named after the running executable.
    pub fn from_env() -> Self {
        Self::new(appname_from_env())
    }

    /// Sets the multi-line application description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = usage::indent_block(description);
        self
    }

    /// Sets the usage examples. `__APPNAME__` is replaced with the program name.
    pub fn with_examples(mut self, examples: &str) -> Self {
        self.examples = usage::indent_block(examples);
        self
    }

    /// Program name shown in usage text.
    pub fn appname(&self) -> &str {
        &self.appname
    }

    /// Registers an option, replacing any earlier option with the same name.
    ///
    /// # Errors
    ///
    /// Returns a [`DeclarationError`] for malformed flags, flags owned by a
    /// different option, or a transform that does not fit the option kind.
    pub fn option(&mut self, spec: OptionSpec) -> Result<&mut Self, DeclarationError> {
        let flags = validate_option(&spec, &self.options)?;
        let declared = spec.declare(flags);
        match self.options.iter().position(|o| o.name == declared.name) {
            Some(index) => self.options[index] = declared,
            None => self.options.push(declared),
        }
        Ok(self)
    }

    /// Declared options in listing order.
    pub fn options(&self) -> &[DeclaredOption] {
        &self.options
    }

    /// Renders the usage text from the current declarations.
    pub fn usage(&self) -> String {
        usage::render(&self.appname, &self.description, &self.examples, &self.options)
    }

    /// Parses the process arguments, probing stdin for interactivity.
    ///
    /// # Errors
    ///
    /// See [`CommandLine::parse`].
    pub fn parse_env(&mut self) -> Result<ParseOutcome, ParseError> {
        let input = Input::detect();
        self.parse(std::env::args().skip(1), input)
    }

    /// Parses an argument vector.
    ///
    /// Any state from a previous parse is discarded first. An empty vector
    /// with [`Input::Interactive`] stops immediately with the usage text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown, ambiguous, or malformed flags,
    /// a missing value, or a value rejected by its transform. The first
    /// error wins, even if `--help` was also given.
    pub fn parse<I, S>(&mut self, argv: I, input: Input) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.clear();
        self.positional.clear();

        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() && input == Input::Interactive {
            debug!(appname = %self.appname, "Bare interactive invocation, showing usage");
            return Ok(self.stop(StopReason::BareInvocation, self.usage()));
        }

        let mut tokens = argv.into_iter();
        while let Some(token) = tokens.next() {
            let stop = match classify(&token)? {
                Token::Terminator => {
                    self.positional.extend(tokens.by_ref());
                    break;
                }
                Token::Positional => {
                    self.positional.push(token);
                    continue;
                }
                Token::Long { name, inline } => {
                    let index = self.resolve_long(name)?;
                    let flag = self.options[index].flags.long_flag();
                    if self.options[index].flags.takes_value() {
                        let raw = match inline {
                            Some(value) => value.to_string(),
                            None => tokens
                                .next()
                                .ok_or_else(|| ParseError::MissingArgument(flag.clone()))?,
                        };
                        self.apply(index, &flag, Some(&raw))?
                    } else if inline.is_some() {
                        return Err(ParseError::NeedlessArgument(token.clone()));
                    } else {
                        self.apply(index, &flag, None)?
                    }
                }
                Token::Short(cluster) => self.apply_cluster(cluster, &mut tokens)?,
            };
            if let Some(stop) = stop {
                return Ok(ParseOutcome::Stop(stop));
            }
        }

        debug!(
            appname = %self.appname,
            values = ?self.values.keys().collect::<Vec<_>>(),
            positional = self.positional.len(),
            "Parsed command line"
        );

        if self.help_requested() {
            return Ok(self.stop(StopReason::Help, self.usage()));
        }
        Ok(ParseOutcome::Proceed)
    }

    /// Returns `true` once `-h` / `--help` has been parsed.
    pub fn help_requested(&self) -> bool {
        self.values.contains_key(HELP_OPTION)
    }

    /// Arguments not consumed as flags or flag values, in order.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Returns the parsed value for `name`, else its default, else `None`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Undeclared`] if `name` was never declared.
    pub fn value(&self, name: &str) -> Result<Option<&Value>, LookupError> {
        let option = self
            .options
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| LookupError::Undeclared(name.to_string()))?;
        Ok(self.values.get(name).or(option.default.as_ref()))
    }

    /// Typed variant of [`CommandLine::value`].
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Undeclared`] for an unknown name or
    /// [`LookupError::TypeMismatch`] if the value has another type.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<Option<T>, LookupError> {
        match self.value(name)? {
            None => Ok(None),
            Some(value) => T::from_value(value).map(Some).ok_or_else(|| {
                LookupError::TypeMismatch {
                    name: name.to_string(),
                    expected: T::EXPECTED,
                    found: value.kind(),
                }
            }),
        }
    }

    /// Reads a boolean flag, treating an unset flag as `false`.
    ///
    /// # Errors
    ///
    /// Same as [`CommandLine::get`].
    pub fn flag(&self, name: &str) -> Result<bool, LookupError> {
        Ok(self.get::<bool>(name)?.unwrap_or(false))
    }

    /// Reads a value that the utility cannot run without.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Validation`] carrying `message` when the option
    /// has neither a parsed value nor a default, or a lookup error.
    pub fn require<T: FromValue>(&self, name: &str, message: &str) -> Result<T, CliError> {
        self.get::<T>(name)?
            .ok_or_else(|| CliError::Validation(message.to_string()))
    }

    fn stop(&self, reason: StopReason, output: String) -> ParseOutcome {
        ParseOutcome::Stop(Stop { reason, output })
    }

    fn find_short(&self, c: char) -> Option<usize> {
        self.options.iter().position(|o| o.flags.short == Some(c))
    }

    /// Resolves a long name, allowing any unambiguous prefix.
    fn resolve_long(&self, name: &str) -> Result<usize, ParseError> {
        if let Some(index) = self.options.iter().position(|o| o.flags.long == name) {
            return Ok(index);
        }

        let candidates: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.flags.long.starts_with(name))
            .map(|(index, _)| index)
            .collect();

        match candidates.as_slice() {
            [index] => Ok(*index),
            [] => Err(ParseError::InvalidOption(format!("--{name}"))),
            _ => Err(ParseError::AmbiguousOption {
                flag: format!("--{name}"),
                candidates: candidates
                    .iter()
                    .map(|&index| self.options[index].flags.long_flag())
                    .collect(),
            }),
        }
    }

    /// Applies a cluster of short flags such as `-v`, `-vq`, or `-s10.0.0.1`.
    fn apply_cluster(
        &mut self,
        cluster: &str,
        tokens: &mut impl Iterator<Item = String>,
    ) -> Result<Option<Stop>, ParseError> {
        for (offset, c) in cluster.char_indices() {
            let flag = format!("-{c}");
            let index = self
                .find_short(c)
                .ok_or_else(|| ParseError::InvalidOption(flag.clone()))?;

            if self.options[index].flags.takes_value() {
                let attached = &cluster[offset + c.len_utf8()..];
                let raw = if attached.is_empty() {
                    tokens
                        .next()
                        .ok_or_else(|| ParseError::MissingArgument(flag.clone()))?
                } else {
                    attached.to_string()
                };
                return self.apply(index, &flag, Some(&raw));
            }

            if let Some(stop) = self.apply(index, &flag, None)? {
                return Ok(Some(stop));
            }
        }
        Ok(None)
    }

    /// Runs an option's action for one occurrence of its flag.
    fn apply(
        &mut self,
        index: usize,
        flag: &str,
        raw: Option<&str>,
    ) -> Result<Option<Stop>, ParseError> {
        let option = &self.options[index];
        let value = match (&option.action, raw) {
            (Action::Exit(text), _) => {
                return Ok(Some(Stop {
                    reason: StopReason::Requested,
                    output: text.clone(),
                }));
            }
            (Action::Set, _) => Value::Bool(true),
            (Action::Compute(action), _) => action(),
            (Action::Convert(None), Some(raw)) => Value::Text(raw.to_string()),
            (Action::Convert(Some(transform)), Some(raw)) => {
                transform(raw).map_err(|reason| ParseError::InvalidArgument {
                    flag: flag.to_string(),
                    value: raw.to_string(),
                    reason,
                })?
            }
            (Action::Convert(_), None) => {
                return Err(ParseError::MissingArgument(flag.to_string()));
            }
        };
        self.values.insert(option.name.clone(), value);
        Ok(None)
    }
}

/// Basename of `argv[0]`, falling back to the package name.
pub fn appname_from_env() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
