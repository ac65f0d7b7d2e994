//! Option declaration validation.
//!
//! Validates an [`OptionSpec`] against the options already registered on a
//! command line, catching malformed flag syntax, clashing flags, and
//! transforms attached to the wrong kind of option before any argument is
//! parsed.
//!
//! # Examples
//!
//! ```
//! use a10_monitoring_core::{DeclarationError, OptionSpec, validate_option};
//!
//! let spec = OptionSpec::new("slb", Some("-s"), "--slb HOST[:PORT]", "SLB host");
//! let flags = validate_option(&spec, &[]).unwrap();
//! assert!(flags.takes_value());
//!
//! // Invalid: short flag missing leading dash
//! let bad = OptionSpec::new("slb", Some("s"), "--slb HOST", "SLB host");
//! assert!(matches!(
//!     validate_option(&bad, &[]),
//!     Err(DeclarationError::InvalidShortFlag(_))
//! ));
//! ```

use crate::error::DeclarationError;
use crate::types::{DeclaredOption, FlagSpec, OptionSpec};

/// Validates a declaration and returns its parsed flag spellings.
///
/// Options sharing `spec`'s name are skipped when checking for clashing
/// flags, since redeclaring a name replaces the earlier option.
///
/// # Errors
///
/// Returns the first [`DeclarationError`] found.
pub fn validate_option(
    spec: &OptionSpec,
    declared: &[DeclaredOption],
) -> Result<FlagSpec, DeclarationError> {
    if spec.name.trim().is_empty() {
        return Err(DeclarationError::EmptyName);
    }

    let flags = FlagSpec::parse(spec.short.as_deref(), &spec.long)?;

    if flags.takes_value() && spec.has_action() {
        return Err(DeclarationError::ActionWithValue(spec.name.clone()));
    }
    if !flags.takes_value() && spec.has_transform() {
        return Err(DeclarationError::TransformWithoutValue(spec.name.clone()));
    }

    let spellings = flags.short_flag().into_iter().chain([flags.long_flag()]);
    for flag in spellings {
        if let Some(owner) = declared
            .iter()
            .find(|option| option.name != spec.name && option.matches(&flag))
        {
            return Err(DeclarationError::DuplicateFlag {
                flag,
                owner: owner.name.clone(),
            });
        }
    }

    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(name: &str, short: Option<&str>, long: &str) -> DeclaredOption {
        let spec = OptionSpec::new(name, short, long, "");
        let flags = FlagSpec::parse(short, long).unwrap();
        spec.declare(flags)
    }

    #[test]
    fn test_valid_boolean_flag() {
        let spec = OptionSpec::new("verbose", Some("-v"), "--verbose", "Verbose output");
        let flags = validate_option(&spec, &[]).unwrap();

        assert!(!flags.takes_value());
        assert_eq!(flags.short, Some('v'));
    }

    #[test]
    fn test_empty_name() {
        let spec = OptionSpec::new("  ", Some("-v"), "--verbose", "");
        assert_eq!(validate_option(&spec, &[]), Err(DeclarationError::EmptyName));
    }

    #[test]
    fn test_duplicate_flag_across_names() {
        let existing = vec![declared("help", Some("-h"), "--help")];
        let spec = OptionSpec::new("host", Some("-h"), "--host HOST", "");

        assert_eq!(
            validate_option(&spec, &existing),
            Err(DeclarationError::DuplicateFlag {
                flag: "-h".into(),
                owner: "help".into(),
            })
        );
    }

    #[test]
    fn test_redeclaring_same_name_is_allowed() {
        let existing = vec![declared("slb", Some("-s"), "--slb HOST")];
        let spec = OptionSpec::new("slb", Some("-s"), "--slb HOST[:PORT]", "");

        assert!(validate_option(&spec, &existing).is_ok());
    }

    #[test]
    fn test_transform_on_boolean_flag() {
        let spec = OptionSpec::new("verbose", Some("-v"), "--verbose", "")
            .with_transform(|v| Ok::<_, String>(v.to_string()));

        assert_eq!(
            validate_option(&spec, &[]),
            Err(DeclarationError::TransformWithoutValue("verbose".into()))
        );
    }

    #[test]
    fn test_action_on_value_option() {
        let spec = OptionSpec::new("slb", Some("-s"), "--slb HOST", "").exits_with("nope");

        assert_eq!(
            validate_option(&spec, &[]),
            Err(DeclarationError::ActionWithValue("slb".into()))
        );
    }
}
