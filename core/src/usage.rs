//! Usage text rendering.
//!
//! Produces the `NAME` / `DESCRIPTION` / `EXAMPLES` / `OPTIONS` block shown
//! for `--help` and for a bare interactive invocation.

use crate::types::DeclaredOption;

/// Indentation applied to every section body line.
pub const INDENT: &str = "    ";

/// Minimum width of the flag column.
pub const MIN_FLAG_WIDTH: usize = 10;

/// Placeholder replaced with the program name in example text.
pub const APPNAME_PLACEHOLDER: &str = "__APPNAME__";

/// Splits a text block into indented lines.
///
/// The block is trimmed, then each line is right-trimmed and indented.
/// Blank lines stay blank.
pub fn indent_block(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    text.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect()
}

/// Width of the flag column for a set of options.
pub fn flag_width(options: &[DeclaredOption]) -> usize {
    options
        .iter()
        .map(|option| option.flags().column_width())
        .fold(MIN_FLAG_WIDTH, usize::max)
}

/// Renders the option listing, one or more lines per option.
pub fn render_options(options: &[DeclaredOption]) -> Vec<String> {
    let width = flag_width(options);
    let mut lines = Vec::new();

    for option in options {
        let summary = option.flags().summary();
        let mut description = option.description().iter();
        let first = description.next().map(String::as_str).unwrap_or_default();
        lines.push(column_line(&summary, first, width));
        for rest in description {
            lines.push(column_line("", rest, width));
        }
    }

    lines
}

fn column_line(left: &str, right: &str, width: usize) -> String {
    let line = if right.trim().is_empty() {
        format!("{INDENT}{left}")
    } else {
        format!("{INDENT}{left:<width$} {right}")
    };
    line.trim_end().to_string()
}

/// Renders the full usage text.
///
/// `description` and `examples` are the already indented lines produced by
/// [`indent_block`]; their sections are omitted when empty.
pub fn render(
    appname: &str,
    description: &[String],
    examples: &[String],
    options: &[DeclaredOption],
) -> String {
    let mut out = String::new();
    out.push_str("NAME\n");
    out.push_str(&format!("{INDENT}{appname}\n\n"));

    if !description.is_empty() {
        out.push_str("DESCRIPTION\n");
        for line in description {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    if !examples.is_empty() {
        out.push_str("EXAMPLES\n");
        for line in examples {
            out.push_str(&line.replace(APPNAME_PLACEHOLDER, appname));
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("OPTIONS\n");
    for line in render_options(options) {
        out.push_str(&line);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FlagSpec, OptionSpec};

    fn option(name: &str, short: Option<&str>, long: &str, desc: &str) -> DeclaredOption {
        let flags = FlagSpec::parse(short, long).unwrap();
        OptionSpec::new(name, short, long, desc).declare(flags)
    }

    #[test]
    fn test_indent_block_trims_and_keeps_blank_lines() {
        let lines = indent_block("\n  Check memory.  \n\nCRITICAL if high\n");
        assert_eq!(lines, vec!["    Check memory.", "", "    CRITICAL if high"]);
    }

    #[test]
    fn test_indent_block_empty() {
        assert!(indent_block("  \n ").is_empty());
    }

    #[test]
    fn test_flag_width_has_minimum() {
        let options = vec![option("v", Some("-v"), "--v", "")];
        assert_eq!(flag_width(&options), MIN_FLAG_WIDTH);
    }

    #[test]
    fn test_render_options_alignment() {
        let options = vec![
            option("help", Some("-h"), "--help", "Display this help text."),
            option("slb", Some("-s"), "--slb HOST[:PORT]", "SLB host and port."),
            option("version", None, "--version", "Print the version."),
        ];
        let lines = render_options(&options);

        // 2 + 4 + len("--slb HOST[:PORT]") = 23
        assert_eq!(
            lines,
            vec![
                format!("    {:<23} Display this help text.", "-h, --help"),
                format!("    {:<23} SLB host and port.", "-s, --slb HOST[:PORT]"),
                format!("    {:<23} Print the version.", "    --version"),
            ]
        );
    }

    #[test]
    fn test_render_multiline_description() {
        let options = vec![option("metric", Some("-m"), "--metric M", "First line\nSecond line")];
        let lines = render_options(&options);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("First line"));
        assert_eq!(lines[1], format!("    {:<16} Second line", ""));
    }

    #[test]
    fn test_render_sections_in_order() {
        let options = vec![option("help", Some("-h"), "--help", "Display this help text.")];
        let text = render(
            "tool",
            &indent_block("Does things."),
            &indent_block("__APPNAME__ -h"),
            &options,
        );

        let name = text.find("NAME\n    tool\n").unwrap();
        let desc = text.find("DESCRIPTION\n    Does things.\n").unwrap();
        let examples = text.find("EXAMPLES\n    tool -h\n").unwrap();
        let opts = text.find("OPTIONS\n").unwrap();
        assert!(name < desc && desc < examples && examples < opts);
    }

    #[test]
    fn test_render_omits_empty_sections() {
        let text = render("tool", &[], &[], &[]);
        assert_eq!(text, "NAME\n    tool\n\nOPTIONS\n");
    }
}
