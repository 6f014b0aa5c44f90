//! Codec for the `features.auto.tfvars` file.
//!
//! The file is line-oriented Terraform variable syntax:
//!
//! ```text
//! enable_vpc = false
//! instance_count = 2
//! os_type = "ubuntu"
//! ```
//!
//! Parsing looks for each schema key independently with its own anchored
//! regex, starting from defaults. Comments, unrelated variables, and
//! reordering are tolerated; a malformed line for a key leaves that key at
//! its default. There is no whole-file validation.

use flagpanel_domain::{FieldKind, FieldSpec, FlagSet, FlagValue, schema};
use regex::Regex;
use std::num::IntErrorKind;
use tracing::debug;

/// Header written at the top of every generated file.
pub const HEADER: &[&str] = &[
    "##############################################################################",
    "# Feature toggles - managed by the flag-panel control panel",
    "#",
    "# Edits made here by hand are kept only until the next save from the panel.",
    "##############################################################################",
];

/// Compiled per-field patterns plus the renderer.
pub struct TfvarsCodec {
    patterns: Vec<(&'static FieldSpec, Regex)>,
}

impl TfvarsCodec {
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = schema()
            .iter()
            .map(|field| field_pattern(field).map(|re| (field, re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Parse file content into a full flag set over defaults.
    pub fn parse(&self, content: &str) -> FlagSet {
        let mut flags = FlagSet::defaults();

        for (field, pattern) in &self.patterns {
            let Some(raw) = pattern.captures(content).and_then(|c| c.get(1)) else {
                debug!("{} not set in file, keeping default", field.key);
                continue;
            };

            let Some(value) = parse_literal(field, raw.as_str()) else {
                debug!("{} has unparsable value {:?}, keeping default", field.key, raw.as_str());
                continue;
            };

            flags.set_field(field, value);
        }

        flags
    }

    /// Render a flag set as file content.
    ///
    /// Every schema key is written in schema order after [`HEADER`] and a
    /// blank line, each preceded by its description as a comment. The
    /// output ends with a newline.
    pub fn render(&self, flags: &FlagSet) -> String {
        let mut lines: Vec<String> = HEADER.iter().map(|l| l.to_string()).collect();
        lines.push(String::new());

        for (field, value) in flags.iter() {
            lines.push(format!("# {}", field.description));
            lines.push(format!("{} = {}", field.key, value));
        }

        lines.push(String::new());
        lines.join("\n")
    }
}

fn field_pattern(field: &FieldSpec) -> Result<Regex, regex::Error> {
    let value = match field.kind {
        FieldKind::Toggle { .. } => r"(true|false)\b",
        FieldKind::Count { .. } => r"(-?\d+)\b",
        FieldKind::Choice { .. } => r#""([^"\n]*)""#,
    };
    let pattern = format!(r"(?m)^[ \t]*{}[ \t]*=[ \t]*{}", regex::escape(field.key), value);
    Regex::new(&pattern)
}

fn parse_literal(field: &FieldSpec, raw: &str) -> Option<FlagValue> {
    match field.kind {
        FieldKind::Toggle { .. } => Some(FlagValue::Toggle(raw == "true")),
        FieldKind::Count { .. } => parse_count(raw).map(FlagValue::Count),
        FieldKind::Choice { .. } => Some(FlagValue::Choice(raw.to_string())),
    }
}

/// Integer literal, saturating on overflow so normalization can clamp it.
fn parse_count(raw: &str) -> Option<i64> {
    match raw.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_yields_defaults() {
        let codec = TfvarsCodec::new().unwrap();
        assert_eq!(codec.parse(""), FlagSet::defaults());
    }

    #[test]
    fn test_partial_file_with_noise() {
        let content = r#"
# some comment
region = "eu-west-1"
enable_vpc = true
   instance_count   =   3
not a directive at all
enable_dns=false
"#;
        let flags = TfvarsCodec::new().unwrap().parse(content);

        assert_eq!(flags.toggle("enable_vpc"), Some(true));
        assert_eq!(flags.toggle("enable_dns"), Some(false));
        assert_eq!(flags.count("instance_count"), Some(3));

        let defaults = FlagSet::defaults();
        assert_eq!(flags.toggle("enable_alb"), defaults.toggle("enable_alb"));
        assert_eq!(flags.choice("os_type"), defaults.choice("os_type"));
    }

    #[test]
    fn test_malformed_lines_keep_defaults() {
        let content = "enable_vpc = maybe\ninstance_count = many\nos_type = ubuntu\n";
        assert_eq!(TfvarsCodec::new().unwrap().parse(content), FlagSet::defaults());
    }

    #[test]
    fn test_commented_out_directive_is_ignored() {
        let content = "# enable_vpc = true\n";
        let flags = TfvarsCodec::new().unwrap().parse(content);
        assert_eq!(flags.toggle("enable_vpc"), Some(false));
    }

    #[test]
    fn test_key_prefix_does_not_match_longer_key() {
        let content = "enable_stack_extras = false\n";
        let flags = TfvarsCodec::new().unwrap().parse(content);
        assert_eq!(flags.toggle("enable_stack"), Some(true));
    }

    #[test]
    fn test_out_of_domain_values_are_normalized() {
        let content = "instance_count = 99\nos_type = \"Debian\"\n";
        let flags = TfvarsCodec::new().unwrap().parse(content);
        assert_eq!(flags.count("instance_count"), Some(10));
        assert_eq!(flags.choice("os_type"), Some("amazon_linux"));
    }

    #[test]
    fn test_overflowing_count_is_clamped() {
        let codec = TfvarsCodec::new().unwrap();

        let high = codec.parse("instance_count = 99999999999999999999\n");
        assert_eq!(high.count("instance_count"), Some(10));

        let low = codec.parse("instance_count = -99999999999999999999\n");
        assert_eq!(low.count("instance_count"), Some(0));
    }

    #[test]
    fn test_descriptions_do_not_shadow_values() {
        let codec = TfvarsCodec::new().unwrap();
        let flags = FlagSet::defaults().with("enable_dns", false).unwrap();
        let rendered = codec.render(&flags);

        assert_eq!(rendered.matches("\n# Route 53 records\nenable_dns = false\n").count(), 1);
        assert_eq!(codec.parse(&rendered), flags);
    }

    #[test]
    fn test_render_layout() {
        let codec = TfvarsCodec::new().unwrap();
        let rendered = codec.render(&FlagSet::defaults());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(&lines[..HEADER.len()], HEADER);
        assert_eq!(lines[HEADER.len()], "");
        assert_eq!(lines[HEADER.len() + 1], "# Master switch for the whole stack");
        assert_eq!(lines[HEADER.len() + 2], "enable_stack = true");
        assert!(rendered.contains("\n# Dedicated VPC instead of the default one\nenable_vpc = false\n"));
        assert!(rendered.contains("\nenable_vpc = false\n"));
        assert!(rendered.contains("\ninstance_count = 1\n"));
        assert!(rendered.ends_with("os_type = \"amazon_linux\"\n"));
    }

    #[test]
    fn test_render_then_parse_preserves_values() {
        let codec = TfvarsCodec::new().unwrap();
        let flags = FlagSet::defaults()
            .with("enable_vpc", true)
            .and_then(|f| f.with("enable_iam", false))
            .and_then(|f| f.with("instance_count", 0_i64))
            .and_then(|f| f.with("os_type", "ubuntu"))
            .unwrap();

        assert_eq!(codec.parse(&codec.render(&flags)), flags);
    }
}
