//! Default configuration file creation.
//!
//! The default file is generated with a small builder so that settings and
//! their comments line up, followed by the built-in location registry.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::{DEFAULT_LOCATION, DEFAULT_TIMEZONE};
use crate::geo::registry::builtin_entries;

/// Write a commented default configuration to `path`, creating parent
/// directories as needed.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let mut content = ConfigBuilder::new()
        .add_section("Selection")
        .add_setting(
            "location",
            &format!("\"{DEFAULT_LOCATION}\""),
            "Location selected at startup (must match a [[locations]] name)",
        )
        .add_setting(
            "timezone",
            &format!("\"{DEFAULT_TIMEZONE}\""),
            "Display time zone: \"local\" or an IANA name such as \"Europe/Oslo\"",
        )
        .add_section("Locations")
        .build();

    for entry in builtin_entries() {
        content.push_str(&format!(
            "\n[[locations]]\nname = \"{}\"\nlatitude = {:?}\nlongitude = {:?}\n",
            entry.name, entry.latitude, entry.longitude
        ));
    }

    fs::write(path, content).context("Failed to write default config file")?;
    Ok(())
}

struct ConfigBuilder {
    lines: Vec<Line>,
}

enum Line {
    Section(String),
    Setting { assignment: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self { lines: Vec::new() }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.lines.push(Line::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.lines.push(Line::Setting {
            assignment: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    /// Render the entries, aligning every comment one column past the
    /// longest assignment.
    fn build(self) -> String {
        let width = self
            .lines
            .iter()
            .filter_map(|line| match line {
                Line::Setting { assignment, .. } => Some(assignment.chars().count()),
                Line::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut out = String::new();
        for (i, line) in self.lines.into_iter().enumerate() {
            match line {
                Line::Section(title) => {
                    if i > 0 {
                        out.push('\n');
                    }
                    out.push_str(&title);
                }
                Line::Setting {
                    assignment,
                    comment,
                } => {
                    let padding = " ".repeat(width - assignment.chars().count());
                    out.push_str(&format!("{assignment}{padding}{comment}"));
                }
            }
            out.push('\n');
        }
        out
    }
}
