use std::{
    env, fs,
    path::{Path, PathBuf},
};

use log::warn;

use crate::error::HighlightError;
use crate::options::{HighlightOptions, Search};

const MAX_HIGHLIGHTS_LIMIT: usize = 100_000;
const MAX_DEBOUNCE_MS: u64 = 10_000;

pub const DEFAULT_CONFIG: &str = "# Terms to highlight, one per line\n\
# search = error\n\
# search = warning\n\
# Highlight set the matches are registered under\n\
highlight_name = highlight\n\
# Match case exactly\n\
case_sensitive = false\n\
# Only match whole words\n\
whole_word = false\n\
# Maximum matches per scan across all terms\n\
max_highlights = 1000\n\
# Extra elements whose text is skipped (script, style, noscript, iframe\n\
# and textarea are always skipped)\n\
# ignored_tags = code, pre\n\
# Delay before a scheduled scan runs, in milliseconds\n\
debounce_ms = 100\n";

const VALID_KEYS: &[&str] = &[
    "search",
    "highlight_name",
    "case_sensitive",
    "whole_word",
    "max_highlights",
    "ignored_tags",
    "debounce_ms",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub line_number: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct HighlightConfig {
    pub options: HighlightOptions,
    pub warnings: Vec<ConfigWarning>,
}

impl HighlightConfig {
    /// Reads the config at `path`. Unknown keys and bad values are logged
    /// and leave the defaults in place.
    pub fn load(path: &Path) -> Result<Self, HighlightError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| HighlightError::Config(format!("{}: {}", path.display(), e)))?;

        let config = Self::from_contents(&contents);
        for warning in &config.warnings {
            warn!(
                "Ignoring config line {} in {}: {}",
                warning.line_number,
                path.display(),
                warning.message
            );
        }
        Ok(config)
    }

    /// Loads the config from the default location, falling back to defaults
    /// when there is no file.
    pub fn load_or_default() -> Result<Self, HighlightError> {
        match config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_contents(contents: &str) -> Self {
        let mut config = Self::default();
        let mut terms = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                config.warn(line_number, "expected 'key = value'".to_string());
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "search" => {
                    if let Some(term) = parse_string_value(value) {
                        terms.push(term);
                    }
                }
                "highlight_name" => match parse_string_value(value) {
                    Some(name) => config.options.highlight_name = name,
                    None => config.warn(line_number, "highlight_name cannot be empty".to_string()),
                },
                "case_sensitive" => match parse_bool(value) {
                    Some(enabled) => config.options.case_sensitive = enabled,
                    None => config.warn(
                        line_number,
                        "case_sensitive must be 'true' or 'false'".to_string(),
                    ),
                },
                "whole_word" => match parse_bool(value) {
                    Some(enabled) => config.options.whole_word = enabled,
                    None => config.warn(
                        line_number,
                        "whole_word must be 'true' or 'false'".to_string(),
                    ),
                },
                "max_highlights" => match value.parse::<usize>() {
                    Ok(max) => config.options.max_highlights = max.min(MAX_HIGHLIGHTS_LIMIT),
                    Err(_) => config.warn(
                        line_number,
                        "max_highlights must be a non-negative integer".to_string(),
                    ),
                },
                "ignored_tags" => {
                    config.options.ignored_tags.extend(parse_list(value));
                }
                "debounce_ms" => match value.parse::<u64>() {
                    Ok(delay) => config.options.debounce_ms = delay.min(MAX_DEBOUNCE_MS),
                    Err(_) => config.warn(
                        line_number,
                        "debounce_ms must be a non-negative integer".to_string(),
                    ),
                },
                _ => config.warn(
                    line_number,
                    format!("unknown key '{}'. Valid keys: {}", key, VALID_KEYS.join(", ")),
                ),
            }
        }

        if !terms.is_empty() {
            config.options.search = Search::Many(terms);
        }

        config
    }

    fn warn(&mut self, line_number: usize, message: String) {
        self.warnings.push(ConfigWarning {
            line_number,
            message,
        });
    }

    /// Renders the options in config file syntax.
    pub fn render(options: &HighlightOptions) -> String {
        let mut out = String::new();
        for term in options.search.terms() {
            if term.trim() == term {
                out.push_str(&format!("search = {}\n", term));
            } else {
                out.push_str(&format!("search = \"{}\"\n", term));
            }
        }
        out.push_str(&format!("highlight_name = {}\n", options.highlight_name));
        out.push_str(&format!("case_sensitive = {}\n", options.case_sensitive));
        out.push_str(&format!("whole_word = {}\n", options.whole_word));
        out.push_str(&format!("max_highlights = {}\n", options.max_highlights));
        if !options.ignored_tags.is_empty() {
            out.push_str(&format!("ignored_tags = {}\n", options.ignored_tags.join(", ")));
        }
        out.push_str(&format!("debounce_ms = {}\n", options.debounce_ms));
        out
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_string_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let unquoted = if trimmed.len() >= 2
        && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
    {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    if unquoted.trim().is_empty() {
        return None;
    }

    Some(unquoted.to_string())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.trim().is_empty()
    {
        return Some(Path::new(&xdg_config_home).join("spanmark/config.txt"));
    }

    dirs::home_dir().map(|home| home.join(".config/spanmark/config.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_contents() {
        let config = HighlightConfig::from_contents("");
        assert_eq!(config.options, HighlightOptions::default());
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn default_config_parses_cleanly() {
        let config = HighlightConfig::from_contents(DEFAULT_CONFIG);
        assert!(config.warnings.is_empty());
        assert_eq!(config.options, HighlightOptions::default());
    }

    #[test]
    fn search_lines_are_collected_in_order() {
        let config = HighlightConfig::from_contents(
            "# comment\n\
             search = error\n\
             search = \" cat \"\n\
             search =\n\
             search = warning\n",
        );

        assert_eq!(
            config.options.search,
            Search::Many(vec![
                "error".to_string(),
                " cat ".to_string(),
                "warning".to_string()
            ])
        );
    }

    #[test]
    fn flags_and_limits_parse() {
        let config = HighlightConfig::from_contents(
            "Highlight_Name = highlight-error\n\
             case_sensitive = yes\n\
             whole_word = on\n\
             max_highlights = 250\n\
             debounce_ms = 0\n",
        );

        assert_eq!(config.options.highlight_name, "highlight-error");
        assert!(config.options.case_sensitive);
        assert!(config.options.whole_word);
        assert_eq!(config.options.max_highlights, 250);
        assert_eq!(config.options.debounce_ms, 0);
    }

    #[test]
    fn limits_are_clamped() {
        let config = HighlightConfig::from_contents(
            "max_highlights = 5000000\n\
             debounce_ms = 999999\n",
        );
        assert_eq!(config.options.max_highlights, 100_000);
        assert_eq!(config.options.debounce_ms, 10_000);
    }

    #[test]
    fn ignored_tags_accumulate() {
        let config = HighlightConfig::from_contents(
            "ignored_tags = code, pre\n\
             ignored_tags = kbd\n",
        );
        assert_eq!(config.options.ignored_tags, vec!["code", "pre", "kbd"]);
    }

    #[test]
    fn invalid_lines_become_warnings() {
        let config = HighlightConfig::from_contents(
            "case_sensitive = maybe\n\
             colour = red\n\
             just some words\n\
             max_highlights = -3\n",
        );

        let lines: Vec<_> = config.warnings.iter().map(|w| w.line_number).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
        assert!(config.warnings[1].message.contains("unknown key 'colour'"));
        assert!(!config.options.case_sensitive);
        assert_eq!(config.options.max_highlights, 1000);
    }

    #[test]
    fn render_round_trips_through_parser() {
        let mut options = HighlightOptions::new(["error", " cat ", "warning"]);
        options.whole_word = true;
        options.ignored_tags = vec!["code".to_string()];

        let rendered = HighlightConfig::render(&options);
        assert!(rendered.contains("search = \" cat \"\n"));

        let parsed = HighlightConfig::from_contents(&rendered);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.options, options);
    }
}
