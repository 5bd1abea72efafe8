//! `.sketchignore` resolution for `artboards-ignore`.
//!
//! `resolve(dir)` searches `dir` and its ancestors for the nearest
//! `.sketchignore`, compiles one regular expression per non-blank line, and
//! returns an [`IgnoreRuleSet`]. An artboard is excluded when any rule
//! matches its qualified name `page/artboard`. Patterns are unanchored, so
//! `^Details/` excludes a whole page and `Draft` excludes any name
//! containing it.

use std::path::{Path, PathBuf};

use artboards_core::paths::find_upward;
use regex::Regex;
use thiserror::Error;

/// Well-known ignore-rules file name.
pub const IGNORE_FILE_NAME: &str = ".sketchignore";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A single compiled ignore line.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// 1-based line number in the source file.
    pub line: usize,
    regex: Regex,
}

impl IgnoreRule {
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_match(&self, qualified_name: &str) -> bool {
        self.regex.is_match(qualified_name)
    }
}

/// Ordered, immutable set of ignore rules for one run.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRuleSet {
    rules: Vec<IgnoreRule>,
    origin: Option<PathBuf>,
}

/// Errors from ignore-rule resolution.
#[derive(Debug, Error)]
pub enum IgnoreError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern on line {line} of {path}: {source}")]
    Pattern {
        path: PathBuf,
        line: usize,
        #[source]
        source: regex::Error,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl IgnoreRuleSet {
    /// A set with no rules; excludes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile `content`, one rule per non-blank line.
    ///
    /// `origin` is only used to annotate errors and for display.
    pub fn parse(content: &str, origin: Option<&Path>) -> Result<Self, IgnoreError> {
        let mut rules = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let regex = Regex::new(line).map_err(|source| IgnoreError::Pattern {
                path: origin.map(Path::to_path_buf).unwrap_or_default(),
                line: idx + 1,
                source,
            })?;
            rules.push(IgnoreRule {
                line: idx + 1,
                regex,
            });
        }
        Ok(Self {
            rules,
            origin: origin.map(Path::to_path_buf),
        })
    }

    /// `true` if any rule matches `qualified_name`.
    pub fn is_excluded(&self, qualified_name: &str) -> bool {
        self.matching_rule(qualified_name).is_some()
    }

    /// First rule that matches `qualified_name`, if any.
    pub fn matching_rule(&self, qualified_name: &str) -> Option<&IgnoreRule> {
        self.rules.iter().find(|rule| rule.is_match(qualified_name))
    }

    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The `.sketchignore` these rules came from, if one was found.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

/// Content of the nearest `file_name` at or above `start`, with its path.
///
/// Absence is `Ok(None)`. An entry that exists but cannot be inspected or
/// read (including a directory of that name) is an error.
pub fn find_upward_content(
    file_name: &str,
    start: &Path,
) -> Result<Option<(PathBuf, String)>, IgnoreError> {
    let found = find_upward(file_name, start).map_err(|e| IgnoreError::Io {
        path: e.path,
        source: e.source,
    })?;
    let Some(path) = found else {
        return Ok(None);
    };
    let content = std::fs::read_to_string(&path).map_err(|source| IgnoreError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(Some((path, content)))
}

/// Resolve the ignore rules that apply to design files in `start_dir`.
pub fn resolve(start_dir: &Path) -> Result<IgnoreRuleSet, IgnoreError> {
    match find_upward_content(IGNORE_FILE_NAME, start_dir)? {
        Some((path, content)) => IgnoreRuleSet::parse(&content, Some(&path)),
        None => Ok(IgnoreRuleSet::empty()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
