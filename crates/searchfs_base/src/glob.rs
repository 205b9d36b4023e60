use globset::{Glob, GlobBuilder};
use tracing::debug;

use crate::error::{ErrorKind, SearchfsError, SearchfsResult};

/* 📖 # Why compile patterns with globset instead of a hand-written matcher?

globset gives anchored, full-string matching and a case-insensitive mode. Search patterns
only know two wildcards, `*` and `?`; every other character names itself, so a map called
`[dm]arena.bsp` is found by its own name. Before compiling, `[`, `]`, `{` and `}` are escaped
and runs of `*` collapse into one, which keeps globset's classes, alternations and recursive
`**` out of reach. The builder options pin down the path semantics:
- `literal_separator(true)`: wildcards never cross `/`, so `*.wav` only matches entries of
  the directory the pattern names
- `backslash_escape(false)`: `\` is a directory separator in patterns, not an escape
*/

/// Rewrite a search pattern into globset syntax where only `*` and `?` are special.
fn to_glob_syntax(pattern: &str) -> String {
    let mut glob = String::with_capacity(pattern.len());
    let mut previous = None;
    for c in pattern.chars() {
        match c {
            '*' if previous == Some('*') => {}
            '[' | ']' | '{' | '}' => glob.push_str(&globset::escape(c.encode_utf8(&mut [0; 4]))),
            _ => glob.push(c),
        }
        previous = Some(c);
    }
    glob
}

/// A compiled glob pattern matched against whole candidate strings.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    pattern: String,
    matcher: globset::GlobMatcher,
}

impl GlobMatcher {
    /// Compile `pattern`, optionally ignoring case.
    pub fn new(pattern: &str, case_insensitive: bool) -> SearchfsResult<Self> {
        let glob: Glob = GlobBuilder::new(&to_glob_syntax(pattern))
            .case_insensitive(case_insensitive)
            .literal_separator(true)
            .backslash_escape(false)
            .build()
            .map_err(|e| {
                debug!(pattern = %pattern, error = %e, "failed to compile glob pattern");
                Box::new(SearchfsError::new(ErrorKind::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                }))
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `candidate` matches the entire pattern.
    pub fn is_match(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}
