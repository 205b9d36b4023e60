use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use tracing_error::{SpanTrace, SpanTraceStatus};

/* 📖 # Why a custom error type and not anyhow/eyre/thiserror?

- Full control over how errors render (context tree, cause chain, span trace)
- Misses are not errors in this crate: lookups report them with `bool` / `Option`,
  so the error type only has to cover genuinely exceptional outcomes
- No extra dependencies beyond tracing-error
*/

/// Error variants that can occur in searchfs operations.
#[derive(Debug)]
pub enum ErrorKind {
    /// File system operation failed
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A glob pattern could not be compiled
    InvalidPattern { pattern: String, message: String },

    /// Configuration could not be parsed or applied
    Config { message: String },

    /// Multiple errors occurred during batch operations
    Multiple {
        errors: Vec<SearchfsError>,
        count: usize,
    },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/* 📖 # Why separate ErrorKind and SearchfsError?

- ErrorKind: structural variants callers can pattern match on
- SearchfsError: runtime decoration (context strings, cause, span trace)

The span trace is captured when the error is constructed, so the rendered error shows which
instrumented operation (mount, search, open...) it happened in.
*/

/// Error type wrapping an [`ErrorKind`] with context, an optional cause and a span trace.
pub struct SearchfsError {
    kind: ErrorKind,
    context: Vec<String>,
    cause: Option<Box<SearchfsError>>,
    span_trace: SpanTrace,
}

impl SearchfsError {
    /// Creates a new error from an ErrorKind, capturing the current span trace.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
            cause: None,
            span_trace: SpanTrace::capture(),
        }
    }

    /// Shorthand for a [`ErrorKind::Message`] error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Shorthand for a [`ErrorKind::FileError`] error.
    pub fn file_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::new(ErrorKind::FileError {
            path: path.into(),
            source,
        })
    }

    /// Attaches context to an error.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Records the error that caused this one.
    pub fn caused_by(mut self, cause: SearchfsError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn get_context(&self) -> &[String] {
        &self.context
    }

    pub fn cause(&self) -> Option<&SearchfsError> {
        self.cause.as_deref()
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// Returns the innermost error in the chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    fn fmt_kind(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::InvalidPattern { pattern, message } => {
                write!(f, "Invalid glob pattern '{}': {}", pattern, message)
            }
            ErrorKind::Config { message } => write!(f, "Invalid configuration: {}", message),
            ErrorKind::Multiple { errors, count } => match errors.first() {
                Some(first) => write!(f, "Multiple errors occurred ({} total): {}", count, first),
                None => write!(f, "Multiple errors occurred ({} total)", count),
            },
            ErrorKind::Message { message } => write!(f, "{}", message),
        }
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        self.fmt_kind(f)?;
        writeln!(f)?;
        let cause_lines = usize::from(self.cause.is_some());
        let total = self.context.len() + cause_lines;
        for (i, ctx) in self.context.iter().enumerate() {
            let branch = if i + 1 == total { "└─" } else { "├─" };
            writeln!(f, "{}{} {}", indent, branch, ctx)?;
        }
        if let Some(cause) = &self.cause {
            write!(f, "{}└─ cause: ", indent)?;
            cause.fmt_tree(f, &format!("{}   ", indent))?;
        }
        Ok(())
    }
}

impl From<ErrorKind> for SearchfsError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for SearchfsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            ErrorKind::Multiple { errors, .. } => errors
                .first()
                .map(|first| first as &(dyn StdError + 'static)),
            _ => self
                .cause
                .as_deref()
                .map(|cause| cause as &(dyn StdError + 'static)),
        }
    }
}

impl fmt::Display for SearchfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ctx in &self.context {
            write!(f, "{}: ", ctx)?;
        }
        self.fmt_kind(f)
    }
}

impl fmt::Debug for SearchfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, "")?;
        if self.span_trace.status() == SpanTraceStatus::CAPTURED {
            writeln!(f, "Trace: {}", self.span_trace)?;
        }
        Ok(())
    }
}

/// Standard result type for searchfs operations.
pub type SearchfsResult<T> = std::result::Result<T, Box<SearchfsError>>;

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error (eager).
    fn context(self, context: impl Into<String>) -> SearchfsResult<T>;

    /// Attaches context to an error, only building the string on failure.
    fn with_context<F>(self, f: F) -> SearchfsResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for SearchfsResult<T> {
    fn context(self, context: impl Into<String>) -> SearchfsResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> SearchfsResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}

/// Builds a boxed [`SearchfsError`] message from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::error::SearchfsError::message(format!($($arg)*)))
    };
}

/// Returns early with an [`err!`] error.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::err!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use std::io;

    #[test]
    fn test_error_from_file_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = SearchfsError::file_error("data/config.cfg", io_err);

        match error.kind() {
            ErrorKind::FileError { path, .. } => {
                assert_eq!(path, &PathBuf::from("data/config.cfg"));
            }
            _ => panic!("Expected FileError variant"),
        }
    }

    #[test]
    fn test_error_display_with_multiple_contexts() {
        let error = SearchfsError::message("root error")
            .context("first")
            .context("second");
        assert_eq!(error.to_string(), "first: second: root error");
    }

    #[test]
    fn test_error_display_invalid_pattern() {
        let error = SearchfsError::new(ErrorKind::InvalidPattern {
            pattern: "[abc".to_string(),
            message: "unclosed character class".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "Invalid glob pattern '[abc': unclosed character class"
        );
    }

    #[test]
    fn test_error_display_multiple_errors() {
        let error = SearchfsError::new(ErrorKind::Multiple {
            errors: vec![
                SearchfsError::message("error 1"),
                SearchfsError::message("error 2"),
            ],
            count: 2,
        });
        assert_eq!(
            error.to_string(),
            "Multiple errors occurred (2 total): error 1"
        );
    }

    #[test]
    fn test_error_source_and_root_cause() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = SearchfsError::file_error("x", io_err);
        assert!(error.source().is_some());
        assert_eq!(error.root_cause().to_string(), "access denied");

        let plain = SearchfsError::message("plain");
        assert!(plain.source().is_none());
        assert_eq!(plain.root_cause().to_string(), "plain");
    }

    #[test]
    fn test_multiple_source_is_first_error() {
        let error = SearchfsError::new(ErrorKind::Multiple {
            errors: vec![
                SearchfsError::message("unknown flag 'shiny'"),
                SearchfsError::message("unknown flag 'readonly'"),
            ],
            count: 2,
        });
        assert_eq!(
            error.source().map(|source| source.to_string()),
            Some("unknown flag 'shiny'".to_string())
        );
        assert_eq!(error.root_cause().to_string(), "unknown flag 'shiny'");
    }

    #[test]
    fn test_root_cause_follows_caused_by() {
        let inner = SearchfsError::message("inner");
        let outer = SearchfsError::message("outer").caused_by(inner);
        assert_eq!(outer.root_cause().to_string(), "inner");
    }

    #[test]
    fn test_result_ext_chaining() {
        let result: SearchfsResult<i32> = Err(Box::new(SearchfsError::message("root")));
        let err = result
            .context("step 1")
            .with_context(|| "step 2".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "step 1: step 2: root");
    }

    #[test]
    fn test_result_ext_success_untouched() {
        let result: SearchfsResult<i32> = Ok(42);
        assert_eq!(result.context("unused").unwrap(), 42);
    }

    #[test]
    fn test_err_and_bail_macros() {
        fn fails(name: &str) -> SearchfsResult<()> {
            bail!("cannot mount {}", name);
        }
        let err = fails("/data/").unwrap_err();
        assert_eq!(err.to_string(), "cannot mount /data/");

        let boxed: Box<SearchfsError> = err!("code {}", 7);
        assert_eq!(boxed.to_string(), "code 7");
    }

    #[test]
    fn test_debug_tree_without_span_trace() {
        let inner = SearchfsError::message("inner error").context("inner context");
        let outer = SearchfsError::message("outer error")
            .context("first")
            .context("second")
            .caused_by(inner);

        expect![[r#"
            outer error
            ├─ first
            ├─ second
            └─ cause: inner error
               └─ inner context
        "#]]
        .assert_eq(&format!("{:?}", outer));
    }
}
