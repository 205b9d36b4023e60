use std::fs::OpenOptions;

use crate::error::{ErrorKind, SearchfsError, SearchfsResult};

/// How a file should be opened, parsed from a C-style mode string (`"rb"`, `"w"`, `"a+"`...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub create: bool,
    pub truncate: bool,
}

impl OpenMode {
    /// Read-only mode (`"rb"`).
    pub fn read() -> Self {
        Self {
            read: true,
            write: false,
            append: false,
            create: false,
            truncate: false,
        }
    }

    /// Parse a mode string.
    ///
    /// The first character selects the base mode: `r` (read), `w` (write, create, truncate)
    /// or `a` (append, create). A `+` anywhere after it adds the opposite direction. `b` and
    /// `t` are accepted and ignored.
    pub fn parse(mode: &str) -> SearchfsResult<Self> {
        let mut chars = mode.chars();
        let mut parsed = match chars.next() {
            Some('r') => Self::read(),
            Some('w') => Self {
                read: false,
                write: true,
                append: false,
                create: true,
                truncate: true,
            },
            Some('a') => Self {
                read: false,
                write: true,
                append: true,
                create: true,
                truncate: false,
            },
            _ => return Err(invalid_mode(mode)),
        };
        for c in chars {
            match c {
                '+' => {
                    parsed.read = true;
                    parsed.write = true;
                }
                'b' | 't' => {}
                _ => return Err(invalid_mode(mode)),
            }
        }
        Ok(parsed)
    }

    /// Whether writes through the handle are allowed.
    pub fn is_writable(&self) -> bool {
        self.write
    }

    /// The matching `std::fs::OpenOptions`.
    pub fn to_open_options(&self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options
            .read(self.read)
            .write(self.write && !self.append)
            .append(self.append)
            .create(self.create)
            .truncate(self.truncate);
        options
    }
}

fn invalid_mode(mode: &str) -> Box<SearchfsError> {
    Box::new(SearchfsError::new(ErrorKind::Message {
        message: format!("Invalid open mode '{}'", mode),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_modes() {
        assert_eq!(OpenMode::parse("r").unwrap(), OpenMode::read());
        assert_eq!(OpenMode::parse("rb").unwrap(), OpenMode::read());
        assert!(!OpenMode::parse("rb").unwrap().is_writable());
    }

    #[test]
    fn test_parse_write_mode() {
        let mode = OpenMode::parse("wb").unwrap();
        assert!(mode.write && mode.create && mode.truncate);
        assert!(!mode.read);
    }

    #[test]
    fn test_parse_append_mode() {
        let mode = OpenMode::parse("a").unwrap();
        assert!(mode.append && mode.create);
        assert!(!mode.truncate);
    }

    #[test]
    fn test_parse_plus_adds_both_directions() {
        let mode = OpenMode::parse("r+b").unwrap();
        assert!(mode.read && mode.write);
        assert!(!mode.create);

        let mode = OpenMode::parse("w+").unwrap();
        assert!(mode.read && mode.write && mode.truncate);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(OpenMode::parse("").is_err());
        assert!(OpenMode::parse("x").is_err());
        assert!(OpenMode::parse("rz").is_err());
    }
}
