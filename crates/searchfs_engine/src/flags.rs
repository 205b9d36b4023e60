use bitflags::bitflags;

bitflags! {
    /// Properties of a mounted search path.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SearchPathFlags: u32 {
        /// Mounted by the engine itself rather than by a game.
        const STATIC = 1 << 0;
        /// Never chosen as the write directory.
        const NOWRITE = 1 << 1;
        /// Marks a game directory.
        const GAMEDIR = 1 << 2;
        /// Game directory with custom/mod data. Existence checks on it are exact (case-sensitive).
        const CUSTOM = 1 << 3;
        /// Read-only game directory.
        const GAMERODIR = 1 << 4;
    }
}

impl SearchPathFlags {
    /// Flags that make a search path part of the game directory.
    pub const GAMEDIR_ONLY: Self = Self::GAMEDIR.union(Self::CUSTOM).union(Self::GAMERODIR);

    /// Parse a lowercase flag name as written in configuration files.
    pub fn parse_name(name: &str) -> Option<Self> {
        Self::from_name(&name.to_ascii_uppercase())
    }

    /// Annotation words in display order.
    pub fn annotations(&self) -> Vec<&'static str> {
        [
            (Self::GAMERODIR, "rodir"),
            (Self::GAMEDIR, "gamedir"),
            (Self::CUSTOM, "custom"),
            (Self::NOWRITE, "nowrite"),
            (Self::STATIC, "static"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, word)| word)
        .collect()
    }
}
