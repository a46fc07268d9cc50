use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The four tables backing the chat widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Messages,
    UserPresence,
    TypingIndicators,
    Usernames,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown table: {0}")]
pub struct UnknownTable(pub String);

impl Table {
    /// Provisioning and verification order.
    pub const ALL: [Table; 4] = [
        Table::Messages,
        Table::UserPresence,
        Table::TypingIndicators,
        Table::Usernames,
    ];

    /// Relation name on the backend.
    pub fn name(self) -> &'static str {
        match self {
            Table::Messages => "messages",
            Table::UserPresence => "user_presence",
            Table::TypingIndicators => "typing_indicators",
            Table::Usernames => "usernames",
        }
    }

    /// Human-readable label used in progress output.
    pub fn label(self) -> &'static str {
        match self {
            Table::Messages => "Messages",
            Table::UserPresence => "User Presence",
            Table::TypingIndicators => "Typing Indicators",
            Table::Usernames => "Usernames",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownTable(s.to_string()))
    }
}
