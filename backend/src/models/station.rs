use serde::{Deserialize, Serialize};
use std::fmt;

/// A stop on a line, identified by its name.
///
/// Two stations are the same station when their names are equal. The value is
/// never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Station(String);

impl Station {
    pub fn new(name: impl Into<String>) -> Self {
        Station(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn into_name(self) -> String {
        self.0
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Station {
    fn from(name: &str) -> Self {
        Station::new(name)
    }
}

impl From<String> for Station {
    fn from(name: String) -> Self {
        Station(name)
    }
}
