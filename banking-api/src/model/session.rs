use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether displayed figures come from the demo dataset or from the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Demo,
    Live,
}

impl SessionMode {
    pub fn is_live(&self) -> bool {
        matches!(self, SessionMode::Live)
    }

    pub fn from_live_flag(is_live: bool) -> Self {
        if is_live {
            SessionMode::Live
        } else {
            SessionMode::Demo
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Demo => write!(f, "demo"),
            SessionMode::Live => write!(f, "live"),
        }
    }
}

impl std::str::FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "demo" => Ok(SessionMode::Demo),
            "live" => Ok(SessionMode::Live),
            other => Err(format!("unknown mode '{}', expected demo or live", other)),
        }
    }
}

// Persisted as the bare boolean flag.
impl Serialize for SessionMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_live())
    }
}

impl<'de> Deserialize<'de> for SessionMode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer).map(SessionMode::from_live_flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bool() {
        assert_eq!(serde_json::to_string(&SessionMode::Live).unwrap(), "true");
        let mode: SessionMode = serde_json::from_str("false").unwrap();
        assert_eq!(mode, SessionMode::Demo);
    }

    #[test]
    fn test_default_is_demo() {
        assert_eq!(SessionMode::default(), SessionMode::Demo);
    }
}
