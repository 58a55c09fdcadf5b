use std::fmt;

/// What kind of lookup came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Section,
    Snapshot,
    Feature,
    AttackLine,
    Shape,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKind::Section => write!(f, "section"),
            LookupKind::Snapshot => write!(f, "snapshot"),
            LookupKind::Feature => write!(f, "feature"),
            LookupKind::AttackLine => write!(f, "attack line"),
            LookupKind::Shape => write!(f, "shape"),
        }
    }
}

/// Errors surfaced by the narrative. None of them is fatal: callers log and
/// carry on with whatever data did load.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeError {
    /// A geographic dataset could not be fetched or decoded.
    DataLoad { what: String, reason: String },
    /// A requested identifier or snapshot key does not exist.
    LookupMiss { kind: LookupKind, key: String },
    /// A timestamp or other scalar failed to parse.
    Parse(String),
}

impl NarrativeError {
    pub fn data_load(what: impl Into<String>, reason: impl fmt::Display) -> Self {
        NarrativeError::DataLoad {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    pub fn lookup_miss(kind: LookupKind, key: impl Into<String>) -> Self {
        NarrativeError::LookupMiss {
            kind,
            key: key.into(),
        }
    }
}

impl fmt::Display for NarrativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NarrativeError::DataLoad { what, reason } => {
                write!(f, "failed to load {what}: {reason}")
            }
            NarrativeError::LookupMiss { kind, key } => write!(f, "no {kind} named '{key}'"),
            NarrativeError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for NarrativeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_data_load() {
        let err = NarrativeError::data_load("points", "404 Not Found");
        assert_eq!(err.to_string(), "failed to load points: 404 Not Found");
    }

    #[test]
    fn test_display_lookup_miss() {
        let err = NarrativeError::lookup_miss(LookupKind::Snapshot, "geo999999");
        assert_eq!(err.to_string(), "no snapshot named 'geo999999'");
    }
}
