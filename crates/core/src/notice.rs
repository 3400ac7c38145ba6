//! Outcome notices surfaced to the UI as `(title, description, severity)`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Info)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Success)
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Warning)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_severity() {
        assert_eq!(Notice::info("a", "b").severity, Severity::Info);
        assert_eq!(Notice::success("a", "b").severity, Severity::Success);
        assert_eq!(Notice::warning("a", "b").severity, Severity::Warning);
        assert_eq!(Notice::error("a", "b").severity, Severity::Error);
    }

    #[test]
    fn serializes_as_triple() {
        let json = serde_json::to_value(Notice::warning("Saved", "Over cap")).unwrap();
        assert_eq!(json["title"], "Saved");
        assert_eq!(json["description"], "Over cap");
        assert_eq!(json["severity"], "warning");
    }
}
