use serde::{Deserialize, Serialize};

/// A diagnosis catalog item, keyed by `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

impl Diagnosis {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            latin: None,
        }
    }

    pub fn with_latin(mut self, latin: impl Into<String>) -> Self {
        self.latin = Some(latin.into());
        self
    }
}
