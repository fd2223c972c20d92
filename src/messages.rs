// 🌐 Localized messages
// A message is a stable catalog id plus the English default copy. Catalog
// lookup happens in the UI layer; here we only describe what to show.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedMessage {
    pub id: &'static str,
    pub default_message: &'static str,

    /// Placeholder values, substituted into `{name}` slots
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<&'static str, String>,
}

impl LocalizedMessage {
    pub const fn new(id: &'static str, default_message: &'static str) -> Self {
        LocalizedMessage {
            id,
            default_message,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, name: &'static str, value: impl ToString) -> Self {
        self.values.insert(name, value.to_string());
        self
    }

    /// Default copy with placeholders filled in. Unknown placeholders stay as-is.
    pub fn render(&self) -> String {
        let mut out = self.default_message.to_string();
        for (name, value) in &self.values {
            out = out.replace(&format!("{{{}}}", name), value);
        }
        out
    }
}
