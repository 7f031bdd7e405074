//! User-facing notifications. The UI renders these as toasts.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant { #[default] Default, Destructive }

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), variant: Variant::Default }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self { title: "Error".into(), description: description.into(), variant: Variant::Destructive }
    }
}
