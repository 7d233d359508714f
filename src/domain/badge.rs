use serde::Serialize;

/// Visual treatment a consumer should give a status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Success,
    Info,
    Warning,
    Danger,
    Neutral,
}
