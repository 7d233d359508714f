// Support tickets

use super::BadgeVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub merchant_id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub time_to_resolve: Option<String>,
    #[serde(default)]
    pub sla_status: Option<SlaStatus>,
    #[serde(default)]
    pub solution_title: Option<String>,
    #[serde(default)]
    pub solution_description: Option<String>,
    #[serde(default)]
    pub resolved_by: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Merchants may close a ticket that is not closed yet
    pub fn can_close(&self) -> bool {
        !matches!(self.status, TicketStatus::Closed)
    }
}

// ============================================================================
// Ticket Status
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Pending,
    Resolved,
    Closed,
    Unknown(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Pending => "PENDING",
            TicketStatus::Resolved => "RESOLVED",
            TicketStatus::Closed => "CLOSED",
            TicketStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TicketStatus::Pending => "Pendente",
            TicketStatus::Resolved => "Resolvido",
            TicketStatus::Closed => "Fechado",
            TicketStatus::Unknown(raw) => raw,
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            TicketStatus::Pending => BadgeVariant::Warning,
            TicketStatus::Resolved => BadgeVariant::Success,
            TicketStatus::Closed | TicketStatus::Unknown(_) => BadgeVariant::Neutral,
        }
    }
}

impl From<String> for TicketStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "PENDING" => TicketStatus::Pending,
            "RESOLVED" => TicketStatus::Resolved,
            "CLOSED" => TicketStatus::Closed,
            _ => TicketStatus::Unknown(raw),
        }
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

// ============================================================================
// SLA Status
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlaStatus {
    Fast,
    Normal,
    Slow,
    Critical,
    Unknown(String),
}

impl SlaStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SlaStatus::Fast => "FAST",
            SlaStatus::Normal => "NORMAL",
            SlaStatus::Slow => "SLOW",
            SlaStatus::Critical => "CRITICAL",
            SlaStatus::Unknown(raw) => raw,
        }
    }

    pub fn badge(&self) -> BadgeVariant {
        match self {
            SlaStatus::Fast => BadgeVariant::Success,
            SlaStatus::Normal => BadgeVariant::Info,
            SlaStatus::Slow => BadgeVariant::Warning,
            SlaStatus::Critical => BadgeVariant::Danger,
            SlaStatus::Unknown(_) => BadgeVariant::Neutral,
        }
    }
}

impl From<String> for SlaStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "FAST" => SlaStatus::Fast,
            "NORMAL" => SlaStatus::Normal,
            "SLOW" => SlaStatus::Slow,
            "CRITICAL" => SlaStatus::Critical,
            _ => SlaStatus::Unknown(raw),
        }
    }
}

impl From<SlaStatus> for String {
    fn from(status: SlaStatus) -> Self {
        status.as_str().to_string()
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /tickets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: String,
}

impl CreateTicketRequest {
    /// Trims both fields; both must be non-empty
    pub fn new(title: &str, description: &str) -> Result<Self, String> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() || description.is_empty() {
            return Err("Por favor, preencha todos os campos".to_string());
        }
        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
        })
    }
}

/// Body of `PUT /tickets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub ticket_id: String,
    pub status: TicketStatus,
}

impl UpdateTicketRequest {
    pub fn close(ticket_id: &str) -> Self {
        Self {
            ticket_id: ticket_id.to_string(),
            status: TicketStatus::Closed,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_ticket(id: &str, status: &str) -> Ticket {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "merchantId": "merchant-1",
        "title": "Pedido bloqueado",
        "description": "Cliente legítimo recusado",
        "status": status,
        "timeToResolve": null,
        "slaStatus": "NORMAL",
        "solutionTitle": null,
        "solutionDescription": null,
        "resolvedBy": null,
        "resolvedAt": null,
        "createdAt": "2025-11-01T10:00:00Z",
        "updatedAt": "2025-11-01T10:00:00Z"
    }))
    .expect("sample ticket is valid")
}
