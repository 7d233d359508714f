// Support ticket endpoints

use super::{execute, path_segment, ApiEnvelope, ServiceResponse};
use crate::client::ApiClient;
use crate::domain::{CreateTicketRequest, Ticket, UpdateTicketRequest};

/// GET /tickets
pub async fn get_tickets(client: &ApiClient) -> ServiceResponse<ApiEnvelope<Vec<Ticket>>> {
    execute("get_tickets", client.get("/tickets")).await
}

/// GET /tickets/:id
pub async fn get_ticket(client: &ApiClient, ticket_id: &str) -> ServiceResponse<ApiEnvelope<Ticket>> {
    let path = format!("/tickets/{}", path_segment(ticket_id));
    execute("get_ticket", client.get(&path)).await
}

/// POST /tickets
pub async fn create_ticket(
    client: &ApiClient,
    request: &CreateTicketRequest,
) -> ServiceResponse<ApiEnvelope<Ticket>> {
    execute("create_ticket", client.post("/tickets").json(request)).await
}

/// PUT /tickets
pub async fn update_ticket(
    client: &ApiClient,
    request: &UpdateTicketRequest,
) -> ServiceResponse<ApiEnvelope<serde_json::Value>> {
    execute("update_ticket", client.put("/tickets").json(request)).await
}
