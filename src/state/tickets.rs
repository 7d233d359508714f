// Ticket list, ticket detail and the ticket actions

use super::remote::{FetchOutcome, RemoteCollection, RemoteEntity};
use super::Notice;
use crate::client::ApiClient;
use crate::domain::{CreateTicketRequest, Ticket, UpdateTicketRequest};
use crate::services::tickets;
use std::ops::Deref;

const LIST_ERROR: &str = "Erro ao carregar tickets";
const DETAIL_ERROR: &str = "Erro ao carregar ticket";

#[derive(Clone)]
pub struct TicketsState {
    client: ApiClient,
    tickets: RemoteCollection<Ticket>,
}

impl TicketsState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            tickets: RemoteCollection::new("tickets"),
        }
    }

    pub async fn fetch_tickets(&self) -> FetchOutcome {
        let client = &self.client;
        self.tickets
            .load(
                async { tickets::get_tickets(client).await.map(|envelope| envelope.data) },
                LIST_ERROR,
            )
            .await
    }

    /// Open a ticket; blank fields are rejected locally
    pub async fn create_ticket(&self, title: &str, description: &str) -> Notice {
        let request = match CreateTicketRequest::new(title, description) {
            Ok(request) => request,
            Err(message) => return Notice::Error(message),
        };

        match tickets::create_ticket(&self.client, &request).await.into_result() {
            Ok(created) => {
                tracing::info!(ticket_id = %created.data.id, "Ticket created");
                self.fetch_tickets().await;
                Notice::Success("Ticket criado com sucesso!".to_string())
            }
            Err(message) => Notice::error_or(message, "Erro ao criar ticket"),
        }
    }
}

impl Deref for TicketsState {
    type Target = RemoteCollection<Ticket>;

    fn deref(&self) -> &Self::Target {
        &self.tickets
    }
}

#[derive(Clone)]
pub struct TicketState {
    client: ApiClient,
    ticket: RemoteEntity<Ticket>,
}

impl TicketState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            ticket: RemoteEntity::new("ticket"),
        }
    }

    pub async fn fetch_ticket(&self, ticket_id: &str) -> FetchOutcome {
        let client = &self.client;
        self.ticket
            .load(
                async { tickets::get_ticket(client, ticket_id).await.map(|envelope| envelope.data) },
                DETAIL_ERROR,
            )
            .await
    }

    /// Close the cached ticket and reload it
    pub async fn close_ticket(&self) -> Notice {
        let ticket = match self.ticket.value().await {
            Some(ticket) => ticket,
            None => return Notice::Error("Nenhum ticket selecionado".to_string()),
        };
        if !ticket.can_close() {
            return Notice::Error("Este ticket já está fechado".to_string());
        }

        let request = UpdateTicketRequest::close(&ticket.id);
        match tickets::update_ticket(&self.client, &request).await.into_result() {
            Ok(_) => {
                tracing::info!(ticket_id = %ticket.id, "Ticket closed");
                self.fetch_ticket(&ticket.id).await;
                Notice::Success("Ticket fechado com sucesso".to_string())
            }
            Err(message) => Notice::error_or(message, "Erro ao fechar ticket"),
        }
    }
}

impl Deref for TicketState {
    type Target = RemoteEntity<Ticket>;

    fn deref(&self) -> &Self::Target {
        &self.ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NoCookies;
    use crate::domain::ticket::sample_ticket;
    use crate::domain::TicketStatus;
    use crate::test_support::FakeBackend;
    use axum::{
        extract::{Path, State},
        routing::get,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Minimal ticket backend keeping statuses in memory
    #[derive(Clone, Default)]
    struct Tickets(Arc<Mutex<HashMap<String, String>>>);

    fn backend(tickets: Tickets) -> Router {
        Router::new()
            .route(
                "/tickets",
                get(|State(t): State<Tickets>| async move {
                    let map = t.0.lock().unwrap();
                    let mut list: Vec<Ticket> =
                        map.iter().map(|(id, status)| sample_ticket(id, status)).collect();
                    list.sort_by(|a, b| a.id.cmp(&b.id));
                    Json(json!({ "data": list }))
                })
                .post(|State(t): State<Tickets>, Json(body): Json<Value>| async move {
                    let mut map = t.0.lock().unwrap();
                    let id = format!("t{}", map.len() + 1);
                    map.insert(id.clone(), "PENDING".to_string());
                    let mut ticket = serde_json::to_value(sample_ticket(&id, "PENDING")).unwrap();
                    ticket["title"] = body["title"].clone();
                    Json(json!({ "data": ticket }))
                })
                .put(|State(t): State<Tickets>, Json(body): Json<Value>| async move {
                    let id = body["ticketId"].as_str().unwrap_or_default().to_string();
                    let status = body["status"].as_str().unwrap_or_default().to_string();
                    t.0.lock().unwrap().insert(id, status);
                    Json(json!({ "data": body }))
                }),
            )
            .route(
                "/tickets/:id",
                get(|State(t): State<Tickets>, Path(id): Path<String>| async move {
                    let status = t.0.lock().unwrap().get(&id).cloned().unwrap_or_default();
                    Json(json!({ "data": sample_ticket(&id, &status) }))
                }),
            )
            .with_state(tickets)
    }

    #[tokio::test]
    async fn test_create_ticket_refetches_list() {
        let store = Tickets::default();
        let fake = FakeBackend::spawn(backend(store.clone())).await;
        let state = TicketsState::new(fake.client(Arc::new(NoCookies)));

        let notice = state.create_ticket("Pedido travado", "Sem resposta").await;
        assert_eq!(notice, Notice::Success("Ticket criado com sucesso!".to_string()));
        assert_eq!(state.items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_ticket_is_rejected_locally() {
        let store = Tickets::default();
        let fake = FakeBackend::spawn(backend(store.clone())).await;
        let state = TicketsState::new(fake.client(Arc::new(NoCookies)));

        let notice = state.create_ticket("   ", "Sem resposta").await;
        assert_eq!(
            notice,
            Notice::Error("Por favor, preencha todos os campos".to_string())
        );
        assert!(store.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_ticket_reloads_detail() {
        let store = Tickets::default();
        store
            .0
            .lock()
            .unwrap()
            .insert("t1".to_string(), "PENDING".to_string());
        let fake = FakeBackend::spawn(backend(store.clone())).await;
        let state = TicketState::new(fake.client(Arc::new(NoCookies)));

        assert!(matches!(state.close_ticket().await, Notice::Error(_)));

        state.fetch_ticket("t1").await;
        let notice = state.close_ticket().await;
        assert_eq!(notice, Notice::Success("Ticket fechado com sucesso".to_string()));
        assert_eq!(state.value().await.unwrap().status, TicketStatus::Closed);

        assert!(matches!(state.close_ticket().await, Notice::Error(_)));
    }
}
