// Merchant store endpoints

use super::{execute, path_segment, ApiEnvelope, ServiceResponse};
use crate::client::ApiClient;
use crate::domain::MerchantStore;

/// GET /merchant/stores
pub async fn get_stores(client: &ApiClient) -> ServiceResponse<ApiEnvelope<Vec<MerchantStore>>> {
    execute("get_stores", client.get("/merchant/stores")).await
}

/// GET /merchant/stores/:id
pub async fn get_store(
    client: &ApiClient,
    store_id: &str,
) -> ServiceResponse<ApiEnvelope<MerchantStore>> {
    let path = format!("/merchant/stores/{}", path_segment(store_id));
    execute("get_store", client.get(&path)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StaticCookies;
    use crate::domain::store::sample_store;
    use crate::test_support::FakeBackend;
    use axum::{extract::Path, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_stores_and_store() {
        let backend = FakeBackend::spawn(
            Router::new()
                .route(
                    "/merchant/stores",
                    get(|| async {
                        Json(json!({ "data": [sample_store("s1", "Acme"), sample_store("s2", "Beta")] }))
                    }),
                )
                .route(
                    "/merchant/stores/:id",
                    get(|Path(id): Path<String>| async move {
                        if id == "s1" {
                            (StatusCode::OK, Json(json!({ "data": sample_store("s1", "Acme") })))
                        } else {
                            (
                                StatusCode::NOT_FOUND,
                                Json(json!({ "error_message": "Loja não encontrada" })),
                            )
                        }
                    }),
                ),
        )
        .await;
        let client = backend.client(Arc::new(StaticCookies::new("apiToken=t")));

        let stores = get_stores(&client).await.into_result().unwrap();
        assert_eq!(stores.data.len(), 2);
        assert_eq!(stores.data[1].name, "Beta");

        let store = get_store(&client, "s1").await.into_result().unwrap();
        assert_eq!(store.data.id, "s1");

        let missing = get_store(&client, "nope").await;
        assert_eq!(
            missing,
            ServiceResponse::Failure("Loja não encontrada".to_string())
        );
    }
}
