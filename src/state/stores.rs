// Store list, store detail and the policy form action

use super::remote::{FetchOutcome, RemoteCollection, RemoteEntity};
use super::Notice;
use crate::client::ApiClient;
use crate::domain::{MerchantStore, UpdateStorePolicyRequest};
use crate::services::{policy, stores};
use std::ops::Deref;
use std::sync::Arc;
use tokio::sync::RwLock;

const LIST_ERROR: &str = "Erro ao carregar lojas";
const DETAIL_ERROR: &str = "Erro ao carregar loja";
const POLICY_ERROR: &str = "Erro ao salvar política";
const POLICY_SAVED: &str = "Política atualizada com sucesso";

#[derive(Clone)]
pub struct StoresState {
    client: ApiClient,
    stores: RemoteCollection<MerchantStore>,
}

impl StoresState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            stores: RemoteCollection::new("stores"),
        }
    }

    pub async fn fetch_stores(&self) -> FetchOutcome {
        let client = &self.client;
        self.stores
            .load(
                async { stores::get_stores(client).await.map(|envelope| envelope.data) },
                LIST_ERROR,
            )
            .await
    }
}

impl Deref for StoresState {
    type Target = RemoteCollection<MerchantStore>;

    fn deref(&self) -> &Self::Target {
        &self.stores
    }
}

#[derive(Clone)]
pub struct StoreState {
    client: ApiClient,
    store: RemoteEntity<MerchantStore>,
    last_id: Arc<RwLock<Option<String>>>,
}

impl StoreState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            store: RemoteEntity::new("store"),
            last_id: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn fetch_store(&self, store_id: &str) -> FetchOutcome {
        *self.last_id.write().await = Some(store_id.to_string());
        let client = &self.client;
        self.store
            .load(
                async { stores::get_store(client, store_id).await.map(|envelope| envelope.data) },
                DETAIL_ERROR,
            )
            .await
    }

    /// Save the policy form. Invalid input is rejected before any request;
    /// after a successful save the store is fetched again.
    pub async fn update_policy(&self, request: &UpdateStorePolicyRequest) -> Notice {
        if let Err(message) = request.validate() {
            return Notice::Error(message);
        }

        match policy::update_store_policy(&self.client, request).await.into_result() {
            Ok(_) => {
                tracing::info!(shop_id = %request.shop_id, "Store policy updated");
                let last_id = self.last_id.read().await.clone();
                if let Some(store_id) = last_id {
                    self.fetch_store(&store_id).await;
                }
                Notice::Success(POLICY_SAVED.to_string())
            }
            Err(message) => Notice::error_or(message, POLICY_ERROR),
        }
    }

    pub async fn clear(&self) {
        *self.last_id.write().await = None;
        self.store.clear().await;
    }
}

impl Deref for StoreState {
    type Target = RemoteEntity<MerchantStore>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
