// Shop policy endpoint

use super::{execute, ApiEnvelope, ServiceResponse};
use crate::client::ApiClient;
use crate::domain::UpdateStorePolicyRequest;

/// PUT /shop-policy
///
/// The response payload is passed through untouched; callers re-fetch the
/// store to observe the change.
pub async fn update_store_policy(
    client: &ApiClient,
    request: &UpdateStorePolicyRequest,
) -> ServiceResponse<ApiEnvelope<serde_json::Value>> {
    execute("update_store_policy", client.put("/shop-policy").json(request)).await
}
