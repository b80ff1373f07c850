use super::*;

/// Board server client over the browser `fetch` API.
pub(super) struct FetchTransport {
    config: SyncConfig,
}

impl FetchTransport {
    pub(super) fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    async fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<(), SyncError> {
        let body = serde_json::to_string(body).map_err(|error| SyncError::Encode {
            message: format!("failed to serialize request body: {error}"),
        })?;
        let request = Request::post(url)
            .header("content-type", JSON_CONTENT_TYPE)
            .body(body)
            .map_err(|error| SyncError::Encode {
                message: format!("failed to build request body: {error}"),
            })?;
        let response = request.send().await.map_err(map_network_error)?;
        ensure_success(response).await
    }
}

#[async_trait(?Send)]
impl TransactionTransport for FetchTransport {
    async fn fetch_transactions(&self) -> Result<TransactionSnapshot, SyncError> {
        let response = Request::get(&self.config.transactions_url())
            .send()
            .await
            .map_err(map_network_error)?;
        decode_json_response(response).await
    }

    async fn update_phone(&self, id: &TransactionId, client_phone: &str) -> Result<(), SyncError> {
        let body = PhoneUpdateRequest {
            client_phone: client_phone.to_string(),
        };
        self.post_json(&self.config.update_phone_url(id.as_str()), &body)
            .await
    }

    async fn start_call(&self, id: &TransactionId) -> Result<(), SyncError> {
        self.post_json(&self.config.call_url(id.as_str()), &serde_json::json!({}))
            .await
    }

    async fn set_action(&self, id: &TransactionId, action: &CallAction) -> Result<(), SyncError> {
        let body = SetActionRequest {
            action: action.clone(),
        };
        self.post_json(&self.config.set_action_url(id.as_str()), &body)
            .await
    }
}

pub(super) fn map_network_error(error: gloo_net::Error) -> SyncError {
    SyncError::Network {
        message: error.to_string(),
    }
}

async fn read_body(response: gloo_net::http::Response) -> Result<(u16, String), SyncError> {
    let status = response.status();
    let raw = response.text().await.map_err(|error| SyncError::Network {
        message: format!("failed to read response body: {error}"),
    })?;
    if !(200..=299).contains(&status) {
        return Err(SyncError::Http { status, body: raw });
    }
    Ok((status, raw))
}

pub(super) async fn ensure_success(response: gloo_net::http::Response) -> Result<(), SyncError> {
    read_body(response).await.map(|_| ())
}

pub(super) async fn decode_json_response<T: for<'de> serde::Deserialize<'de>>(
    response: gloo_net::http::Response,
) -> Result<T, SyncError> {
    let (status, raw) = read_body(response).await?;
    serde_json::from_str(&raw).map_err(|error| SyncError::Decode {
        message: format!("failed to decode response (status {status}): {error}"),
    })
}
