use super::{Upstream, UpstreamResponse};
use crate::{
    RequestBuilder,
    config::Config,
    data::{CatalogModel, ModelCatalog, RequestData},
    error::{Error, Result},
};
use faststr::FastStr;
use futures_util::TryStreamExt;
use reqwest::{Client as ReqwestClient, Response, header::CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[inline]
pub fn build_http_client(connect_timeout: Duration) -> Result<ReqwestClient> {
    let client = ReqwestClient::builder()
        .connect_timeout(connect_timeout)
        .build()?;
    Ok(client)
}

/// Client for the Infomaniak AI API.
#[derive(Clone)]
pub struct InfomaniakClient {
    http:                 ReqwestClient,
    api_key:              FastStr,
    models_url:           FastStr,
    chat_completions_url: FastStr,
}

impl InfomaniakClient {
    pub fn new(http: ReqwestClient, config: &Config) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            models_url: config.models_url().into(),
            chat_completions_url: config.chat_completions_url().into(),
        }
    }

    fn prepare_models(&self) -> RequestData {
        let mut request_data = RequestData::without_body(self.models_url.clone());
        request_data.bearer_auth(self.api_key.clone());
        request_data
    }

    fn prepare_chat_completions(&self, payload: Value) -> RequestData {
        let mut request_data = RequestData::new(self.chat_completions_url.clone(), payload);
        request_data.bearer_auth(self.api_key.clone());
        request_data
    }
}

impl Upstream for InfomaniakClient {
    async fn models(&self) -> Result<Vec<CatalogModel>> {
        let builder = request_builder(self.prepare_models(), &self.http);
        let response = check_status(builder.send().await?).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let catalog: ModelCatalog = serde_json::from_str(&text)
            .map_err(|_| Error::InvalidResponseData(text.into(), status))?;
        debug!(count = catalog.data.len(), "fetched model catalog");
        Ok(catalog.data)
    }

    async fn chat_completions(&self, payload: Value) -> Result<UpstreamResponse> {
        let builder = request_builder(self.prepare_chat_completions(payload), &self.http);
        let response = check_status(builder.send().await?).await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| FastStr::from(v.to_owned()));
        debug!(status, content_type = ?content_type, "chat completions responded");
        let body = response.bytes_stream().map_err(Error::from);
        Ok(UpstreamResponse::new(status, content_type, Box::pin(body)))
    }
}

fn request_builder(request_data: RequestData, client: &ReqwestClient) -> RequestBuilder {
    let RequestData { url, body, headers } = request_data;
    let mut builder = match body {
        Some(_) => client.post(url.as_str()),
        None => client.get(url.as_str()),
    };
    for (k, v) in headers {
        builder = builder.header(k.as_str(), v.as_str());
    }
    if let Some(body) = body {
        builder = builder.json(&body);
    }
    builder
}

/// Turns a non-2xx answer into [`Error::UpstreamStatus`], consuming the body.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    Err(Error::upstream_status(status.as_u16(), &text))
}
