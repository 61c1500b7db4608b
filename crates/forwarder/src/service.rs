use crate::{
    Completion, Reply,
    error::{Error, Result},
    request::{lookup_id, validate},
};
use common::{
    Config, Upstream,
    data::{ChatRequest, ModelEntry},
};
use faststr::FastStr;
use std::collections::HashMap;
use storage::{ModelCache, ModelTable, normalize_model_key};
use tracing::{debug, info, warn};

/// Forwards host chat requests to the upstream API.
///
/// The model table is the only state; it is rebuilt from the remote catalog
/// by [`list_models`](Self::list_models) and on every lookup miss.
pub struct Forwarder<U, C = ModelCache> {
    upstream:     U,
    models:       C,
    name_prefix:  FastStr,
    pinned_model: Option<FastStr>,
}

impl<U: Upstream> Forwarder<U, ModelCache> {
    pub fn new(config: &Config, upstream: U) -> Result<Self> {
        Self::with_table(config, upstream, ModelCache::init())
    }
}

impl<U: Upstream, C: ModelTable> Forwarder<U, C> {
    pub fn with_table(config: &Config, upstream: U, models: C) -> Result<Self> {
        config.validate()?;
        if let Some(model) = &config.pinned_model {
            info!(model = %model, "model pinned, catalog lookup disabled for chat requests");
        }
        Ok(Self {
            upstream,
            models,
            name_prefix: config.name_prefix.clone(),
            pinned_model: config.pinned_model.clone(),
        })
    }

    pub fn models(&self) -> &C {
        &self.models
    }

    /// Display list of the `llm` models. Never fails: on error the table is
    /// emptied and a single [`ModelEntry::unavailable`] entry is returned.
    pub async fn list_models(&self) -> Vec<ModelEntry> {
        match self.refresh_models().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "could not fetch model catalog");
                self.models.clear();
                vec![ModelEntry::unavailable()]
            }
        }
    }

    pub async fn refresh_models(&self) -> Result<Vec<ModelEntry>> {
        let catalog = self.upstream.models().await?;
        let total = catalog.len();

        let mut table = HashMap::new();
        let mut entries = Vec::new();
        for model in catalog.into_iter().filter(|m| m.is_llm()) {
            let id = normalize_model_key(&model.id.to_string());
            entries.push(ModelEntry {
                id:           id.clone(),
                display_name: format!("{}{}", self.name_prefix, model.name).into(),
                remote_name:  model.name.clone(),
            });
            table.insert(id, model.name);
        }
        self.models.replace(table);
        info!(total, llm = entries.len(), "model catalog refreshed");
        Ok(entries)
    }

    pub async fn forward(&self, request: ChatRequest) -> Result<Completion> {
        let model = validate(&request)?;
        let remote_name = match &self.pinned_model {
            Some(pinned) => pinned.clone(),
            None => self.resolve(&lookup_id(model)?).await?,
        };
        let stream_requested = request.stream_requested();
        debug!(model, remote_name = %remote_name, stream_requested, "forwarding chat request");

        let payload = request.into_payload(&remote_name);
        let response = self.upstream.chat_completions(payload).await?;

        if response.is_event_stream() || stream_requested {
            Ok(Completion::Stream(response.into_stream()))
        } else {
            Ok(Completion::Json(response.into_json().await?))
        }
    }

    /// [`forward`](Self::forward) for hosts that show failures to the end
    /// user as text.
    pub async fn relay(&self, request: ChatRequest) -> Reply {
        match self.forward(request).await {
            Ok(completion) => completion.into(),
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "chat request failed");
                Reply::Message(format!("Error: {err}").into())
            }
        }
    }

    async fn resolve(&self, short_id: &str) -> Result<FastStr> {
        if let Some(name) = self.models.get(short_id) {
            return Ok(name);
        }
        debug!(short_id, "model not in table, refreshing catalog");
        self.list_models().await;
        self.models
            .get(short_id)
            .ok_or_else(|| Error::ModelNotFound(short_id.to_owned().into()))
    }
}
