use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Deck new notes land in before being moved to their book deck
pub const STAGING_DECK: &str = "Default";

pub struct AnkiConnectClient {
    base_url: String,
    client: reqwest::Client,
    field_names: Mutex<HashMap<String, Vec<String>>>,
}

impl AnkiConnectClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
            field_names: Mutex::new(HashMap::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if AnkiConnect is available
    pub async fn check_connection(&self) -> Result<u32> {
        let response: AnkiResponse<u32> = self.invoke("version", json!({})).await?;
        response.into_result()
    }

    /// Get list of model (note type) names
    pub async fn model_names(&self) -> Result<Vec<String>> {
        let response: AnkiResponse<Vec<String>> = self.invoke("modelNames", json!({})).await?;
        response.into_result()
    }

    /// Field names of a model, `None` if the model does not exist
    pub async fn field_names(&self, model: &str) -> Result<Option<Vec<String>>> {
        if let Some(names) = self.cached_field_names(model) {
            return Ok(Some(names));
        }

        if !self.model_names().await?.iter().any(|name| name == model) {
            return Ok(None);
        }

        let response: AnkiResponse<Vec<String>> = self
            .invoke("modelFieldNames", json!({ "modelName": model }))
            .await?;
        let names = response.into_result()?;

        if let Ok(mut cache) = self.field_names.lock() {
            cache.insert(model.to_string(), names.clone());
        }
        Ok(Some(names))
    }

    /// Add a note; `values` are positional, one per model field
    pub async fn add_note(&self, model: &str, values: &[String], tags: &[String]) -> Result<u64> {
        let names = self
            .field_names(model)
            .await?
            .with_context(|| format!("Note type {model:?} does not exist"))?;

        let params = add_note_params(model, &names, values, tags);
        let response: AnkiResponse<u64> = self.invoke("addNote", params).await?;
        response
            .into_result()
            .with_context(|| format!("Failed to add note to {model:?}"))
    }

    /// Card ids generated for a note
    pub async fn find_cards(&self, note_id: u64) -> Result<Vec<u64>> {
        let response: AnkiResponse<Vec<u64>> = self
            .invoke("findCards", json!({ "query": format!("nid:{note_id}") }))
            .await?;
        response.into_result()
    }

    /// Move cards into a deck; AnkiConnect creates it when missing
    pub async fn change_deck(&self, cards: &[u64], deck: &str) -> Result<()> {
        let response: AnkiResponse<serde_json::Value> = self
            .invoke("changeDeck", json!({ "cards": cards, "deck": deck }))
            .await?;
        response
            .into_unit()
            .with_context(|| format!("Failed to move cards to {deck:?}"))
    }

    fn cached_field_names(&self, model: &str) -> Option<Vec<String>> {
        self.field_names.lock().ok()?.get(model).cloned()
    }

    /// Invoke an AnkiConnect API action
    async fn invoke<T>(&self, action: &str, params: serde_json::Value) -> Result<AnkiResponse<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request = AnkiRequest {
            action: action.to_string(),
            version: 6,
            params,
        };

        tracing::trace!("AnkiConnect {}", action);
        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send {action} request to AnkiConnect"))?;

        response
            .json::<AnkiResponse<T>>()
            .await
            .with_context(|| format!("Failed to parse AnkiConnect {action} response"))
    }
}

fn add_note_params(
    model: &str,
    names: &[String],
    values: &[String],
    tags: &[String],
) -> serde_json::Value {
    let fields: serde_json::Map<String, serde_json::Value> = names
        .iter()
        .zip(values)
        .map(|(name, value)| (name.clone(), json!(value)))
        .collect();

    json!({
        "note": {
            "deckName": STAGING_DECK,
            "modelName": model,
            "fields": fields,
            "tags": tags,
            "options": { "allowDuplicate": true }
        }
    })
}

#[derive(Serialize)]
struct AnkiRequest {
    action: String,
    version: u32,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> AnkiResponse<T> {
    fn into_result(self) -> Result<T> {
        if let Some(error) = self.error {
            anyhow::bail!("AnkiConnect error: {}", error);
        }

        self.result.context("AnkiConnect returned null result")
    }

    /// For actions whose success result is `null`
    fn into_unit(self) -> Result<()> {
        match self.error {
            Some(error) => anyhow::bail!("AnkiConnect error: {}", error),
            None => Ok(()),
        }
    }
}
