mod client;

pub use client::{AnkiConnectClient, STAGING_DECK};

use anyhow::Result;
use async_trait::async_trait;
use shiori_core::notes::{CreatedNote, NoteStore};

#[async_trait]
impl NoteStore for AnkiConnectClient {
    async fn model_field_names(&self, model: &str) -> Result<Option<Vec<String>>> {
        self.field_names(model).await
    }

    async fn add_note(&self, model: &str, fields: &[String], tags: &[String]) -> Result<CreatedNote> {
        let note_id = AnkiConnectClient::add_note(self, model, fields, tags).await?;
        let card_ids = self.find_cards(note_id).await?;
        tracing::debug!("Added note {} with {} cards", note_id, card_ids.len());
        Ok(CreatedNote { note_id, card_ids })
    }

    async fn change_deck(&self, card_ids: &[u64], deck: &str) -> Result<()> {
        if card_ids.is_empty() {
            return Ok(());
        }
        AnkiConnectClient::change_deck(self, card_ids, deck).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{Value, json};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Minimal AnkiConnect stand-in: one JSON request per connection
    async fn serve(
        respond: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> (String, Arc<Mutex<Vec<Value>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };

                let mut buffer = Vec::new();
                let mut chunk = [0u8; 4096];
                let request = loop {
                    let read = socket.read(&mut chunk).await.unwrap();
                    if read == 0 {
                        break None;
                    }
                    buffer.extend_from_slice(&chunk[..read]);

                    let text = String::from_utf8_lossy(&buffer).to_string();
                    let Some(header_end) = text.find("\r\n\r\n") else {
                        continue;
                    };
                    let length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    let body = &buffer[header_end + 4..];
                    if body.len() >= length {
                        break Some(serde_json::from_slice::<Value>(&body[..length]).unwrap());
                    }
                };

                let Some(request) = request else { continue };
                let reply = respond(&request).to_string();
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    reply.len(),
                    reply
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        (url, seen)
    }

    fn anki(request: &Value) -> Value {
        match request["action"].as_str().unwrap() {
            "modelNames" => json!({ "result": ["Basic", "Kindle Mining"], "error": null }),
            "modelFieldNames" => json!({ "result": ["Sentence", "Source", "Word"], "error": null }),
            "addNote" => json!({ "result": 1700000000000u64, "error": null }),
            "findCards" => json!({ "result": [11, 12], "error": null }),
            "changeDeck" => json!({ "result": null, "error": null }),
            other => json!({ "result": null, "error": format!("unsupported action {other}") }),
        }
    }

    fn actions(seen: &Arc<Mutex<Vec<Value>>>) -> Vec<String> {
        seen.lock()
            .unwrap()
            .iter()
            .map(|r| r["action"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn unknown_model_reads_as_none() {
        let (url, _) = serve(anki).await;
        let client = AnkiConnectClient::new(url);

        assert_eq!(client.model_field_names("Missing").await.unwrap(), None);
        assert_eq!(
            client.model_field_names("Kindle Mining").await.unwrap(),
            Some(vec!["Sentence".to_string(), "Source".to_string(), "Word".to_string()])
        );
    }

    #[tokio::test]
    async fn add_note_then_move_cards() {
        let (url, seen) = serve(anki).await;
        let client = AnkiConnectClient::new(url);
        let store: &dyn NoteStore = &client;

        let fields = vec!["本を借りた".to_string(), "ページ5".to_string(), "借りる".to_string()];
        let created = store
            .add_note("Kindle Mining", &fields, &["こころ".to_string()])
            .await
            .unwrap();
        assert_eq!(created.card_ids, vec![11, 12]);

        store.change_deck(&created.card_ids, "Kindle::こころ").await.unwrap();

        assert_eq!(
            actions(&seen),
            vec!["modelNames", "modelFieldNames", "addNote", "findCards", "changeDeck"]
        );

        let requests = seen.lock().unwrap();
        assert_eq!(requests[2]["params"]["note"]["fields"]["Word"], "借りる");
        assert_eq!(requests[3]["params"]["query"], "nid:1700000000000");
        assert_eq!(requests[4]["params"]["deck"], "Kindle::こころ");
    }

    #[tokio::test]
    async fn anki_errors_surface_with_context() {
        let (url, _) = serve(|request| match request["action"].as_str() {
            Some("changeDeck") => json!({ "result": null, "error": "collection is not available" }),
            _ => anki(request),
        })
        .await;
        let client = AnkiConnectClient::new(url);

        let err = NoteStore::change_deck(&client, &[1], "Kindle").await.unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("collection is not available"));
        assert!(message.contains("Kindle"));
    }

    #[tokio::test]
    async fn unreachable_anki_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = AnkiConnectClient::new(url);
        assert!(client.check_connection().await.is_err());
    }
}
