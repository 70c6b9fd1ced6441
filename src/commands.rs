//! Subcommand handlers.

use std::path::Path;

use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use tracing::info;

use paypal_client::{Client, CreateWebhookRequest, WebhookField};

use crate::cli::Commands;

/// Run one subcommand and print its result as JSON on stdout.
pub(crate) async fn handle_command(
    client: &Client,
    command: Commands,
    default_webhook_id: Option<&str>,
    default_anchor_type: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Create { url, event_types } => {
            let request = CreateWebhookRequest::new(url, event_types);
            let webhook = client.create_webhook(&request).await?;
            info!("Created webhook {}", webhook.id);
            print_json(&webhook)
        }
        Commands::Get { webhook_id } => print_json(&client.get_webhook(&webhook_id).await?),
        Commands::Update {
            webhook_id,
            url,
            event_types,
        } => {
            let fields = update_fields(url, event_types)?;
            let webhook = client.update_webhook(&webhook_id, &fields).await?;
            print_json(&webhook)
        }
        Commands::List { anchor_type } => {
            let anchor_type = anchor_type.as_deref().unwrap_or(default_anchor_type);
            print_json(&client.list_webhooks(anchor_type).await?)
        }
        Commands::Delete { webhook_id } => {
            client.delete_webhook(&webhook_id).await?;
            info!("Deleted webhook {}", webhook_id);
            Ok(())
        }
        Commands::Verify {
            webhook_id,
            body,
            headers,
        } => {
            let webhook_id = webhook_id
                .as_deref()
                .or(default_webhook_id)
                .ok_or("no webhook id: pass --webhook-id or set webhooks.webhook_id")?;
            let body = read_body(&body).await?;
            let headers = parse_headers(&headers)?;
            let response = client
                .verify_webhook_signature_raw(&body, &headers, webhook_id)
                .await?;
            print_json(&response)
        }
        Commands::EventTypes => print_json(&client.get_webhook_event_types().await?),
    }
}

/// Patch instructions for `update`, URL first.
fn update_fields(
    url: Option<String>,
    event_types: Vec<String>,
) -> Result<Vec<WebhookField>, Box<dyn std::error::Error>> {
    let mut fields = Vec::new();
    if let Some(url) = url {
        fields.push(WebhookField::replace("/url", url));
    }
    if !event_types.is_empty() {
        fields.push(WebhookField::replace_event_types(event_types));
    }
    if fields.is_empty() {
        return Err("nothing to update: pass --url and/or --event-type".into());
    }
    Ok(fields)
}

/// Parse `NAME:VALUE` pairs into a header map.
fn parse_headers(raw: &[String]) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    for entry in raw {
        let (name, value) = entry
            .split_once(':')
            .ok_or_else(|| format!("invalid header '{}', expected NAME:VALUE", entry))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())?;
        let value = HeaderValue::from_str(value.trim())?;
        headers.append(name, value);
    }
    Ok(headers)
}

async fn read_body(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    Ok(tokio::fs::read(path)
        .await
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let pretty = paypal_json::marshal_pretty(value)?;
    println!("{}", String::from_utf8_lossy(&pretty));
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
