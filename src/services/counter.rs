//! Campaign increment: request payload resolution and the atomic store call.

use serde_json::Value;

use crate::errors::AppError;
use crate::models::campaign::{CampaignName, IncrementOutcome};
use crate::store::CounterStore;

/// Resolve the campaign for an increment request.
///
/// Precedence: non-empty query parameter, then the `campaign` field of a
/// JSON body, then a form-encoded body, then [`CampaignName::DEFAULT`].
/// Malformed bodies never fail the request.
pub fn resolve_campaign(query: Option<&str>, body: &[u8]) -> CampaignName {
    if let Some(name) = query.filter(|q| !q.is_empty()) {
        return CampaignName::new(Some(name));
    }
    CampaignName::new(campaign_from_body(body).as_deref())
}

/// Extract the campaign from a request body without validating it further.
fn campaign_from_body(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    // A body that parses as JSON is never re-read as a form.
    match serde_json::from_slice::<Value>(body) {
        // Falsy values (`0`, `false`, `""`, `null`) fall back to the default.
        Ok(json) => match json.get("campaign")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        },
        Err(_) => url::form_urlencoded::parse(body)
            .find(|(key, _)| key == "campaign")
            .map(|(_, value)| value.into_owned()),
    }
}

/// Record one event for `campaign`.
pub async fn increment(
    store: &dyn CounterStore,
    campaign: &CampaignName,
) -> Result<IncrementOutcome, AppError> {
    let outcome = store.increment(campaign).await?;
    tracing::debug!(
        campaign = %campaign,
        campaign_count = outcome.campaign_count,
        total_count = outcome.total_count,
        "Campaign incremented"
    );
    Ok(outcome)
}
