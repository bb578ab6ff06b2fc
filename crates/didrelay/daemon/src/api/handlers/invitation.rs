//! Invitation handler

use crate::api::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use didrelay_oob::{AttachmentPayload, Invitation, InvitationOptions};
use didrelay_types::MediateRequest;
use serde::Deserialize;

/// Description of the embedded mediation request attachment.
pub const MEDIATION_REQUEST_DESCRIPTION: &str = "mediation request";

/// Query parameters of `GET /invitation`
#[derive(Debug, Default, Deserialize)]
pub struct InvitationQuery {
    pub label: Option<String>,
    pub goal_code: Option<String>,
    pub goal: Option<String>,
    /// Comma-separated profiles. Present but empty means none.
    pub accept: Option<String>,
    /// Overrides the configured mediation attachment setting.
    pub mediation: Option<bool>,
}

/// Build one out-of-band invitation for this router
pub async fn create_invitation(
    State(state): State<AppState>,
    query: Result<Query<InvitationQuery>, QueryRejection>,
) -> ApiResult<Json<Invitation>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let defaults = &state.invitation;

    let mut options = InvitationOptions {
        label: non_empty(query.label).unwrap_or_else(|| defaults.label.clone()),
        goal_code: non_empty(query.goal_code).or_else(|| defaults.goal_code.clone()),
        goal: non_empty(query.goal).or_else(|| defaults.goal.clone()),
        accept: query.accept.as_deref().map(parse_profiles),
        ..Default::default()
    };

    if query.mediation.unwrap_or(defaults.embed_mediation_request) {
        options
            .attachments
            .push(AttachmentPayload::json_as_base64(&MediateRequest::new())?);
        options.attachment_description = Some(MEDIATION_REQUEST_DESCRIPTION.to_string());
        options.attachment_mime_type = Some("application/json".to_string());
    }

    let invitation = state.factory.create(options)?;
    tracing::info!(
        invitation_id = %invitation.id(),
        attachments = invitation.attachments().len(),
        "Issued invitation"
    );

    Ok(Json(invitation))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_profiles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profiles() {
        assert_eq!(
            parse_profiles("didcomm/v2, didcomm/aip2;env=rfc19"),
            vec!["didcomm/v2", "didcomm/aip2;env=rfc19"]
        );
        assert!(parse_profiles("").is_empty());
        assert!(parse_profiles(" , ").is_empty());
    }

    #[test]
    fn test_blank_values_fall_back() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("Mediator".into())).as_deref(), Some("Mediator"));
    }
}
