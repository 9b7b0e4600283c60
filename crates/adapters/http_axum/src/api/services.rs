//! Service-call handlers for the panel update actions.
//!
//! Missing fields deserialize to empty values so that the service, not the
//! JSON extractor, reports them as validation errors.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use haspbridge_app::ports::MessageTransport;
use haspbridge_domain::command::{UpdateColors, UpdateMessage};
use haspbridge_domain::font::FontSize;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `update_colors`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateColorsRequest {
    pub node_name: String,
    pub button_id: String,
    pub background: Option<String>,
    pub foreground: Option<String>,
}

impl From<UpdateColorsRequest> for UpdateColors {
    fn from(req: UpdateColorsRequest) -> Self {
        Self {
            node_name: req.node_name,
            button_id: req.button_id,
            background: req.background,
            foreground: req.foreground,
        }
    }
}

/// Request body for `update_message`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UpdateMessageRequest {
    pub node_name: String,
    pub button_id: String,
    pub message: String,
    pub font_size: Option<i64>,
    pub update_font: bool,
}

impl Default for UpdateMessageRequest {
    fn default() -> Self {
        Self {
            node_name: String::new(),
            button_id: String::new(),
            message: String::new(),
            font_size: None,
            update_font: true,
        }
    }
}

impl TryFrom<UpdateMessageRequest> for UpdateMessage {
    type Error = ApiError;

    /// Required fields are checked before the font size range.
    fn try_from(req: UpdateMessageRequest) -> Result<Self, Self::Error> {
        let requested_font = req.font_size;
        let mut command = Self {
            node_name: req.node_name,
            button_id: req.button_id,
            message: req.message,
            font_size: None,
            update_font: req.update_font,
        };
        let checked = command
            .validate()
            .and_then(|()| requested_font.map(FontSize::try_from).transpose());
        match checked {
            Ok(font_size) => {
                command.font_size = font_size;
                Ok(command)
            }
            Err(err) => {
                tracing::error!(error = %err, "update_message rejected");
                Err(err.into())
            }
        }
    }
}

/// `POST /api/services/update_colors`
pub async fn update_colors<T>(
    State(state): State<AppState<T>>,
    Json(req): Json<UpdateColorsRequest>,
) -> Result<StatusCode, ApiError>
where
    T: MessageTransport + Send + Sync + 'static,
{
    state.update_service.update_colors(req.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/services/update_message`
pub async fn update_message<T>(
    State(state): State<AppState<T>>,
    Json(req): Json<UpdateMessageRequest>,
) -> Result<StatusCode, ApiError>
where
    T: MessageTransport + Send + Sync + 'static,
{
    let command = UpdateMessage::try_from(req)?;
    state.update_service.update_message(command).await?;
    Ok(StatusCode::NO_CONTENT)
}
