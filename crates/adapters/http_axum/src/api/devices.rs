//! JSON handlers for registered devices.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use haspbridge_app::ports::MessageTransport;
use haspbridge_domain::device::{Device, DeviceKind};

use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a device.
#[derive(Debug, Serialize)]
pub struct DeviceView {
    pub name: String,
    pub kind: DeviceKind,
    pub command_topic: String,
    pub state_topic: Option<String>,
}

impl From<&Device> for DeviceView {
    fn from(device: &Device) -> Self {
        Self {
            name: device.name().to_string(),
            kind: device.kind(),
            command_topic: device.command_topic().to_string(),
            state_topic: device.state_topic().map(str::to_string),
        }
    }
}

/// `GET /api/devices`
pub async fn list<T>(State(state): State<AppState<T>>) -> Json<Vec<DeviceView>>
where
    T: MessageTransport + Send + Sync + 'static,
{
    let devices = state
        .update_service
        .registry()
        .list()
        .iter()
        .map(|device| DeviceView::from(device.as_ref()))
        .collect();
    Json(devices)
}

/// `GET /api/devices/{name}`
pub async fn get<T>(
    State(state): State<AppState<T>>,
    Path(name): Path<String>,
) -> Result<Json<DeviceView>, ApiError>
where
    T: MessageTransport + Send + Sync + 'static,
{
    let device = state.update_service.registry().lookup(&name)?;
    Ok(Json(DeviceView::from(device.as_ref())))
}
