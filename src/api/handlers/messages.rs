use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::time::Duration;

use crate::api::types::{AddMessageQuery, MessageStateResp};
use crate::app::AppRuntime;
use crate::cache::messages::MessageKey;

fn state_of(app: &AppRuntime, key: MessageKey) -> MessageStateResp {
    let message = app.messages().check(key).map(str::to_string);
    MessageStateResp {
        key,
        active: message.is_some(),
        message,
    }
}

pub async fn get(
    State(app): State<AppRuntime>,
    Path(key): Path<MessageKey>,
) -> Json<MessageStateResp> {
    Json(state_of(&app, key))
}

pub async fn add(
    State(app): State<AppRuntime>,
    Path(key): Path<MessageKey>,
    Query(q): Query<AddMessageQuery>,
) -> Json<MessageStateResp> {
    match q.expire_after_secs {
        Some(secs) => app
            .messages()
            .add_with_expiry(key, Duration::from_secs(secs)),
        None => app.messages().add(key),
    }

    Json(state_of(&app, key))
}

pub async fn clear(
    State(app): State<AppRuntime>,
    Path(key): Path<MessageKey>,
) -> Json<MessageStateResp> {
    app.messages().clear(key);
    Json(state_of(&app, key))
}
