use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use tera::{Context, Tera};
use tracing::{error, warn};

const WIDGET_TEMPLATE: &str = "widget.html";

#[derive(Clone)]
pub struct WidgetState {
    templates: Arc<Tera>,
    api_url: String,
}

impl WidgetState {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            templates: init_templates(),
            api_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn init_templates() -> Arc<Tera> {
    let mut tera = Tera::default();
    if let Err(template_error) =
        tera.add_raw_template(WIDGET_TEMPLATE, include_str!("../../../templates/widget.html"))
    {
        warn!(
            event_name = "server.widget.template_invalid",
            error = %template_error,
            "embedded widget template failed to parse"
        );
    }
    Arc::new(tera)
}

pub fn router(state: WidgetState) -> Router {
    Router::new().route("/widget/{store_id}", get(chat_widget)).with_state(state)
}

/// Embeddable chat widget bound to one store and the public API URL.
pub async fn chat_widget(
    Path(store_id): Path<i64>,
    State(state): State<WidgetState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let mut context = Context::new();
    context.insert("store_id", &store_id);
    context.insert("api_url", &state.api_url);

    state.templates.render(WIDGET_TEMPLATE, &context).map(Html).map_err(|render_error| {
        error!(
            event_name = "server.widget.render_failed",
            store_id,
            error = %render_error,
            "widget template render failed"
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Widget unavailable</h1>".to_string()))
    })
}

#[cfg(test)]
mod tests {
    use axum::extract::{Path, State};

    use super::{chat_widget, WidgetState};

    #[tokio::test]
    async fn widget_is_bound_to_store_and_public_url() {
        let state = WidgetState::new("https://kilo.up.railway.app/");

        let html = chat_widget(Path(42), State(state)).await.expect("render").0;

        assert!(html.contains("const storeId = 42;"));
        assert!(html.contains(r#"const apiUrl = "https://kilo.up.railway.app";"#));
        assert!(html.contains("Chat with KILO"));
    }
}
