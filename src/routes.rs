use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, get_service},
    Router,
};
use htmlescape::encode_minimal;
use tower_http::services::{ServeDir, ServeFile};
use tracing::debug;

use crate::dates::{format_long_date, today};
use crate::home::render_home;
use crate::hot_reload::ws_handler;
use crate::layout::render_with_layout;
use crate::state::{AppState, RouterState};

pub fn router(state: RouterState) -> Router {
    let static_root = state.app_state.content_dir.join("static");
    let static_dir = get_service(ServeDir::new(&static_root));
    let favicon_ico = get_service(ServeFile::new(static_root.join("favicon.ico")));

    Router::new()
        .route("/", get(homepage))
        .route("/{*slug}", get(render_post))
        .nest_service("/static", static_dir)
        .route_service("/favicon.ico", favicon_ico)
        .route("/ws", get(ws_handler))
        .with_state(state)
}

async fn homepage(State(state): State<Arc<AppState>>) -> Html<String> {
    let content = state.content.read().await;
    let body = render_home(&content.site, &content.posts, today());
    Html(render_with_layout(
        &content.layout_html,
        &content.site.author,
        &body,
        state.is_development,
    ))
}

async fn render_post(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Html<String>) {
    let content = state.content.read().await;

    let Some(post) = content.find_internal(&slug) else {
        debug!(%slug, "No internal post for slug");
        let body = content.not_found_html.replace("{{slug}}", &encode_minimal(&slug));
        let page = render_with_layout(&content.layout_html, "Not found", &body, state.is_development);
        return (StatusCode::NOT_FOUND, Html(page));
    };

    let body = format!(
        concat!(
            "<article class=\"post\">",
            "<a href=\"/\" data-link=\"internal\">&larr; {}</a>",
            "<h1>{}</h1>",
            "<p style=\"font-size: smaller; color: #888;\"><time datetime=\"{}\">{}</time></p>",
            "{}",
            "</article>"
        ),
        encode_minimal(&content.site.author),
        encode_minimal(&post.title),
        post.edited_at.format("%Y-%m-%d"),
        format_long_date(post.edited_at),
        post.body.as_deref().unwrap_or_default()
    );

    let page = render_with_layout(&content.layout_html, &post.title, &body, state.is_development);
    (StatusCode::OK, Html(page))
}
