//! A minimal routing demo: static pages, typed path segments, a catch-all
//! path and an optional-name greeting.

use axum::{
    Router,
    extract::Path,
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
};
use html_escape::encode_text;
use tower_http::trace::TraceLayer;

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/user/{username}", get(show_user_profile))
        .route("/post/{post_id}", get(show_post))
        .route("/path/{*subpath}", get(show_subpath))
        .route("/hello", get(|| async { Redirect::permanent("/hello/") }))
        .route("/hello/", get(hello))
        .route("/hello/{name}", get(hello_name))
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html("Index Page")
}

async fn show_user_profile(Path(username): Path<String>) -> Html<String> {
    Html(format!("User {}", encode_text(&username)))
}

/// Only unsigned integers match; anything else is not this route.
async fn show_post(Path(post_id): Path<String>) -> Result<Html<String>, StatusCode> {
    let post_id: u64 = post_id.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(Html(format!("Post {post_id}")))
}

async fn show_subpath(Path(subpath): Path<String>) -> Html<String> {
    Html(format!("Subpath {}", encode_text(&subpath)))
}

async fn hello() -> Html<String> {
    Html(greeting(None))
}

async fn hello_name(Path(name): Path<String>) -> Html<String> {
    Html(greeting(Some(&name)))
}

fn greeting(name: Option<&str>) -> String {
    let heading = match name.filter(|n| !n.is_empty()) {
        Some(name) => format!("Hello {}!", encode_text(name)),
        None => "Hello, World!".to_string(),
    };
    format!("<!doctype html>\n<title>Hello from Scribe</title>\n<h1>{heading}</h1>\n")
}
