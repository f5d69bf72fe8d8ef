use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, State, rejection::FormRejection},
    http::Method,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tower_http::trace::TraceLayer;
use tracing::debug;

use scribe_db::Database;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::guard::{self, Guarded};
use crate::outcome::Outcome;
use crate::session::{SESSION_COOKIE, Session, SessionKeys};
use crate::{auth, blog, views};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionKeys,
}

/// The blog's route table.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", get(register).post(register))
        .route("/login", get(login).post(login))
        .route("/logout", get(logout));

    Router::new()
        .route("/", get(index))
        .route("/create", get(create).post(create))
        .route("/{id}/update", get(update).post(update))
        .route("/{id}/delete", post(delete))
        .route("/hello", get(hello))
        .nest("/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A urlencoded body. A missing or unreadable body counts as an empty form so
/// guards still decide what an anonymous visitor sees.
type FormData = Result<Form<HashMap<String, String>>, FormRejection>;

fn fields(form: FormData) -> HashMap<String, String> {
    form.map(|Form(fields)| fields).unwrap_or_default()
}

async fn register(State(state): State<AppState>, method: Method, jar: CookieJar, form: FormData) -> Response {
    serve(state, method, jar, fields(form), auth::register_endpoint(), ()).await
}

async fn login(State(state): State<AppState>, method: Method, jar: CookieJar, form: FormData) -> Response {
    serve(state, method, jar, fields(form), auth::login_endpoint(), ()).await
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    serve(state, Method::GET, jar, HashMap::new(), auth::logout_endpoint(), ()).await
}

async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    serve(state, Method::GET, jar, HashMap::new(), blog::index_endpoint(), ()).await
}

async fn create(State(state): State<AppState>, method: Method, jar: CookieJar, form: FormData) -> Response {
    serve(state, method, jar, fields(form), blog::create_endpoint(), ()).await
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    method: Method,
    jar: CookieJar,
    form: FormData,
) -> Response {
    serve(state, method, jar, fields(form), blog::update_endpoint(), id).await
}

async fn delete(State(state): State<AppState>, Path(id): Path<i64>, jar: CookieJar) -> Response {
    serve(state, Method::POST, jar, HashMap::new(), blog::delete_endpoint(), id).await
}

async fn hello() -> &'static str {
    "Hello, World!"
}

enum Reply {
    Page(String),
    Redirect(String),
}

/// Run an endpoint on the blocking pool and turn its outcome into a response.
///
/// The request context, and with it the request's connection, lives and
/// dies inside the blocking task.
async fn serve<A: Send + 'static>(
    state: AppState,
    method: Method,
    jar: CookieJar,
    form: HashMap<String, String>,
    endpoint: Guarded<A>,
    args: A,
) -> Response {
    let session = state
        .sessions
        .load(jar.get(SESSION_COOKIE).map(|cookie| cookie.value()));
    let db = state.db.clone();

    let joined = tokio::task::spawn_blocking(move || {
        let mut ctx = RequestContext::new(db, method, form, session);
        let result = guard::dispatch(&mut ctx, &endpoint, args).map(|outcome| match outcome {
            Outcome::Render(page) => {
                let flashes = ctx.take_flashes();
                Reply::Page(views::render(&page, ctx.user(), &flashes))
            }
            Outcome::Redirect(target) => {
                debug!("{} redirects to {}", endpoint.name(), target.name());
                Reply::Redirect(target.url())
            }
        });
        (result, ctx.into_session())
    })
    .await;

    let (result, session) = match joined {
        Ok(done) => done,
        Err(e) => return AppError::Task(e.to_string()).into_response(),
    };

    let jar = match store_session(jar, &state.sessions, &session) {
        Ok(jar) => jar,
        Err(e) => return e.into_response(),
    };

    match result {
        Ok(Reply::Page(html)) => (jar, Html(html)).into_response(),
        Ok(Reply::Redirect(url)) => (jar, Redirect::to(&url)).into_response(),
        Err(e) => (jar, e).into_response(),
    }
}

fn store_session(jar: CookieJar, keys: &SessionKeys, session: &Session) -> Result<CookieJar, AppError> {
    if !session.is_modified() {
        return Ok(jar);
    }
    if session.is_empty() {
        return Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")));
    }

    let token = keys.seal(session)?;
    Ok(jar.add(
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    ))
}
