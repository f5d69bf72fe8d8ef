mod common;

use axum::http::{Method, StatusCode};

use scribe_api::context::RequestContext;
use scribe_api::error::AppError;
use scribe_api::guard::{self, Guarded, login_required};
use scribe_api::outcome::{Endpoint, Outcome, Page};
use scribe_api::{auth, blog};

use common::{context, count, database, register};

fn touch_db_twice_then_fail(ctx: &mut RequestContext, (): ()) -> Result<Outcome, AppError> {
    let first: *const rusqlite::Connection = ctx.db()?;
    let second: *const rusqlite::Connection = ctx.db()?;
    assert_eq!(first, second);
    Err(AppError::NotFound("boom".to_string()))
}

fn must_not_run(_ctx: &mut RequestContext, (): ()) -> Result<Outcome, AppError> {
    panic!("guarded handler body ran");
}

#[test]
fn one_connection_per_request_closed_even_on_error() {
    let (_dir, db) = database();
    let alice = register(&db, "alice", "pw123");
    let before = db.stats();

    let endpoint = Guarded::new("test.fail", touch_db_twice_then_fail);
    let mut ctx = context(&db, Method::GET, &[], Some(alice));
    let result = guard::dispatch(&mut ctx, &endpoint, ());

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(!ctx.has_connection());
    let after = db.stats();
    // identity lookup and handler share the same connection
    assert_eq!(after.opened - before.opened, 1);
    assert_eq!(after.closed - before.closed, 1);

    ctx.teardown();
    drop(ctx);
    assert_eq!(db.stats().closed - before.closed, 1);
}

#[test]
fn anonymous_request_never_opens_a_connection_for_guarded_handler() {
    let (_dir, db) = database();
    let before = db.stats();

    let endpoint = Guarded::new("test.guarded", must_not_run).with(login_required);
    let mut ctx = context(&db, Method::POST, &[], None);
    let outcome = guard::dispatch(&mut ctx, &endpoint, ()).unwrap();

    assert_eq!(outcome, Outcome::Redirect(Endpoint::Login));
    assert_eq!(db.stats(), before);
}

#[test]
fn guarded_endpoint_keeps_its_identity() {
    let endpoint = blog::update_endpoint();

    assert_eq!(endpoint.name(), "blog.update");
    assert_eq!(endpoint.guards().len(), 1);
}

#[test]
fn register_twice_reports_duplicate() {
    let (_dir, db) = database();
    register(&db, "alice", "pw123");

    let mut ctx = context(
        &db,
        Method::POST,
        &[("username", "alice"), ("password", "other")],
        None,
    );
    let outcome = guard::dispatch(&mut ctx, &auth::register_endpoint(), ()).unwrap();

    assert_eq!(outcome, Outcome::Render(Page::Register));
    assert_eq!(ctx.flashes(), ["User alice is already registered."]);
    assert_eq!(count(&db, "user"), 1);
}

#[test]
fn register_validates_in_order() {
    let (_dir, db) = database();

    let mut ctx = context(&db, Method::POST, &[("username", ""), ("password", "")], None);
    guard::dispatch(&mut ctx, &auth::register_endpoint(), ()).unwrap();
    assert_eq!(ctx.flashes(), ["Username is required."]);

    let mut ctx = context(&db, Method::POST, &[("username", "alice")], None);
    guard::dispatch(&mut ctx, &auth::register_endpoint(), ()).unwrap();
    assert_eq!(ctx.flashes(), ["Password is required"]);

    assert_eq!(count(&db, "user"), 0);
}

#[test]
fn password_is_stored_hashed() {
    let (_dir, db) = database();
    register(&db, "alice", "pw123");

    let conn = db.connect().unwrap();
    let stored: String = conn
        .query_row("SELECT password FROM user WHERE username = 'alice'", [], |row| {
            row.get("password")
        })
        .unwrap();
    db.release(conn).unwrap();

    assert_ne!(stored, "pw123");
    assert!(stored.starts_with("$argon2"));
}

#[test]
fn register_get_renders_form() {
    let (_dir, db) = database();
    let mut ctx = context(&db, Method::GET, &[], None);

    let outcome = guard::dispatch(&mut ctx, &auth::register_endpoint(), ()).unwrap();

    assert_eq!(outcome, Outcome::Render(Page::Register));
    assert!(ctx.flashes().is_empty());
}

#[test]
fn wrong_password_never_authenticates() {
    let (_dir, db) = database();
    register(&db, "alice", "pw123");

    for attempt in ["", "pw1234", "PW123"] {
        let mut ctx = context(
            &db,
            Method::POST,
            &[("username", "alice"), ("password", attempt)],
            None,
        );
        let outcome = guard::dispatch(&mut ctx, &auth::login_endpoint(), ()).unwrap();

        assert_eq!(outcome, Outcome::Render(Page::Login));
        assert_eq!(ctx.flashes(), ["Incorrect password."]);
        assert_eq!(ctx.into_session().user_id(), None);
    }
}

#[test]
fn unknown_username_is_reported() {
    let (_dir, db) = database();

    let mut ctx = context(
        &db,
        Method::POST,
        &[("username", "nobody"), ("password", "pw")],
        None,
    );
    guard::dispatch(&mut ctx, &auth::login_endpoint(), ()).unwrap();

    assert_eq!(ctx.flashes(), ["Incorrect username."]);
}

#[test]
fn login_replaces_session_user() {
    let (_dir, db) = database();
    let alice = register(&db, "alice", "pw123");
    let bob = register(&db, "bob", "hunter2");

    let mut ctx = context(
        &db,
        Method::POST,
        &[("username", "bob"), ("password", "hunter2")],
        Some(alice),
    );
    let outcome = guard::dispatch(&mut ctx, &auth::login_endpoint(), ()).unwrap();

    assert_eq!(outcome, Outcome::Redirect(Endpoint::Index));
    assert_eq!(ctx.into_session().user_id(), Some(bob));
}

#[test]
fn logout_clears_session() {
    let (_dir, db) = database();
    let alice = register(&db, "alice", "pw123");

    let mut ctx = context(&db, Method::GET, &[], Some(alice));
    let outcome = guard::dispatch(&mut ctx, &auth::logout_endpoint(), ()).unwrap();

    assert_eq!(outcome, Outcome::Redirect(Endpoint::Index));
    let session = ctx.into_session();
    assert!(session.is_empty());
    assert!(session.is_modified());
}

#[test]
fn stale_session_user_is_anonymous() {
    let (_dir, db) = database();

    let mut ctx = context(&db, Method::GET, &[], Some(404));
    let outcome = guard::dispatch(&mut ctx, &blog::create_endpoint(), ()).unwrap();

    assert_eq!(outcome, Outcome::Redirect(Endpoint::Login));
    assert!(ctx.user().is_none());
}

#[test]
fn update_by_non_author_is_forbidden() {
    let (_dir, db) = database();
    let alice = register(&db, "alice", "pw123");
    let bob = register(&db, "bob", "hunter2");

    let mut ctx = context(&db, Method::POST, &[("title", "mine"), ("body", "")], Some(alice));
    guard::dispatch(&mut ctx, &blog::create_endpoint(), ()).unwrap();

    for method in [Method::GET, Method::POST] {
        let mut ctx = context(&db, method, &[("title", "stolen"), ("body", "")], Some(bob));
        let result = guard::dispatch(&mut ctx, &blog::update_endpoint(), 1);
        assert!(matches!(result, Err(AppError::Forbidden)), "got {result:?}");
    }

    let mut ctx = context(&db, Method::POST, &[], Some(bob));
    let result = guard::dispatch(&mut ctx, &blog::delete_endpoint(), 1);
    assert!(matches!(result, Err(AppError::Forbidden)));
    assert_eq!(count(&db, "post"), 1);
}

#[test]
fn missing_post_is_not_found_before_author_check() {
    let (_dir, db) = database();
    let bob = register(&db, "bob", "hunter2");

    let mut ctx = context(&db, Method::GET, &[], Some(bob));
    let result = guard::dispatch(&mut ctx, &blog::update_endpoint(), 99);
    match result {
        Err(AppError::NotFound(message)) => assert_eq!(message, "Post id 99 doesn't exist."),
        other => panic!("expected NotFound, got {other:?}"),
    }

    let mut ctx = context(&db, Method::POST, &[], Some(bob));
    let result = guard::dispatch(&mut ctx, &blog::delete_endpoint(), 99);
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn get_post_returns_the_row() {
    let (_dir, db) = database();
    let alice = register(&db, "alice", "pw123");
    let bob = register(&db, "bob", "hunter2");
    let mut ctx = context(&db, Method::POST, &[("title", "Hi"), ("body", "x")], Some(alice));
    guard::dispatch(&mut ctx, &blog::create_endpoint(), ()).unwrap();

    let mut ctx = context(&db, Method::GET, &[], Some(bob));
    let post = blog::get_post(&mut ctx, 1, false).unwrap();
    ctx.teardown();

    assert_eq!(post.title, "Hi");
    assert_eq!(post.username, "alice");
    assert_eq!(post.author_id, alice);
}

#[test]
fn create_without_its_guard_is_a_server_error() {
    let (_dir, db) = database();

    let mut ctx = context(&db, Method::POST, &[("title", "Hi"), ("body", "x")], None);
    let result = guard::dispatch(&mut ctx, &Guarded::new("blog.create", blog::create), ());

    match result {
        Err(e @ AppError::MissingUser(_)) => assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR),
        other => panic!("expected MissingUser, got {other:?}"),
    }
    assert_eq!(count(&db, "post"), 0);
}

#[test]
fn empty_title_is_rejected_without_insert() {
    let (_dir, db) = database();
    let alice = register(&db, "alice", "pw123");

    let mut ctx = context(&db, Method::POST, &[("title", ""), ("body", "text")], Some(alice));
    let outcome = guard::dispatch(&mut ctx, &blog::create_endpoint(), ()).unwrap();

    assert_eq!(outcome, Outcome::Render(Page::Create));
    assert_eq!(ctx.flashes(), ["Title is required"]);
    assert_eq!(count(&db, "post"), 0);
}

#[test]
fn update_with_empty_title_keeps_post() {
    let (_dir, db) = database();
    let alice = register(&db, "alice", "pw123");
    let mut ctx = context(&db, Method::POST, &[("title", "Hi"), ("body", "x")], Some(alice));
    guard::dispatch(&mut ctx, &blog::create_endpoint(), ()).unwrap();

    let mut ctx = context(&db, Method::POST, &[("title", ""), ("body", "y")], Some(alice));
    let outcome = guard::dispatch(&mut ctx, &blog::update_endpoint(), 1).unwrap();

    match outcome {
        Outcome::Render(Page::Update { post }) => assert_eq!(post.title, "Hi"),
        other => panic!("expected edit form, got {other:?}"),
    }
    assert_eq!(ctx.flashes(), ["Title is required"]);
}

#[test]
fn flashes_left_unrendered_ride_in_the_session() {
    let (_dir, db) = database();
    let mut ctx = context(&db, Method::POST, &[("username", "")], None);
    guard::dispatch(&mut ctx, &auth::register_endpoint(), ()).unwrap();

    let session = ctx.into_session();
    assert!(!session.is_empty());

    let ctx = RequestContext::new(db.clone(), Method::GET, Default::default(), session);
    assert_eq!(ctx.flashes(), ["Username is required."]);
}
