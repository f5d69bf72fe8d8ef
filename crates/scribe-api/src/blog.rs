use tracing::info;

use scribe_db::queries;
use scribe_types::models::Post;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::guard::{Guarded, login_required};
use crate::outcome::{Endpoint, Outcome, Page};

pub fn index_endpoint() -> Guarded<()> {
    Guarded::new("blog.index", index)
}

pub fn create_endpoint() -> Guarded<()> {
    Guarded::new("blog.create", create).with(login_required)
}

pub fn update_endpoint() -> Guarded<i64> {
    Guarded::new("blog.update", update).with(login_required)
}

pub fn delete_endpoint() -> Guarded<i64> {
    Guarded::new("blog.delete", delete).with(login_required)
}

pub fn index(ctx: &mut RequestContext, (): ()) -> Result<Outcome, AppError> {
    let posts = queries::list_posts(ctx.db()?)?;
    Ok(Outcome::Render(Page::Index { posts }))
}

pub fn create(ctx: &mut RequestContext, (): ()) -> Result<Outcome, AppError> {
    if !ctx.is_post() {
        return Ok(Outcome::Render(Page::Create));
    }

    let title = ctx.field("title").to_string();
    let body = ctx.field("body").to_string();

    if title.is_empty() {
        ctx.flash("Title is required");
        return Ok(Outcome::Render(Page::Create));
    }

    let author_id = current_user_id(ctx, "blog.create")?;
    let id = queries::create_post(ctx.db()?, &title, &body, author_id)?;
    info!("User {} created post {}", author_id, id);
    Ok(Outcome::Redirect(Endpoint::Index))
}

pub fn update(ctx: &mut RequestContext, id: i64) -> Result<Outcome, AppError> {
    // Checked on every method so a non-owner never sees the edit form
    let post = get_post(ctx, id, true)?;

    if !ctx.is_post() {
        return Ok(Outcome::Render(Page::Update { post }));
    }

    let title = ctx.field("title").to_string();
    let body = ctx.field("body").to_string();

    if title.is_empty() {
        ctx.flash("Title is required");
        return Ok(Outcome::Render(Page::Update { post }));
    }

    queries::update_post(ctx.db()?, id, &title, &body)?;
    info!("Post {} updated", id);
    Ok(Outcome::Redirect(Endpoint::Index))
}

pub fn delete(ctx: &mut RequestContext, id: i64) -> Result<Outcome, AppError> {
    get_post(ctx, id, true)?;
    queries::delete_post(ctx.db()?, id)?;
    info!("Post {} deleted", id);
    Ok(Outcome::Redirect(Endpoint::Index))
}

/// Fetch a post, optionally requiring the current user to be its author.
///
/// A missing post is `NotFound` before authorship is ever looked at.
pub fn get_post(ctx: &mut RequestContext, id: i64, check_author: bool) -> Result<Post, AppError> {
    let post = queries::get_post(ctx.db()?, id)?
        .ok_or_else(|| AppError::NotFound(format!("Post id {id} doesn't exist.")))?;

    if check_author && ctx.user().map(|u| u.id) != Some(post.author_id) {
        return Err(AppError::Forbidden);
    }

    Ok(post)
}

fn current_user_id(ctx: &RequestContext, handler: &'static str) -> Result<i64, AppError> {
    // login_required runs first; no user here means the guard was left off
    ctx.user().map(|u| u.id).ok_or(AppError::MissingUser(handler))
}
