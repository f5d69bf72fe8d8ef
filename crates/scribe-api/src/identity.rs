use scribe_db::queries;
use scribe_types::models::User;

use crate::context::RequestContext;
use crate::error::AppError;

/// Resolve the session's user id into the context's identity slot.
///
/// Runs once, before any guard or handler. A user id that no longer exists
/// leaves the request anonymous.
pub fn load_logged_in_user(ctx: &mut RequestContext) -> Result<(), AppError> {
    let user_id = ctx.session().user_id();
    let user = match user_id {
        None => None,
        Some(id) => queries::get_user_by_id(ctx.db()?, id)?.map(User::from),
    };
    ctx.set_user(user);
    Ok(())
}
