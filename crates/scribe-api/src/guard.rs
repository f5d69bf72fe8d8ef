use tracing::debug;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::identity;
use crate::outcome::{Endpoint, Outcome};

/// A check run before a handler. Returning an outcome short-circuits it.
pub type Guard = fn(&RequestContext) -> Option<Outcome>;

pub type HandlerFn<A> = fn(&mut RequestContext, A) -> Result<Outcome, AppError>;

/// Send anonymous visitors to the login page.
pub fn login_required(ctx: &RequestContext) -> Option<Outcome> {
    match ctx.user() {
        Some(_) => None,
        None => Some(Outcome::Redirect(Endpoint::Login)),
    }
}

/// A handler with the guards that wrap it.
///
/// Guards run in the order they were added. The name stays with the handler
/// for logging and redirects.
pub struct Guarded<A> {
    name: &'static str,
    guards: Vec<Guard>,
    handler: HandlerFn<A>,
}

impl<A> Guarded<A> {
    pub fn new(name: &'static str, handler: HandlerFn<A>) -> Self {
        Self {
            name,
            guards: Vec::new(),
            handler,
        }
    }

    pub fn with(mut self, guard: Guard) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn call(&self, ctx: &mut RequestContext, args: A) -> Result<Outcome, AppError> {
        for guard in &self.guards {
            if let Some(outcome) = guard(ctx) {
                debug!("Guard short-circuited {}", self.name);
                return Ok(outcome);
            }
        }
        (self.handler)(ctx, args)
    }
}

/// Run one request: load the user, apply guards, call the handler, then
/// close the request connection whatever the result.
pub fn dispatch<A>(ctx: &mut RequestContext, endpoint: &Guarded<A>, args: A) -> Result<Outcome, AppError> {
    debug!("{} {}", ctx.method(), endpoint.name());
    let result = identity::load_logged_in_user(ctx).and_then(|()| endpoint.call(ctx, args));
    ctx.teardown();
    result
}
