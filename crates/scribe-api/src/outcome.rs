use scribe_types::models::Post;

/// Logical endpoints. Handlers redirect by name; paths live only here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Index,
    Create,
    Update(i64),
    Delete(i64),
    Register,
    Login,
    Logout,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index => "blog.index",
            Self::Create => "blog.create",
            Self::Update(_) => "blog.update",
            Self::Delete(_) => "blog.delete",
            Self::Register => "auth.register",
            Self::Login => "auth.login",
            Self::Logout => "auth.logout",
        }
    }

    /// Build the URL for this endpoint.
    pub fn url(&self) -> String {
        match self {
            Self::Index => "/".to_string(),
            Self::Create => "/create".to_string(),
            Self::Update(id) => format!("/{id}/update"),
            Self::Delete(id) => format!("/{id}/delete"),
            Self::Register => "/auth/register".to_string(),
            Self::Login => "/auth/login".to_string(),
            Self::Logout => "/auth/logout".to_string(),
        }
    }
}

/// Pages the view layer knows how to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Register,
    Login,
    Index { posts: Vec<Post> },
    Create,
    Update { post: Post },
}

/// What a handler (or a guard) decided the response should be.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Render(Page),
    Redirect(Endpoint),
}
