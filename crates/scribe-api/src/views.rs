use std::fmt::Write;

use axum::http::StatusCode;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use scribe_types::models::{Post, User};

use crate::outcome::{Endpoint, Page};

pub fn render(page: &Page, user: Option<&User>, flashes: &[String]) -> String {
    let (title, content) = match page {
        Page::Register => ("Register", credentials_form("Register")),
        Page::Login => ("Log In", credentials_form("Log In")),
        Page::Index { posts } => ("Posts", index(posts, user)),
        Page::Create => ("New Post", post_form(None)),
        Page::Update { post } => ("Edit", post_form(Some(post))),
    };
    layout(title, user, flashes, &content)
}

pub fn error_page(status: StatusCode, message: Option<&str>) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let mut content = format!("<h1>{} {}</h1>", status.as_u16(), reason);
    if let Some(message) = message {
        let _ = write!(content, "<p>{}</p>", text(message));
    }
    layout(reason, None, &[], &content)
}

fn layout(title: &str, user: Option<&User>, flashes: &[String], content: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!doctype html>\n<title>{} - Scribe</title>\n<nav>\n  <h1><a href=\"{}\">Scribe</a></h1>\n  <ul>\n",
        text(title),
        Endpoint::Index.url(),
    );
    match user {
        Some(user) => {
            let _ = write!(
                html,
                "    <li><span>{}</span>\n    <li><a href=\"{}\">Log Out</a>\n",
                text(&user.username),
                Endpoint::Logout.url(),
            );
        }
        None => {
            let _ = write!(
                html,
                "    <li><a href=\"{}\">Register</a>\n    <li><a href=\"{}\">Log In</a>\n",
                Endpoint::Register.url(),
                Endpoint::Login.url(),
            );
        }
    }
    html.push_str("  </ul>\n</nav>\n<section class=\"content\">\n");
    for message in flashes {
        let _ = writeln!(html, "  <div class=\"flash\">{}</div>", text(message));
    }
    html.push_str(content);
    html.push_str("\n</section>\n");
    html
}

fn credentials_form(action: &str) -> String {
    format!(
        "<header><h1>{action}</h1></header>\n\
         <form method=\"post\">\n\
         \x20 <label for=\"username\">Username</label>\n\
         \x20 <input name=\"username\" id=\"username\" required>\n\
         \x20 <label for=\"password\">Password</label>\n\
         \x20 <input type=\"password\" name=\"password\" id=\"password\" required>\n\
         \x20 <input type=\"submit\" value=\"{action}\">\n\
         </form>"
    )
}

fn index(posts: &[Post], user: Option<&User>) -> String {
    let mut html = String::from("<header><h1>Posts</h1>");
    if user.is_some() {
        let _ = write!(html, "<a class=\"action\" href=\"{}\">New</a>", Endpoint::Create.url());
    }
    html.push_str("</header>\n");

    for post in posts {
        let _ = write!(
            html,
            "<article class=\"post\">\n  <header>\n    <div>\n      <h1>{}</h1>\n      <div class=\"about\">by {} on {}</div>\n    </div>\n",
            text(&post.title),
            text(&post.username),
            post.created.format("%Y-%m-%d"),
        );
        if user.is_some_and(|u| u.id == post.author_id) {
            let _ = writeln!(
                html,
                "    <a class=\"action\" href=\"{}\">Edit</a>",
                Endpoint::Update(post.id).url()
            );
        }
        let _ = write!(
            html,
            "  </header>\n  <p class=\"body\">{}</p>\n</article>\n",
            text(&post.body)
        );
    }
    html
}

fn post_form(post: Option<&Post>) -> String {
    let (heading, title, body) = match post {
        Some(post) => (format!("Edit \"{}\"", text(&post.title)), post.title.as_str(), post.body.as_str()),
        None => ("New Post".to_string(), "", ""),
    };

    let mut html = format!(
        "<header><h1>{heading}</h1></header>\n\
         <form method=\"post\">\n\
         \x20 <label for=\"title\">Title</label>\n\
         \x20 <input name=\"title\" id=\"title\" value=\"{}\" required>\n\
         \x20 <label for=\"body\">Body</label>\n\
         \x20 <textarea name=\"body\" id=\"body\">{}</textarea>\n\
         \x20 <input type=\"submit\" value=\"Save\">\n\
         </form>",
        attr(title),
        text(body),
    );

    if let Some(post) = post {
        let _ = write!(
            html,
            "\n<hr>\n<form action=\"{}\" method=\"post\">\n  <input class=\"danger\" type=\"submit\" value=\"Delete\" onclick=\"return confirm('Are you sure?');\">\n</form>",
            Endpoint::Delete(post.id).url()
        );
    }
    html
}
