//! HTTP request handlers.
//!
//! Handlers translate between the HTTP surface and the service layer:
//! query/path extraction, pagination, mutation redirects, and the
//! validation-echo responses that hand bad form input back to the
//! client.

pub mod comments;
pub mod feed;
pub mod posts;
pub mod profile;

pub use comments::add_comment;
pub use feed::{follow_index, group_posts, index};
pub use posts::{create_post, new_post_form, post_edit, post_edit_form, post_view};
pub use profile::{profile, profile_follow, profile_unfollow};

use actix_web::{http::header, HttpResponse};
use serde::Deserialize;

/// Query parameters for paginated listings
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

impl PageQuery {
    pub fn number(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

/// 302 redirect issued after successful mutations and denied edits.
pub(crate) fn redirect(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

/// 400 response that hands the submitted text back to the form.
pub(crate) fn validation_echo(error: String, text: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": error,
        "text": text,
    }))
}
