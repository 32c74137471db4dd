//! Ownership and relationship guards.
//!
//! These predicates gate mutations; they never produce errors
//! themselves. A failed edit check redirects the viewer to the
//! read-only post page, and a failed follow check turns the request
//! into a no-op.

use uuid::Uuid;

use crate::models::Post;

/// Only the owning author may edit a post.
pub fn can_edit_post(viewer_id: Uuid, post: &Post) -> bool {
    post.author_id == viewer_id
}

/// Authors cannot follow themselves.
pub fn can_follow(follower_id: Uuid, followee_id: Uuid) -> bool {
    follower_id != followee_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post_owned_by(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id,
            group_id: None,
            text: "hello".to_string(),
            image_key: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_may_edit_their_post() {
        let owner = Uuid::new_v4();
        assert!(can_edit_post(owner, &post_owned_by(owner)));
    }

    #[test]
    fn non_owner_may_not_edit() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        assert!(!can_edit_post(stranger, &post_owned_by(owner)));
    }

    #[test]
    fn self_follow_is_rejected() {
        let author = Uuid::new_v4();
        assert!(!can_follow(author, author));
        assert!(can_follow(author, Uuid::new_v4()));
    }
}
