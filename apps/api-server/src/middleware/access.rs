//! Access control ahead of every mutation: blocked-account check, then the
//! owner-or-admin rule.

use chronicle_core::domain::{Post, PostId, User};
use chronicle_core::ports::{PostStore, UserStore};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// Re-read the caller's account and reject blocked or vanished accounts.
/// The fresh read matters: a token minted before the block must not slip
/// through on its claims alone.
pub async fn require_active(state: &AppState, identity: &Identity) -> Result<User, AppError> {
    let user = state
        .users
        .find_by_username(&identity.username)
        .await?
        .ok_or_else(|| AppError::Forbidden("unknown user".to_string()))?;

    if user.blocked {
        return Err(AppError::Forbidden("user is blocked".to_string()));
    }

    Ok(user)
}

/// Load the post and enforce the owner-or-admin rule. The lookup comes
/// first so a missing resource reads as 404 rather than 403.
pub async fn authorize_owner_or_admin(
    state: &AppState,
    user: &User,
    id: PostId,
) -> Result<Post, AppError> {
    let post = state.posts.get(id).await?;

    if user.may_modify(&post) {
        Ok(post)
    } else {
        Err(AppError::Forbidden(
            "you do not have permission to modify this post".to_string(),
        ))
    }
}
