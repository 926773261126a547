use crate::error::ApiError;

/// Resource ownership check: the caller may act on a resource only when it
/// owns it. Pure comparison of the two identities; callers must confirm the
/// resource exists first so a nonexistent target yields 404, never 403.
pub fn authorize(
    caller_id: u64,
    owner_id: u64,
    action: &str,
    resource: &str,
) -> Result<(), ApiError> {
    if caller_id == owner_id {
        Ok(())
    } else {
        tracing::warn!("user {caller_id} denied {action} on {resource} owned by {owner_id}");
        Err(ApiError::Forbidden(format!(
            "You are not authorized to {action} this {resource}."
        )))
    }
}
