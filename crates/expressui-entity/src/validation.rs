//! Entity constraint checking.

use validator::Validate;

use expressui_core::result::AppResult;

/// Validate an entity's declared constraints, mapping failures to a
/// `Validation` error that lists the offending fields.
pub fn validate_entity<T: Validate>(entity: &T) -> AppResult<()> {
    entity.validate()?;
    Ok(())
}
