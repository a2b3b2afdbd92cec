//! `${VAR}` expansion for string fields of `mirage.toml`.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value` in place.
///
/// Values without `${` are left alone, so API keys containing `$` survive.
pub(crate) fn expand_field(value: &mut String, field: &str) -> Result<(), ConfigError> {
    expand_field_with(value, field, |name| std::env::var(name).ok())
}

fn expand_field_with(
    value: &mut String,
    field: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }

    let expanded = shellexpand::env_with_context(value.as_str(), |name| {
        lookup(name).map(Some).ok_or_else(|| name.to_owned())
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause),
    })?;
    *value = expanded.into_owned();

    Ok(())
}
