use super::PropertySource;
use crate::ConfigResult;

/// Explicit binding of a configuration structure from a [`PropertySource`].
///
/// Implementations read their keys below [`BindProperties::PREFIX`] from the
/// root source and assign fields one by one. Keys that are absent leave the
/// field untouched, so binding on top of a preset keeps the preset's values.
pub trait BindProperties {
    /// Dotted key namespace owned by this structure
    const PREFIX: &'static str;

    fn bind(&mut self, source: &PropertySource) -> ConfigResult<()>;

    /// Fully-qualified key for one of this structure's fields
    fn key(field: &str) -> String {
        format!("{}.{}", Self::PREFIX, field)
    }
}

/// Bind a fresh default instance of `T` from `source`
pub fn bind<T: BindProperties + Default>(source: &PropertySource) -> ConfigResult<T> {
    let mut target = T::default();
    target.bind(source)?;
    Ok(target)
}
