pub mod app;
pub mod create;
pub mod extract;
pub mod list;
pub mod read;

use tarpack::Selector;

/// Turn a NAME argument into a selector. `--regex` compiles it as a pattern.
fn selector(name: Option<&str>, regex: bool) -> anyhow::Result<Selector> {
    Ok(match name {
        None => Selector::All,
        Some(pattern) if regex => Selector::pattern(pattern)?,
        Some(name) => Selector::from(name),
    })
}
