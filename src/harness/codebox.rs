//! Named callbacks selected by the `box` key of each tile.

use super::{BoxResult, Context};
use crate::multimap::Tile;
use indexmap::IndexMap;

type Codebox<'f> = Box<dyn FnMut(&mut Context, &Tile) -> BoxResult + 'f>;

/// Registry of codeboxes.
///
/// ```ignore
/// let mut boxes = CodeboxSet::new()
///     .with("turn_page", |ctx, tile| { /* ... */ Ok(()) })
///     .with("count", |ctx, tile| { /* ... */ Ok(()) });
/// let report = suite.run(|ctx, tile| boxes.dispatch(ctx, tile), &config, &mut LogSink);
/// ```
#[derive(Default)]
pub struct CodeboxSet<'f> {
    boxes: IndexMap<String, Codebox<'f>>,
}

impl<'f> CodeboxSet<'f> {
    /// A set with no codebox registered.
    pub fn new() -> Self {
        Self {
            boxes: IndexMap::new(),
        }
    }

    /// Builder form of [`CodeboxSet::register`].
    pub fn with<F>(mut self, name: impl Into<String>, codebox: F) -> Self
    where
        F: FnMut(&mut Context, &Tile) -> BoxResult + 'f,
    {
        self.register(name, codebox);
        self
    }

    /// Register a codebox, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, codebox: F)
    where
        F: FnMut(&mut Context, &Tile) -> BoxResult + 'f,
    {
        self.boxes.insert(name.into(), Box::new(codebox));
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.boxes.keys().map(String::as_str)
    }

    /// Run the codebox named by the tile's `box` value.
    pub fn dispatch(&mut self, ctx: &mut Context, tile: &Tile) -> BoxResult {
        let name = match tile.get("box") {
            Some(value) => crate::diff::render(value),
            None => return Err(ctx.abort("no box declared for this tile")),
        };
        match self.boxes.get_mut(&name) {
            Some(codebox) => codebox(ctx, tile),
            None => Err(ctx.abort(format!(
                "no codebox with the name \"{}\" has been registered",
                name
            ))),
        }
    }
}

impl std::fmt::Debug for CodeboxSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.boxes.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::TileStatus;
    use serde_yaml::Value;

    fn tile(entries: &[(&str, &str)]) -> Tile {
        entries
            .iter()
            .map(|(k, v)| (*k, Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_dispatch_by_box_name() {
        let mut seen = Vec::new();
        {
            let mut boxes = CodeboxSet::new()
                .with("a", |_ctx: &mut Context, tile: &Tile| {
                    seen.push(tile.get_str("x").unwrap_or("").to_string());
                    Ok(())
                })
                .with("b", |ctx: &mut Context, _tile: &Tile| {
                    ctx.fail("b always fails");
                    Ok(())
                });

            let mut ctx = Context::new();
            assert!(boxes.dispatch(&mut ctx, &tile(&[("box", "a"), ("x", "1")])).is_ok());
            assert_eq!(ctx.status(), TileStatus::Pristine);

            let mut ctx = Context::new();
            assert!(boxes.dispatch(&mut ctx, &tile(&[("box", "b")])).is_ok());
            assert_eq!(ctx.status(), TileStatus::Failed);

            assert_eq!(boxes.names().collect::<Vec<_>>(), vec!["a", "b"]);
        }
        assert_eq!(seen, vec!["1"]);
    }

    #[test]
    fn test_missing_box_aborts() {
        let mut boxes = CodeboxSet::new();
        let mut ctx = Context::new();
        assert!(boxes.dispatch(&mut ctx, &tile(&[("x", "1")])).is_err());
        assert_eq!(ctx.status(), TileStatus::Aborted);
        assert_eq!(ctx.messages(), &["no box declared for this tile".to_string()]);
    }

    #[test]
    fn test_unknown_box_aborts() {
        let mut boxes = CodeboxSet::new().with("known", |_: &mut Context, _: &Tile| Ok(()));
        let mut ctx = Context::new();
        assert!(boxes.dispatch(&mut ctx, &tile(&[("box", "other")])).is_err());
        assert_eq!(ctx.status(), TileStatus::Aborted);
        assert!(ctx.messages()[0].contains("\"other\""));
    }
}
