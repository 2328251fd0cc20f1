//! Scene description files: parse pest pairs into a [`SceneDesc`].
//!
//! ```text
//! viewport 400 600
//! scale 20
//! anchor 0.5 0.75
//! grid 10 10
//! block 0 0 1 size 1 2 1
//! ```

use glam::{DVec3, dvec3};
use miette::SourceSpan;
use pest::Parser;
use pest::iterators::Pair;

use crate::camera::{Anchor, CameraConfig};
use crate::errors::{IsoError, SceneError, SourceContext};
use crate::types::Block;
use crate::world::World;
use crate::{Rule, SceneParser};

/// Everything needed to build a [`World`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDesc {
    pub camera: CameraConfig,
    pub blocks: Vec<Block>,
}

impl SceneDesc {
    /// Build the world and run its first render pass.
    pub fn into_world(self) -> Result<World, IsoError> {
        let mut world = World::new(&self.camera)?;
        world.add_blocks(self.blocks);
        Ok(world)
    }
}

/// Parse a scene from source text named `<scene>` in diagnostics.
pub fn parse(source: &str) -> Result<SceneDesc, SceneError> {
    parse_named("<scene>", source)
}

/// Parse a scene, naming the source in diagnostics.
pub fn parse_named(name: &str, source: &str) -> Result<SceneDesc, SceneError> {
    let ctx = SourceContext::new(name, source);
    let pairs = SceneParser::parse(Rule::scene, source).map_err(|e| {
        let span = match e.location {
            pest::error::InputLocation::Pos(pos) => (pos, 0),
            pest::error::InputLocation::Span((start, end)) => (start, end - start),
        };
        SceneError::Syntax {
            message: e.variant.message().into_owned(),
            src: ctx.named_source(),
            span: span.into(),
        }
    })?;

    let mut builder = SceneBuilder::new(&ctx);
    for pair in pairs {
        if pair.as_rule() == Rule::scene {
            for inner in pair.into_inner() {
                builder.statement(inner)?;
            }
        }
    }
    builder.finish()
}

/// Largest number of blocks a single `grid` line may create.
pub const MAX_GRID_CELLS: u64 = 4096;

fn span_of(pair: &Pair<Rule>) -> SourceSpan {
    let span = pair.as_span();
    (span.start(), span.end() - span.start()).into()
}

struct SceneBuilder<'a> {
    ctx: &'a SourceContext,
    viewport: Option<(f64, f64, SourceSpan)>,
    scale: f64,
    anchor: Anchor,
    blocks: Vec<Block>,
}

impl<'a> SceneBuilder<'a> {
    fn new(ctx: &'a SourceContext) -> Self {
        Self {
            ctx,
            viewport: None,
            scale: CameraConfig::DEFAULT_SCALE,
            anchor: Anchor::Center,
            blocks: Vec::new(),
        }
    }

    fn statement(&mut self, pair: Pair<Rule>) -> Result<(), SceneError> {
        match pair.as_rule() {
            Rule::viewport => self.viewport(pair),
            Rule::scale => {
                let span = span_of(&pair);
                let value = self.number(first_inner(pair))?;
                if value <= 0.0 {
                    return Err(SceneError::InvalidScale {
                        value,
                        src: self.ctx.named_source(),
                        span,
                    });
                }
                self.scale = value;
                Ok(())
            }
            Rule::anchor => {
                let mut inner = pair.into_inner();
                let x = self.next_number(&mut inner)?;
                let y = self.next_number(&mut inner)?;
                self.anchor = Anchor::Fraction { x, y };
                Ok(())
            }
            Rule::grid => self.grid(pair),
            Rule::block => self.block(pair),
            _ => Ok(()),
        }
    }

    fn viewport(&mut self, pair: Pair<Rule>) -> Result<(), SceneError> {
        let span = span_of(&pair);
        if let Some((_, _, first)) = self.viewport {
            return Err(SceneError::DuplicateViewport {
                src: self.ctx.named_source(),
                first,
                second: span,
            });
        }
        let mut inner = pair.into_inner();
        let width = self.next_number(&mut inner)?;
        let height = self.next_number(&mut inner)?;
        self.viewport = Some((width, height, span));
        Ok(())
    }

    /// `grid W D [at X Y Z]`: unit blocks covering a W by D rectangle.
    fn grid(&mut self, pair: Pair<Rule>) -> Result<(), SceneError> {
        let span = span_of(&pair);
        let mut inner = pair.into_inner();
        let width = self.next_count(&mut inner)?;
        let depth = self.next_count(&mut inner)?;
        let origin = match inner.next() {
            Some(offset) => self.vec3(first_inner(offset))?,
            None => DVec3::ZERO,
        };
        let cells = u64::from(width) * u64::from(depth);
        if cells > MAX_GRID_CELLS {
            return Err(SceneError::GridTooLarge {
                cells,
                max: MAX_GRID_CELLS,
                src: self.ctx.named_source(),
                span,
            });
        }
        for y in 0..depth {
            for x in 0..width {
                let cell = dvec3(f64::from(x), f64::from(y), 0.0);
                self.blocks.push(Block::unit(origin + cell));
            }
        }
        Ok(())
    }

    fn block(&mut self, pair: Pair<Rule>) -> Result<(), SceneError> {
        let mut inner = pair.into_inner();
        let position = match inner.next() {
            Some(p) => self.vec3(p)?,
            None => DVec3::ZERO,
        };
        let size = match inner.next() {
            Some(size) => {
                let span = span_of(&size);
                let size = self.vec3(first_inner(size))?;
                if size.min_element() < 0.0 {
                    return Err(SceneError::NegativeSize {
                        src: self.ctx.named_source(),
                        span,
                    });
                }
                size
            }
            None => Block::UNIT,
        };
        self.blocks.push(Block::new(position, size));
        Ok(())
    }

    fn vec3(&self, pair: Pair<Rule>) -> Result<DVec3, SceneError> {
        let mut inner = pair.into_inner();
        let x = self.next_number(&mut inner)?;
        let y = self.next_number(&mut inner)?;
        let z = self.next_number(&mut inner)?;
        Ok(dvec3(x, y, z))
    }

    fn next_number<'i>(
        &self,
        inner: &mut impl Iterator<Item = Pair<'i, Rule>>,
    ) -> Result<f64, SceneError> {
        match inner.next() {
            Some(pair) => self.number(pair),
            None => Ok(0.0),
        }
    }

    fn next_count<'i>(
        &self,
        inner: &mut impl Iterator<Item = Pair<'i, Rule>>,
    ) -> Result<u32, SceneError> {
        let Some(pair) = inner.next() else {
            return Ok(0);
        };
        let value = self.number(pair.clone())?;
        if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
            return Err(self.invalid_number(&pair));
        }
        Ok(value as u32)
    }

    fn number(&self, pair: Pair<Rule>) -> Result<f64, SceneError> {
        match pair.as_str().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.invalid_number(&pair)),
        }
    }

    fn invalid_number(&self, pair: &Pair<Rule>) -> SceneError {
        SceneError::InvalidNumber {
            text: pair.as_str().to_string(),
            src: self.ctx.named_source(),
            span: span_of(pair),
        }
    }

    fn finish(self) -> Result<SceneDesc, SceneError> {
        let Some((width, height, _)) = self.viewport else {
            return Err(SceneError::MissingViewport {
                src: self.ctx.named_source(),
                span: (0, 0).into(),
            });
        };
        let camera = CameraConfig::new(width, height)
            .with_scale(self.scale)
            .with_anchor(self.anchor);
        Ok(SceneDesc {
            camera,
            blocks: self.blocks,
        })
    }
}

/// First child of a rule whose grammar guarantees one.
fn first_inner(pair: Pair<Rule>) -> Pair<Rule> {
    let span = pair.as_span();
    pair.into_inner()
        .next()
        .unwrap_or_else(|| unreachable!("grammar rule without children at {:?}", span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn parses_demo_scene() {
        let scene = parse(
            "# demo\n\
             viewport 400 600\n\
             scale 20\n\
             anchor 0.5 0.75\n\
             grid 3 2\n\
             block 0 0 1 size 1 2 1   # stacked\n",
        )
        .unwrap();
        assert_eq!(scene.camera.origin(), dvec2(200.0, 450.0));
        assert_eq!(scene.camera.scale, 20.0);
        assert_eq!(scene.blocks.len(), 7);
        assert_eq!(scene.blocks[1].position, dvec3(1.0, 0.0, 0.0));
        assert_eq!(scene.blocks[3].position, dvec3(0.0, 1.0, 0.0));
        assert_eq!(
            scene.blocks[6],
            Block::new(dvec3(0.0, 0.0, 1.0), dvec3(1.0, 2.0, 1.0))
        );
    }

    #[test]
    fn defaults_without_optional_lines() {
        let scene = parse("viewport 100 80\nblock -1 .5 +2").unwrap();
        assert_eq!(scene.camera.scale, CameraConfig::DEFAULT_SCALE);
        assert_eq!(scene.camera.origin(), dvec2(50.0, 40.0));
        assert_eq!(scene.blocks, vec![Block::unit(dvec3(-1.0, 0.5, 2.0))]);
    }

    #[test]
    fn grid_offset() {
        let scene = parse("viewport 10 10\ngrid 1 2 at 5 5 1\n").unwrap();
        assert_eq!(scene.blocks[1].position, dvec3(5.0, 6.0, 1.0));
    }

    #[test]
    fn missing_viewport() {
        let err = parse("block 0 0 0\n").unwrap_err();
        assert!(matches!(err, SceneError::MissingViewport { .. }));
    }

    #[test]
    fn duplicate_viewport_points_at_both() {
        let err = parse("viewport 1 1\nviewport 2 2\n").unwrap_err();
        match err {
            SceneError::DuplicateViewport { first, second, .. } => {
                assert_eq!(first.offset(), 0);
                assert_eq!(second.offset(), 13);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_values() {
        let err = parse("viewport 1 1\nblock 0 0 0 size 1 -1 1\n").unwrap_err();
        assert!(matches!(err, SceneError::NegativeSize { .. }));

        let err = parse("viewport 1 1\nscale 0\n").unwrap_err();
        assert!(matches!(err, SceneError::InvalidScale { .. }));

        let err = parse("viewport 1 1\ngrid 2.5 1\n").unwrap_err();
        assert!(matches!(err, SceneError::InvalidNumber { ref text, .. } if text == "2.5"));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let err = parse("viewport 1 1\ngrid 100000 100000\n").unwrap_err();
        match err {
            SceneError::GridTooLarge { cells, span, .. } => {
                assert_eq!(cells, 10_000_000_000);
                assert_eq!(span.offset(), 13);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(parse("viewport 1 1\ngrid 64 64\n").unwrap().blocks.len(), 4096);
    }

    #[test]
    fn syntax_error_has_location() {
        let err = parse("viewport 1 1\nblok 0 0 0\n").unwrap_err();
        match err {
            SceneError::Syntax { span, .. } => assert_eq!(span.offset(), 13),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn scene_builds_rendered_world() {
        let world = parse("viewport 400 600\ngrid 2 2\n")
            .unwrap()
            .into_world()
            .unwrap();
        assert_eq!(world.sorted().len(), 4);
        assert!(!world.is_dirty());
    }
}
