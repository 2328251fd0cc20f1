//! Error types with rich diagnostics using miette
//!
//! Engine errors are plain diagnostics; scene errors carry source spans.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::BlockId;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<scene>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }
}

// ============================================================================
// Engine Errors
// ============================================================================

/// Errors raised by the camera and the world
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum IsoError {
    #[error("invalid scale: {value}")]
    #[diagnostic(
        code(isoworld::camera::invalid_scale),
        help("scale is pixels per world unit and must be finite and positive")
    )]
    InvalidScale { value: f64 },

    #[error("invalid zoom factor: {value}")]
    #[diagnostic(code(isoworld::camera::invalid_zoom))]
    InvalidZoom { value: f64 },

    #[error("no viewport attached")]
    #[diagnostic(
        code(isoworld::world::no_viewport),
        help("call `attach_viewport` before translating pointer positions")
    )]
    NoViewport,

    #[error("unknown block: {id}")]
    #[diagnostic(code(isoworld::world::unknown_block))]
    UnknownBlock { id: BlockId },
}

// ============================================================================
// Scene Errors
// ============================================================================

/// Errors that occur while reading a scene description
#[derive(Error, Diagnostic, Debug)]
pub enum SceneError {
    #[error("syntax error: {message}")]
    #[diagnostic(code(isoworld::scene::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid number: {text}")]
    #[diagnostic(code(isoworld::scene::invalid_number))]
    InvalidNumber {
        text: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("not a finite number")]
        span: SourceSpan,
    },

    #[error("missing viewport")]
    #[diagnostic(
        code(isoworld::scene::missing_viewport),
        help("add a `viewport <width> <height>` line")
    )]
    MissingViewport {
        #[source_code]
        src: NamedSource<String>,
        #[label("scene starts here")]
        span: SourceSpan,
    },

    #[error("viewport declared twice")]
    #[diagnostic(code(isoworld::scene::duplicate_viewport))]
    DuplicateViewport {
        #[source_code]
        src: NamedSource<String>,
        #[label("first declared here")]
        first: SourceSpan,
        #[label("declared again here")]
        second: SourceSpan,
    },

    #[error("negative block size")]
    #[diagnostic(
        code(isoworld::scene::negative_size),
        help("sizes are extents from the block's minimum corner")
    )]
    NegativeSize {
        #[source_code]
        src: NamedSource<String>,
        #[label("this size has a negative component")]
        span: SourceSpan,
    },

    #[error("grid of {cells} blocks exceeds the limit of {max}")]
    #[diagnostic(
        code(isoworld::scene::grid_too_large),
        help("split the grid or use larger blocks")
    )]
    GridTooLarge {
        cells: u64,
        max: u64,
        #[source_code]
        src: NamedSource<String>,
        #[label("this grid")]
        span: SourceSpan,
    },

    #[error("invalid scale: {value}")]
    #[diagnostic(code(isoworld::scene::invalid_scale))]
    InvalidScale {
        value: f64,
        #[source_code]
        src: NamedSource<String>,
        #[label("must be finite and positive")]
        span: SourceSpan,
    },
}
