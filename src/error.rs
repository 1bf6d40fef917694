//! Error type shared by every stage of the SVG → PDF pipeline.
//!
//! Every error aborts the current render call; there is no partial output.

use std::path::PathBuf;

use thiserror::Error;

use crate::fonts::FontStyle;

#[derive(Error, Debug)]
pub enum Error {
    #[error("element <{element}> must have attribute `{attribute}`")]
    MissingAttribute { element: String, attribute: String },

    #[error("element <{tag}> is not currently supported")]
    UnsupportedElement { tag: String },

    #[error("color `{0}` is not valid, only hex and rgb() colors are supported")]
    InvalidColor(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("image `{}` does not exist", .path.display())]
    AssetNotFound { path: PathBuf },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("font `{family}` with style `{style}` is not registered")]
    UndefinedFont { family: String, style: FontStyle },

    #[error("failed to load font `{}`: {reason}", .path.display())]
    Font { path: PathBuf, reason: String },

    #[error("failed to load image `{}`: {reason}", .path.display())]
    Image { path: PathBuf, reason: String },

    #[error("malformed markup: {0}")]
    Markup(#[from] roxmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }
}
