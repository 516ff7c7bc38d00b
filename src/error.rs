use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why a single `<trkpt>` was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointDefect {
    #[error("missing attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttribute { attribute: &'static str, value: String },

    #[error("value {value} for attribute '{attribute}' is out of range")]
    OutOfRange { attribute: &'static str, value: f64 },
}

/// Reasons a document is rejected as a whole.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Unexpected end of document: <{0}> is never closed")]
    UnclosedElement(String),

    #[error("Unexpected end tag </{0}>")]
    UnexpectedEndTag(String),

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Unexpected content outside the root element")]
    ContentOutsideRoot,

    #[error("Reference to undefined entity '&{0};'")]
    UndefinedEntity(String),

    #[error("Invalid reference in value of attribute '{attribute}': {source}")]
    AttributeReference {
        attribute: String,
        source: quick_xml::escape::EscapeError,
    },

    #[error("Unescaped '<' in value of attribute '{0}'")]
    LessThanInAttribute(String),
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(e.into())
    }
}

/// Errors returned while reading or parsing a track log.
#[derive(Error, Debug)]
pub enum TrackError {
    /// The document is not well-formed XML.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The underlying file or blob could not be read.
    #[error("Failed to read track source: {0}")]
    Read(#[from] std::io::Error),

    /// A `<trkpt>` was defective while parsing in strict mode.
    #[error("Invalid track point #{index}: {reason}")]
    InvalidPoint { index: usize, reason: PointDefect },
}

impl From<quick_xml::Error> for TrackError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Parse(ParseError::Xml(e))
    }
}

impl From<TrackError> for JsValue {
    fn from(e: TrackError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// Result type alias using [`TrackError`].
pub type Result<T> = std::result::Result<T, TrackError>;
