use thiserror::Error;

/// Errors raised by whole-document operations (model loading, results I/O, configuration).
///
/// Node-level problems (unresolved references, locked writes, unknown tags) are
/// not errors: they degrade and are reported through `tracing`.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] quick_xml::Error),

    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, ResultsError>;

impl ResultsError {
    pub fn missing_attribute<S1: Into<String>, S2: Into<String>>(element: S1, attribute: S2) -> Self {
        Self::MissingAttribute { element: element.into(), attribute: attribute.into() }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedDocument { message: message.into() }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Returns true if the error came from reading or writing XML
    pub fn is_xml(&self) -> bool {
        matches!(self, Self::XmlParse(_) | Self::XmlWrite(_) | Self::MalformedDocument { .. })
    }
}
