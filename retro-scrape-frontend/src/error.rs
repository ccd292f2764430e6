/// Errors raised while building or reading a frontend document.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Unknown frontend '{0}' (expected emulationstation or attractmode)")]
    Unknown(String),
}

impl FrontendError {
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }
}
