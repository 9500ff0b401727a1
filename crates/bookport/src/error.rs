pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when importing a book.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The identifier passed in by the caller was empty.
    InvalidInput,
    /// No Notion token was provided.
    Auth,
    /// No Notion database id was provided.
    Config,
    /// The request could not be sent or the response could not be read.
    Transport,
    /// The request timed out, or every attempt to submit timed out.
    Timeout,
    /// The catalog has no page for the ISBN.
    NotFound,
    /// The catalog page is missing markup that the parser relies on.
    PageStructure,
    /// The catalog responded with a status other than 200 or 404.
    UnexpectedStatus,
    /// The record store refused to create the page.
    Rejected,
    /// An error caused when parsing/deserialization fails.
    Deserialize,
}

impl ErrorKind {
    /// Returns `true` for network level failures that may succeed if tried again later.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Transport | Self::Timeout)
    }
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Attaches `source` as the cause of this [`Error`], replacing any previous cause.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<DynError>,
    {
        self.source = Some(source.into());
        self
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::InvalidInput => f.write_str("Invalid input")?,
            ErrorKind::Auth => f.write_str("Authentication error")?,
            ErrorKind::Config => f.write_str("Configuration error")?,
            ErrorKind::Transport => f.write_str("Transport error")?,
            ErrorKind::Timeout => f.write_str("Timeout error")?,
            ErrorKind::NotFound => f.write_str("Not found")?,
            ErrorKind::PageStructure => f.write_str("Page structure error")?,
            ErrorKind::UnexpectedStatus => f.write_str("Unexpected status")?,
            ErrorKind::Rejected => f.write_str("Rejected by Notion")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
        };

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
