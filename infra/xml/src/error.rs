use std::borrow::Cow;

/// Errors raised while reading or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// Malformed markup or an unbalanced tree.
    #[error("XML parse error{}: {message}", format_context(.context))]
    Parse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Serialization failure.
    #[error("XML write error{}: {message}", format_context(.context))]
    Write { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Document I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

pub trait XmlErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, XmlError>;
}

impl<T> XmlErrorExt<T> for Result<T, XmlError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                XmlError::Parse { context: c, .. }
                | XmlError::Write { context: c, .. }
                | XmlError::Io { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> XmlErrorExt<T> for Result<T, std::io::Error> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, XmlError> {
        self.map_err(|source| XmlError::Io { source, context: Some(context.into()) })
    }
}

impl From<std::io::Error> for XmlError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
