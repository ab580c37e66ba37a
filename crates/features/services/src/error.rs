//! # Errors
//!
//! [`BindingError`] is what the engine returns to its caller. [`HandlerError`] is what
//! service handlers return to the engine, and [`FetchError`] is the contract of the
//! external artifact fetcher.

use bindery_xml::XmlError;
use std::borrow::Cow;

/// Errors surfaced by the binding engine.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// The plugin descriptor set cannot back a registry (no catch-all, empty key).
    #[error("Invalid plugin set{}: {message}", format_context(.context))]
    InvalidPlugins { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A descriptor names a handler the catalog does not know.
    #[error("Unknown service handler{}: {message}", format_context(.context))]
    UnknownHandler { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A handler rejected its binding payload. Not recoverable.
    #[error("Handler construction failed{}: {source}", format_context(.context))]
    HandlerConstruction { source: HandlerError, context: Option<Cow<'static, str>> },

    #[error("Invalid service bindings{}: {source}", format_context(.context))]
    InvalidBindings { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Client library fetch failed{}: {source}", format_context(.context))]
    Fetch { source: FetchError, context: Option<Cow<'static, str>> },

    #[error("Document failure{}: {source}", format_context(.context))]
    Document { source: XmlError, context: Option<Cow<'static, str>> },

    #[error("Filesystem failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

/// Errors a [`ServiceHandler`](crate::ServiceHandler) may return.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The binding payload lacks data the handler needs.
    #[error("Invalid binding payload{}: {message}", format_context(.context))]
    InvalidPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The configuration stanza could not be created or merged.
    #[error("Stanza error{}: {message}", format_context(.context))]
    Stanza { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal handler error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Errors of the external artifact fetcher.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The artifact could not be downloaded or found in the cache.
    #[error("Artifact unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Archive extraction failed{}: {message}", format_context(.context))]
    Extract { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Artifact I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

pub trait BindingErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BindingError>;
}

impl<T> BindingErrorExt<T> for Result<T, BindingError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                BindingError::InvalidPlugins { context: c, .. }
                | BindingError::UnknownHandler { context: c, .. }
                | BindingError::HandlerConstruction { context: c, .. }
                | BindingError::InvalidBindings { context: c, .. }
                | BindingError::Fetch { context: c, .. }
                | BindingError::Document { context: c, .. }
                | BindingError::Io { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

macro_rules! binding_source {
    ($variant:ident, $source:ty) => {
        impl From<$source> for BindingError {
            fn from(source: $source) -> Self {
                Self::$variant { source, context: None }
            }
        }

        impl<T> BindingErrorExt<T> for Result<T, $source> {
            fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, BindingError> {
                self.map_err(|source| BindingError::$variant { source, context: Some(context.into()) })
            }
        }
    };
}

binding_source!(HandlerConstruction, HandlerError);
binding_source!(InvalidBindings, serde_json::Error);
binding_source!(Fetch, FetchError);
binding_source!(Document, XmlError);
binding_source!(Io, std::io::Error);

impl From<&'static str> for HandlerError {
    fn from(s: &'static str) -> Self {
        Self::Internal { message: Cow::Borrowed(s), context: None }
    }
}

impl From<String> for HandlerError {
    fn from(s: String) -> Self {
        Self::Internal { message: Cow::Owned(s), context: None }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
