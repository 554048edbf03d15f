use thiserror::Error;

/// Errors surfaced by model context resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Strict resolution found no store registered by any enclosing scope.
    #[error("no store provided for model context `{context}` in any enclosing scope")]
    MissingProvider {
        /// The context's diagnostic name, or `<unnamed>`.
        context: String,
    },
}
