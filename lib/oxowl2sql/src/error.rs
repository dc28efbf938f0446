use oxrdfio::RdfParseError;
use std::io;

/// Error raised while loading an ontology document or one of its imports.
#[derive(Debug, thiserror::Error)]
pub enum OntologyLoadError {
    /// I/O error while opening or reading a document.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Syntax error in one of the parsed documents.
    #[error(transparent)]
    Parse(#[from] RdfParseError),
    /// The RDF format could not be guessed from the file name.
    #[error("cannot guess the RDF format of {0}")]
    UnsupportedFormat(String),
}
