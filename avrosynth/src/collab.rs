//! Boundaries to schema retrieval and IDL compilation.

use crate::error::CollaboratorError;
use std::path::Path;

/// Supplies raw schema document text for a location.
pub trait SchemaSource {
    /// Fetches the document at `location`.
    ///
    /// # Errors
    /// Returns [`CollaboratorError::Unavailable`] if it cannot be read.
    fn fetch(&self, location: &str) -> Result<String, CollaboratorError>;
}

/// Compiles interface definition language into protocol JSON text.
pub trait IdlCompiler {
    /// Compiles `idl` into a protocol document.
    ///
    /// # Errors
    /// Returns [`CollaboratorError::Compilation`] on failure.
    fn compile(&self, idl: &str) -> Result<String, CollaboratorError>;
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn fetch(&self, location: &str) -> Result<String, CollaboratorError> {
        (**self).fetch(location)
    }
}

impl<T: IdlCompiler + ?Sized> IdlCompiler for &T {
    fn compile(&self, idl: &str) -> Result<String, CollaboratorError> {
        (**self).compile(idl)
    }
}

/// Reads locations as local file paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl SchemaSource for FileSource {
    fn fetch(&self, location: &str) -> Result<String, CollaboratorError> {
        std::fs::read_to_string(Path::new(location))
            .map_err(|e| CollaboratorError::unavailable(location, e))
    }
}

/// Compiler for setups without IDL support; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdlCompiler;

impl IdlCompiler for NoIdlCompiler {
    fn compile(&self, _idl: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::compilation("no IDL compiler configured"))
    }
}
