//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot open the archive file: {0}")]
    FileOpenError(std::io::Error),

    #[error("The archiver has not been initialised with a file")]
    NotInitialised,

    #[error("Cannot write the archive record: {0}")]
    WriteError(#[from] csv::Error),

    #[error("Cannot flush the archive file: {0}")]
    FlushError(std::io::Error)
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a csv.
///
/// To implement this trait, the struct shall have an `Archiver` member which
/// shall be setup in the struct's `init` or `new` functions. Records must be
/// flat structs, as csv cannot write nested containers.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let mut session_path = session.arch_root.clone();
        session_path.push(path);

        Self::from_file_path(session_path)
    }

    /// Create a new archiver writing to the given file, truncating it.
    pub fn from_file_path<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        // Create any missing parent directories
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(ArchiveError::FileOpenError)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)
            .map_err(ArchiveError::FileOpenError)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// True if the archiver has a file to write into.
    pub fn is_initialised(&self) -> bool {
        self.writer.is_some()
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record)?;
                w.flush().map_err(ArchiveError::FlushError)?
            },
            None => return Err(ArchiveError::NotInitialised)
        }

        Ok(())
    }
}
