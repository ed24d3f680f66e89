use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// A transient single-record FASTA file handed to an external oracle.
///
/// The artifact is a scoped resource: the underlying temp file is removed
/// when the guard drops, on every exit path of an invocation (normal
/// return, parse failure, timeout, or panic). Callers never delete it
/// manually.
///
/// Format: one header line (`>` marker followed by a label) and one line
/// containing the raw sequence.
#[derive(Debug)]
pub struct SequenceArtifact {
    file: NamedTempFile,
}

impl SequenceArtifact {
    /// Materializes `sequence` under the given record label.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be created or written.
    pub fn materialize(label: &str, sequence: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("duplexcmp-")
            .suffix(".fasta")
            .tempfile()?;
        writeln!(file, ">{label}")?;
        writeln!(file, "{sequence}")?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Path of the on-disk artifact, valid for the guard's lifetime.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
