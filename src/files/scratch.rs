use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};

use crate::error::LLMError;

const SCRATCH_PREFIX: &str = "gemini-upload-";

/// Local copy of attachment bytes that lives for one upload call.
///
/// The extension of the original name is kept because the store infers the
/// content type partly from it.
pub(super) struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    pub(super) fn write(name: &str, bytes: &[u8], dir: Option<&Path>) -> Result<Self, LLMError> {
        let suffix = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let mut builder = Builder::new();
        builder.prefix(SCRATCH_PREFIX).suffix(&suffix);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub(super) fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the file, logging instead of failing when removal goes wrong.
    pub(super) fn release(self) {
        let path: PathBuf = self.file.path().to_path_buf();
        if let Err(err) = self.file.close() {
            log::warn!("could not remove scratch file {}: {err}", path.display());
        }
    }
}
