use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::render::OutputStream;
use crate::render::error::RenderError;

pub const PAGE_FILE_NAME: &str = "index.html";
pub const SVG_FILE_NAME: &str = "chart.svg";

/// A file in an output directory, created or truncated on open.
pub struct OutputFile {
    path: PathBuf,
    file: BufWriter<File>,
}

impl OutputFile {
    pub fn new(dir: &Path, file_name: &str) -> Result<OutputFile, RenderError> {
        let path = dir.join(file_name);
        let file = BufWriter::new(File::create(&path)?);

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes the buffered content and returns the file path.
    pub fn finish(mut self) -> Result<PathBuf, RenderError> {
        self.file.flush()?;
        Ok(self.path)
    }
}

impl OutputStream for OutputFile {
    fn write(&mut self, data: &str) -> Result<(), RenderError> {
        self.file.write_all(data.as_bytes())?;
        Ok(())
    }
}
