//! G-code source abstraction
//!
//! A milling job reads its program from a line-oriented, rewindable
//! resource. Lines are ASCII text, terminator-agnostic. The sequencer
//! pre-scans the whole source once at load time and rewinds it for every
//! (re)start, so implementations must support cheap seeking back to the
//! beginning.

use millstream_core::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// Line-oriented readable G-code resource
pub trait GcodeSource: Send {
    /// Display name of the source (file name for file-backed sources)
    fn name(&self) -> &str;

    /// Total size of the source in bytes (for load-progress reporting)
    fn size(&self) -> u64;

    /// Check whether another line is available
    fn has_next(&mut self) -> bool;

    /// Read the next line, without its terminator
    ///
    /// Returns `None` once the source is exhausted.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Rewind to the first line
    fn seek_to_start(&mut self) -> Result<()>;
}

/// G-code source backed by a file on disk
pub struct FileSource {
    name: String,
    size: u64,
    reader: BufReader<File>,
    peeked: Option<String>,
}

impl FileSource {
    /// Open a G-code file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::source(format!("Failed to open {}: {}", path.display(), e)))?;
        let size = file
            .metadata()
            .map_err(|e| Error::source(format!("Failed to stat {}: {}", path.display(), e)))?
            .len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size,
            reader: BufReader::new(file),
            peeked: None,
        })
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

impl GcodeSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn has_next(&mut self) -> bool {
        if self.peeked.is_none() {
            match self.next_line() {
                Ok(line) => self.peeked = line,
                Err(e) => {
                    tracing::warn!(file = %self.name, "Read failed: {}", e);
                }
            }
        }
        self.peeked.is_some()
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.peeked.take() {
            return Ok(Some(line));
        }
        self.next_line()
    }

    fn seek_to_start(&mut self) -> Result<()> {
        self.peeked = None;
        self.reader.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

/// In-memory G-code source, for tests and canned programs
pub struct StringSource {
    name: String,
    size: u64,
    lines: Vec<String>,
    position: usize,
}

impl StringSource {
    /// Create a source from a program text
    pub fn new(name: impl Into<String>, program: &str) -> Self {
        Self {
            name: name.into(),
            size: program.len() as u64,
            lines: program.lines().map(str::to_string).collect(),
            position: 0,
        }
    }

    /// Create a source from individual lines
    pub fn from_lines(name: impl Into<String>, lines: &[&str]) -> Self {
        let program = lines.join("\n");
        Self::new(name, &program)
    }
}

impl GcodeSource for StringSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn has_next(&mut self) -> bool {
        self.position < self.lines.len()
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        match self.lines.get(self.position) {
            Some(line) => {
                self.position += 1;
                Ok(Some(line.clone()))
            }
            None => Ok(None),
        }
    }

    fn seek_to_start(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_string_source_roundtrip() {
        let mut source = StringSource::from_lines("test.nc", &["G1 X1", "G1 Y2"]);
        assert!(source.has_next());
        assert_eq!(source.read_line().unwrap(), Some("G1 X1".to_string()));
        assert_eq!(source.read_line().unwrap(), Some("G1 Y2".to_string()));
        assert_eq!(source.read_line().unwrap(), None);
        assert!(!source.has_next());

        source.seek_to_start().unwrap();
        assert_eq!(source.read_line().unwrap(), Some("G1 X1".to_string()));
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "G0 Z5\r\nG1 X1 Y1 F100\n; done\n").unwrap();

        let mut source = FileSource::open(file.path()).unwrap();
        assert!(source.size() > 0);
        assert!(source.has_next());
        assert_eq!(source.read_line().unwrap(), Some("G0 Z5".to_string()));
        assert_eq!(
            source.read_line().unwrap(),
            Some("G1 X1 Y1 F100".to_string())
        );
        assert_eq!(source.read_line().unwrap(), Some("; done".to_string()));
        assert_eq!(source.read_line().unwrap(), None);

        source.seek_to_start().unwrap();
        assert_eq!(source.read_line().unwrap(), Some("G0 Z5".to_string()));
    }

    #[test]
    fn test_unreadable_source_reports_no_lines() {
        // a directory opens but cannot be read as a stream
        let dir = tempfile::tempdir().unwrap();
        let mut source = FileSource::open(dir.path()).unwrap();
        assert!(!source.has_next());
        assert!(source.read_line().is_err());
    }
}
