//! Destinations for generated files.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Receives finished output files by name.
pub trait Sink {
    fn write_file(&mut self, name: &str, contents: &[u8]) -> io::Result<()>;
}

/// Writes files into a directory, which must already exist.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> FileSink {
        FileSink { dir: dir.into() }
    }
}

impl Sink for FileSink {
    fn write_file(&mut self, name: &str, contents: &[u8]) -> io::Result<()> {
        fs::write(self.dir.join(name), contents)
    }
}

/// Keeps files in memory, keyed by name.
#[derive(Default)]
pub struct MemorySink {
    pub files: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(|contents| contents.as_str())
    }
}

impl Sink for MemorySink {
    fn write_file(&mut self, name: &str, contents: &[u8]) -> io::Result<()> {
        let contents = String::from_utf8(contents.to_vec())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.files.insert(name.to_string(), contents);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn file_sink_writes_into_dir() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut sink = FileSink::new(dir.path());

        sink.write_file("top.vhd", b"entity top is\nend entity top;\n")
            .unwrap();

        let contents = fs::read_to_string(dir.path().join("top.vhd")).unwrap();
        assert_eq!(contents, "entity top is\nend entity top;\n");
    }

    #[test]
    fn memory_sink_overwrites() {
        let mut sink = MemorySink::new();

        sink.write_file("a.vhd", b"first").unwrap();
        sink.write_file("a.vhd", b"second").unwrap();

        assert_eq!(sink.files.len(), 1);
        assert_eq!(sink.get("a.vhd"), Some("second"));
    }
}
