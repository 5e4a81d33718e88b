use std::path::{Path, PathBuf};

use crate::view::ROW_WIDTH;
use crate::{Error, Result};

/// Fixed-size, overwrite-only byte buffer backed by a file.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    path: Option<PathBuf>,
    bytes: Vec<u8>,
    dirty: bool,
}

impl ByteBuffer {
    /// Create an unnamed buffer holding `bytes`. Saving it fails with
    /// [`Error::NoPath`].
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            path: None,
            bytes,
            dirty: false,
        }
    }

    /// Create an empty buffer that will save to `path`.
    pub fn empty<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            bytes: Vec::new(),
            dirty: false,
        }
    }

    /// Read the whole file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            bytes,
            dirty: false,
        })
    }

    /// Read the whole file at `path`, falling back to an empty buffer.
    ///
    /// A failed read is logged and handed back alongside the empty buffer so
    /// the caller can surface it; editing continues either way.
    pub fn load<P: AsRef<Path>>(path: P) -> (Self, Option<Error>) {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(buf) => {
                tracing::info!(path = %path.display(), size = buf.len(), "loaded file");
                (buf, None)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "load failed, editing empty buffer");
                (Self::empty(path), Some(err))
            }
        }
    }

    /// Write every byte back to the backing path.
    ///
    /// Clears the dirty flag only when the write succeeds.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.as_deref().ok_or(Error::NoPath)?;
        crate::fs::atomic_write(path, &self.bytes)?;
        self.dirty = false;
        tracing::info!(path = %path.display(), size = self.bytes.len(), "saved file");
        Ok(())
    }

    /// Overwrite the byte at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range; cursor clamping keeps callers in bounds.
    pub fn set_byte(&mut self, index: usize, value: u8) {
        assert!(
            index < self.bytes.len(),
            "set_byte index {index} out of range for size {}",
            self.bytes.len()
        );
        self.bytes[index] = value;
        self.dirty = true;
    }

    /// Byte at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// The whole buffer.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes of display row `row`; shorter than a full row at end of file.
    pub fn row(&self, row: usize) -> &[u8] {
        let start = (row * ROW_WIDTH).min(self.bytes.len());
        let end = (start + ROW_WIDTH).min(self.bytes.len());
        &self.bytes[start..end]
    }

    /// File size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length file or a failed load.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether there are edits not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Path the buffer saves to, as given when it was opened.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn open_reads_all_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        let buf = ByteBuffer::open(file.path()).unwrap();
        assert_eq!(buf.bytes(), &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(buf.len(), 4);
        assert!(!buf.is_dirty());
    }

    #[test]
    fn load_missing_file_yields_empty_buffer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        let (buf, err) = ByteBuffer::load(&path);
        assert!(matches!(err, Some(Error::FileNotFound)));
        assert!(buf.is_empty());
        assert!(!buf.is_dirty());
        assert_eq!(buf.path(), Some(path.as_path()));
    }

    #[test]
    fn set_byte_marks_dirty() {
        let mut buf = ByteBuffer::from_bytes(vec![0; 3]);
        buf.set_byte(2, 0x7F);
        assert_eq!(buf.get(2), Some(0x7F));
        assert!(buf.is_dirty());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn set_byte_out_of_range_panics() {
        let mut buf = ByteBuffer::from_bytes(vec![0; 3]);
        buf.set_byte(3, 1);
    }

    #[test]
    fn save_writes_and_clears_dirty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [1, 2, 3]).unwrap();
        let mut buf = ByteBuffer::open(&path).unwrap();
        buf.set_byte(1, 0xAA);
        buf.save().unwrap();
        assert!(!buf.is_dirty());
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 0xAA, 3]);
    }

    #[test]
    fn save_twice_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("same.bin");
        std::fs::write(&path, b"\x00\x01binary\xff").unwrap();
        let mut buf = ByteBuffer::open(&path).unwrap();
        buf.save().unwrap();
        let first = std::fs::read(&path).unwrap();
        assert!(!buf.is_dirty());
        buf.save().unwrap();
        let second = std::fs::read(&path).unwrap();
        assert!(!buf.is_dirty());
        assert_eq!(first, second);
        assert_eq!(second, b"\x00\x01binary\xff");
    }

    #[cfg(unix)]
    #[test]
    fn save_through_symlink_updates_target() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real.bin");
        let link = dir.path().join("link.bin");
        std::fs::write(&real, [0, 0, 0]).unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let mut buf = ByteBuffer::open(&link).unwrap();
        buf.set_byte(0, 0x41);
        buf.save().unwrap();

        assert!(!buf.is_dirty());
        assert_eq!(buf.path(), Some(link.as_path()));
        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read(&real).unwrap(), vec![0x41, 0, 0]);
    }

    #[test]
    fn save_without_path_keeps_dirty() {
        let mut buf = ByteBuffer::from_bytes(vec![0; 2]);
        buf.set_byte(0, 1);
        assert!(matches!(buf.save(), Err(Error::NoPath)));
        assert!(buf.is_dirty());
        assert_eq!(buf.bytes(), &[1, 0]);
    }

    #[test]
    fn save_into_missing_dir_keeps_dirty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone").join("file.bin");
        let mut buf = ByteBuffer::empty(&path);
        buf.dirty = true;
        assert!(buf.save().is_err());
        assert!(buf.is_dirty());
    }

    #[test]
    fn row_slices_short_final_row() {
        let buf = ByteBuffer::from_bytes((0u8..20).collect());
        assert_eq!(buf.row(0).len(), 16);
        assert_eq!(buf.row(1), &[16, 17, 18, 19]);
        assert!(buf.row(2).is_empty());
    }
}
