use rand::Rng;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write `bytes` to `path`.
///
/// Symlinks are followed, so the file they point at is the one replaced. The
/// bytes go to a temporary file next to that target, are synced, renamed over
/// it, and the parent directory is fsynced. An existing target keeps its
/// permissions; a read-only target is refused with `PermissionDenied`.
///
/// Files with other hard links, or in a directory that does not accept new
/// entries, are overwritten in place instead.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let target = resolve(path)?;
    let dir = parent_dir(&target)?;
    let name = target
        .file_name()
        .ok_or_else(|| io::Error::other("missing file name"))?;

    let existing = match fs::metadata(&target) {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };
    if let Some(meta) = &existing {
        if meta.permissions().readonly() {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        if has_other_links(meta) {
            return write_in_place(&target, bytes);
        }
    }

    let nonce: u64 = rand::thread_rng().r#gen();
    let tmp = dir.join(format!(".{}.hp.tmp.{}", name.to_string_lossy(), nonce));
    let perms = existing.as_ref().map(fs::Metadata::permissions);
    if let Err(err) = write_tmp(&tmp, bytes, perms) {
        let _ = fs::remove_file(&tmp);
        if err.kind() == io::ErrorKind::PermissionDenied && existing.is_some() {
            tracing::debug!(path = %target.display(), "directory not writable, saving in place");
            return write_in_place(&target, bytes);
        }
        return Err(err);
    }
    if let Err(err) = fs::rename(&tmp, &target) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }

    let dirf = File::open(&dir)?;
    dirf.sync_all()?;
    Ok(())
}

/// Truncate `path` and write `bytes` into the same inode.
fn write_in_place(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut f = OpenOptions::new().write(true).truncate(true).open(path)?;
    f.write_all(bytes)?;
    f.sync_all()
}

fn write_tmp(tmp: &Path, bytes: &[u8], perms: Option<fs::Permissions>) -> io::Result<()> {
    let mut f = OpenOptions::new().create_new(true).write(true).open(tmp)?;
    f.write_all(bytes)?;
    f.sync_all()?;
    if let Some(perms) = perms {
        fs::set_permissions(tmp, perms)?;
    }
    Ok(())
}

// Follow symlinks to the real file; a path that does not exist yet is used as is.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(real) => Ok(real),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn has_other_links(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    meta.nlink() > 1
}

#[cfg(not(unix))]
fn has_other_links(_meta: &fs::Metadata) -> bool {
    false
}

// A bare relative filename has an empty parent; that means the working directory.
fn parent_dir(path: &Path) -> io::Result<PathBuf> {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Ok(PathBuf::from(".")),
        Some(p) => Ok(p.to_path_buf()),
        None => Err(io::Error::other("missing parent")),
    }
}
