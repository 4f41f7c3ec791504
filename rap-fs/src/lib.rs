//! Filesystem helpers for probe inputs and outputs, built on `cap-std` and
//! `camino`.
//!
//! Every helper resolves paths against an ambient root directory: `/` (or a
//! Windows prefix) for absolute paths and `.` otherwise. The remaining
//! relative part is then handled through capability-based directory handles.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Write};
use std::path::Component;

/// Open an existing file for reading.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole file into a string.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = parent_dir_and_name(path)?;
    dir.read_to_string(name.as_str())
}

/// Create `path` and every missing ancestor directory.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
    if path.as_str().is_empty() {
        return Ok(());
    }
    let (root, relative) = split_ambient_root(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    root.create_dir_all(&relative)
}

/// Create or truncate `path` for writing, creating its parent directories.
pub fn create_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let (dir, name) = parent_dir_and_name(path)?;
    dir.create(name.as_str())
}

/// Replace the contents of `path` with `contents`, creating parent
/// directories as needed.
pub fn write_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let mut file = create_file(path)?;
    file.write_all(contents)?;
    file.flush()
}

/// Whether `path` names a regular file.
///
/// Missing paths surface as [`io::ErrorKind::NotFound`].
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = parent_dir_and_name(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Whether `path` names a directory.
///
/// Missing paths surface as [`io::ErrorKind::NotFound`].
pub fn dir_is_dir(path: &Utf8Path) -> io::Result<bool> {
    if path.file_name().is_none() {
        return fs_utf8::Dir::open_ambient_dir(path, ambient_authority()).map(|_| true);
    }
    let (dir, name) = parent_dir_and_name(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_dir())
}

fn parent_dir_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("path '{path}' has no file name")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split a path into an ambient root directory handle and the path relative
/// to it.
pub fn split_ambient_root(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let (root, relative) = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let root = Utf8PathBuf::from(prefix).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = path
                .strip_prefix(&root)
                .or_else(|_| path.strip_prefix(prefix))
                .map_err(|_| io::Error::other(format!("cannot strip '{prefix}' from '{path}'")))?
                .to_owned();
            (root, relative)
        }
        Some(Component::RootDir) => {
            let root = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = path
                .strip_prefix(&root)
                .map_err(|_| io::Error::other(format!("cannot strip root from '{path}'")))?
                .to_owned();
            (root, relative)
        }
        _ => (Utf8PathBuf::from("."), path.to_owned()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&root, ambient_authority())?;
    Ok((dir, relative))
}
