use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Where a bundle is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSource {
    /// A directory of loose files.
    Directory(PathBuf),
    /// A single ZIP archive.
    Archive(PathBuf),
}

impl BundleSource {
    /// Classify `path` as a directory or an archive.
    pub fn detect(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(Self::Directory(path.to_path_buf()));
        }
        let is_zip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip && path.is_file() {
            Ok(Self::Archive(path.to_path_buf()))
        } else {
            Err(Error::InvalidSource(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(path) | Self::Archive(path) => path,
        }
    }

    /// File name of the source with a trailing `.zip` removed.
    pub fn identity(&self) -> String {
        source_identity(self.path())
    }

    /// Read every file into memory as `(relative name, bytes)` pairs.
    ///
    /// Names use `/` as separator regardless of platform.
    pub fn read_files(&self) -> Result<Vec<(String, Vec<u8>)>> {
        match self {
            Self::Directory(root) => {
                let mut files = Vec::new();
                read_directory(root, root, &mut files)?;
                Ok(files)
            }
            Self::Archive(path) => read_archive(path),
        }
    }
}

/// File name of `path` with a trailing `.zip` removed (case-insensitive).
pub fn source_identity(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.len().checked_sub(4) {
        Some(stem_len)
            if name.is_char_boundary(stem_len) && name[stem_len..].eq_ignore_ascii_case(".zip") =>
        {
            name[..stem_len].to_string()
        }
        _ => name,
    }
}

fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

fn read_directory(root: &Path, dir: &Path, files: &mut Vec<(String, Vec<u8>)>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            read_directory(root, &path, files)?;
            continue;
        }
        match relative_name(root, &path) {
            Some(name) => files.push((name, fs::read(&path)?)),
            None => warn!("Skipping unreadable path {}", path.display()),
        }
    }
    Ok(())
}

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_PREALLOCATION: u64 = 64 << 20;

/// Buffer capacity for an entry. The declared size comes from the archive
/// header and is not trusted beyond `MAX_PREALLOCATION`.
fn capacity_hint(declared_size: u64) -> usize {
    usize::try_from(declared_size.min(MAX_PREALLOCATION)).unwrap_or(0)
}

fn read_archive(path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let reader = BufReader::new(File::open(path)?);
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut files = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let Some(enclosed) = file.enclosed_name() else {
            warn!("Skipping archive entry with unsafe path: {}", file.name());
            continue;
        };
        let Some(name) = relative_name(Path::new(""), &enclosed) else {
            continue;
        };
        let mut data = Vec::with_capacity(capacity_hint(file.size()));
        file.read_to_end(&mut data)?;
        debug!("Read {} ({} bytes) from {}", name, data.len(), path.display());
        files.push((name, data));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_strips_zip() {
        assert_eq!(source_identity(Path::new("/tmp/1a2b (Song - Mapper).zip")), "1a2b (Song - Mapper)");
        assert_eq!(source_identity(Path::new("/tmp/abc.ZIP")), "abc");
        assert_eq!(source_identity(Path::new("/tmp/folder")), "folder");
    }

    #[test]
    fn test_detect_rejects_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, "x").unwrap();
        assert!(matches!(
            BundleSource::detect(&text),
            Err(Error::InvalidSource(_))
        ));
        assert_eq!(
            BundleSource::detect(dir.path()).unwrap(),
            BundleSource::Directory(dir.path().to_path_buf())
        );
    }

    #[test]
    fn test_read_directory_recurses() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("Info.dat"), "{}").unwrap();
        fs::write(dir.path().join("sub").join("a.bin"), [1u8, 2]).unwrap();

        let files = BundleSource::detect(dir.path()).unwrap().read_files().unwrap();
        let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Info.dat", "sub/a.bin"]);
    }

    #[test]
    fn test_capacity_hint_ignores_huge_declared_sizes() {
        assert_eq!(capacity_hint(1024), 1024);
        assert_eq!(capacity_hint(u64::MAX), 64 << 20);
    }
}
