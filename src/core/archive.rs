use crate::utils::error::{PackError, Result};
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};

/// In-memory archive tree. Folders keep children in insertion order; that
/// order is what the serialized zip preserves.
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    root: Folder,
}

#[derive(Debug, Default)]
struct Folder {
    entries: Vec<Entry>,
}

#[derive(Debug)]
enum Entry {
    Folder { name: String, folder: Folder },
    File { name: String, bytes: Vec<u8> },
}

impl Entry {
    fn name(&self) -> &str {
        match self {
            Entry::Folder { name, .. } => name,
            Entry::File { name, .. } => name,
        }
    }
}

/// Path-shaped handle to a folder inside an [`ArchiveBuilder`]. Only valid
/// for the builder that issued it.
#[derive(Debug, Clone)]
pub struct FolderHandle {
    segments: Vec<String>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the archive root.
    pub fn root(&self) -> FolderHandle {
        FolderHandle {
            segments: Vec::new(),
        }
    }

    /// Create (or reuse) the folder at `path`. Idempotent: creating the same
    /// path twice returns a handle to the same node. A segment already taken
    /// by a file is an error.
    pub fn create_folder(&mut self, path: &[&str]) -> Result<FolderHandle> {
        let mut current = &mut self.root;
        let mut segments = Vec::with_capacity(path.len());
        for segment in path {
            if segment.is_empty() {
                return Err(PackError::ArchiveError {
                    reason: "folder path segments must be non-empty".to_string(),
                });
            }
            segments.push(segment.to_string());
            let idx = match current.entries.iter().position(|e| e.name() == *segment) {
                Some(idx) => idx,
                None => {
                    current.entries.push(Entry::Folder {
                        name: segment.to_string(),
                        folder: Folder::default(),
                    });
                    current.entries.len() - 1
                }
            };
            let Entry::Folder { folder, .. } = &mut current.entries[idx] else {
                return Err(PackError::ArchiveError {
                    reason: format!("'{}' already exists as a file", segments.join("/")),
                });
            };
            current = folder;
        }
        Ok(FolderHandle { segments })
    }

    /// Insert or overwrite a file under `folder`. Duplicate names resolve
    /// last-write-wins.
    pub fn add_file(&mut self, folder: &FolderHandle, name: &str, bytes: Vec<u8>) -> Result<()> {
        if name.is_empty() {
            return Err(PackError::ArchiveError {
                reason: "file names must be non-empty".to_string(),
            });
        }
        let target = self.folder_mut(&folder.segments)?;
        match target.entries.iter_mut().find(|e| e.name() == name) {
            Some(Entry::File { bytes: existing, .. }) => *existing = bytes,
            Some(Entry::Folder { .. }) => {
                return Err(PackError::ArchiveError {
                    reason: format!("'{}' already exists as a folder", name),
                });
            }
            None => target.entries.push(Entry::File {
                name: name.to_string(),
                bytes,
            }),
        }
        Ok(())
    }

    /// Number of file nodes reachable from the root.
    pub fn file_count(&self) -> usize {
        fn count(folder: &Folder) -> usize {
            folder
                .entries
                .iter()
                .map(|entry| match entry {
                    Entry::Folder { folder, .. } => count(folder),
                    Entry::File { .. } => 1,
                })
                .sum()
        }
        count(&self.root)
    }

    /// Serialize the whole tree into a zip blob. Empty folders are written
    /// as directory entries; an empty tree yields a valid empty zip.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        write_folder(&mut zip, "", &self.root)?;
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn folder_mut(&mut self, segments: &[String]) -> Result<&mut Folder> {
        let mut current = &mut self.root;
        for segment in segments {
            let idx = current
                .entries
                .iter()
                .position(|e| e.name() == segment.as_str())
                .ok_or_else(|| PackError::ArchiveError {
                    reason: format!("folder '{}' does not exist", segments.join("/")),
                })?;
            let Entry::Folder { folder, .. } = &mut current.entries[idx] else {
                return Err(PackError::ArchiveError {
                    reason: format!("'{}' is not a folder", segments.join("/")),
                });
            };
            current = folder;
        }
        Ok(current)
    }
}

fn write_folder(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    prefix: &str,
    folder: &Folder,
) -> Result<()> {
    for entry in &folder.entries {
        let path = if prefix.is_empty() {
            entry.name().to_string()
        } else {
            format!("{}/{}", prefix, entry.name())
        };
        match entry {
            Entry::Folder { folder, .. } => {
                zip.add_directory::<_, ()>(path.clone(), FileOptions::default())?;
                write_folder(zip, &path, folder)?;
            }
            Entry::File { bytes, .. } => {
                zip.start_file::<_, ()>(path, FileOptions::default())?;
                zip.write_all(bytes)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn open(data: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(data)).unwrap()
    }

    fn entry_names(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn empty_tree_serializes_to_empty_zip() {
        let builder = ArchiveBuilder::new();
        let data = builder.serialize().unwrap();
        let archive = open(data);
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn nested_folders_and_files_keep_their_paths() {
        let mut builder = ArchiveBuilder::new();
        let folder = builder.create_folder(&["ios", "2732x2048"]).unwrap();
        builder
            .add_file(&folder, "a.png", b"pixels".to_vec())
            .unwrap();

        let mut archive = open(builder.serialize().unwrap());
        let names = entry_names(&mut archive);
        assert_eq!(names, vec!["ios/", "ios/2732x2048/", "ios/2732x2048/a.png"]);

        let mut content = Vec::new();
        archive
            .by_name("ios/2732x2048/a.png")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"pixels");
    }

    #[test]
    fn create_folder_is_idempotent() {
        let mut builder = ArchiveBuilder::new();
        let first = builder.create_folder(&["ios", "1024x500"]).unwrap();
        let second = builder.create_folder(&["ios", "1024x500"]).unwrap();
        builder.add_file(&first, "a.png", b"one".to_vec()).unwrap();
        builder.add_file(&second, "b.png", b"two".to_vec()).unwrap();

        let mut archive = open(builder.serialize().unwrap());
        let names = entry_names(&mut archive);
        // One directory entry per folder, not one per create_folder call.
        assert_eq!(
            names,
            vec![
                "ios/",
                "ios/1024x500/",
                "ios/1024x500/a.png",
                "ios/1024x500/b.png"
            ]
        );
    }

    #[test]
    fn add_file_overwrites_with_last_write_wins() {
        let mut builder = ArchiveBuilder::new();
        let folder = builder.create_folder(&["android"]).unwrap();
        builder
            .add_file(&folder, "a.png", b"first".to_vec())
            .unwrap();
        builder
            .add_file(&folder, "a.png", b"second".to_vec())
            .unwrap();
        assert_eq!(builder.file_count(), 1);

        let mut archive = open(builder.serialize().unwrap());
        let mut content = Vec::new();
        archive
            .by_name("android/a.png")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"second");
    }

    #[test]
    fn empty_folder_still_appears_in_archive() {
        let mut builder = ArchiveBuilder::new();
        builder.create_folder(&["ios", "2208x1242"]).unwrap();

        let mut archive = open(builder.serialize().unwrap());
        let names = entry_names(&mut archive);
        assert_eq!(names, vec!["ios/", "ios/2208x1242/"]);
        assert_eq!(builder.file_count(), 0);
    }

    #[test]
    fn file_and_folder_names_cannot_collide() {
        let mut builder = ArchiveBuilder::new();
        let root = builder.root();
        builder.add_file(&root, "ios", b"oops".to_vec()).unwrap();
        assert!(builder.create_folder(&["ios"]).is_err());

        let mut builder = ArchiveBuilder::new();
        builder.create_folder(&["android"]).unwrap();
        let root = builder.root();
        assert!(builder.add_file(&root, "android", b"oops".to_vec()).is_err());
    }

    #[test]
    fn files_at_root_are_supported() {
        let mut builder = ArchiveBuilder::new();
        let root = builder.root();
        builder
            .add_file(&root, "failures.json", b"[]".to_vec())
            .unwrap();

        let mut archive = open(builder.serialize().unwrap());
        assert_eq!(entry_names(&mut archive), vec!["failures.json"]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut builder = ArchiveBuilder::new();
        builder.create_folder(&["ios"]).unwrap();
        builder.create_folder(&["android"]).unwrap();
        let ios = builder.create_folder(&["ios", "2732x2048"]).unwrap();
        builder.add_file(&ios, "z.png", b"z".to_vec()).unwrap();
        builder.add_file(&ios, "a.png", b"a".to_vec()).unwrap();

        let mut archive = open(builder.serialize().unwrap());
        let names = entry_names(&mut archive);
        assert_eq!(
            names,
            vec![
                "ios/",
                "ios/2732x2048/",
                "ios/2732x2048/z.png",
                "ios/2732x2048/a.png",
                "android/"
            ]
        );
    }
}
