// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
//! Patch persistence. Each slot is one file under `<root>/tmixpatch/`:
//!
//! ```text
//! 0..4    "TMP0"
//! 4..12   name, ASCII, space padded
//! 12..    repeated (id: u16 little endian, value: u8)
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, warn};

use crate::params::Registry;

use super::{Patch, NAME_LENGTH, SLOTS};

const SIGNATURE: &[u8; 4] = b"TMP0";
const HEADER_LENGTH: usize = SIGNATURE.len() + NAME_LENGTH;
const RECORD_LENGTH: usize = 3;
const DIRECTORY: &str = "tmixpatch";
const EXTENSION: &str = "tmixpatch";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("patch storage at {path} is unavailable: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("patch file signature mismatch")]
    SignatureMismatch,

    #[error("patch file truncated at {len} bytes")]
    Truncated { len: usize },

    #[error("patch slot {0} is out of range")]
    SlotOutOfRange(u8),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Loads and saves patches in a directory.
pub struct PatchStore {
    directory: PathBuf,
    registry: Arc<Registry>,
}

impl PatchStore {
    /// Opens the store rooted at `root`, creating its directory if needed.
    pub fn open(root: &Path, registry: Arc<Registry>) -> Result<PatchStore, Error> {
        let directory = root.join(DIRECTORY);
        fs::create_dir_all(&directory).map_err(|source| Error::StorageUnavailable {
            path: directory.clone(),
            source,
        })?;

        info!(directory = %directory.display(), "Opened patch store.");
        Ok(PatchStore {
            directory,
            registry,
        })
    }

    /// The file backing the given slot.
    pub fn path(&self, number: u8) -> PathBuf {
        self.directory.join(format!("{}.{}", number, EXTENSION))
    }

    /// Loads a slot. Anything unreadable comes back as the initial patch.
    pub fn load(&self, number: u8) -> Patch {
        match self.try_load(number) {
            Ok(patch) => patch,
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(patch = number, "Empty patch slot, using initial patch.");
                Patch::init(&self.registry)
            }
            Err(e) => {
                warn!(patch = number, err = %e, "Unable to load patch, using initial patch.");
                Patch::init(&self.registry)
            }
        }
    }

    /// Loads a slot, surfacing any read or decode error.
    pub fn try_load(&self, number: u8) -> Result<Patch, Error> {
        check_slot(number)?;
        let bytes = fs::read(self.path(number))?;
        decode(&bytes, &self.registry)
    }

    /// Writes a patch to a slot, replacing what was there. The previous
    /// content survives a failed write.
    pub fn save(&self, number: u8, patch: &Patch) -> Result<(), Error> {
        check_slot(number)?;
        let path = self.path(number);
        let staging = path.with_extension(format!("{}.tmp", EXTENSION));

        fs::write(&staging, encode(patch))?;
        fs::rename(&staging, &path)?;

        info!(patch = number, name = %patch.name(), "Saved patch.");
        Ok(())
    }

    /// Removes every stored patch.
    pub fn delete_all(&self) -> Result<(), Error> {
        for number in 0..SLOTS {
            match fs::remove_file(self.path(number)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        warn!(directory = %self.directory.display(), "Deleted all patches.");
        Ok(())
    }

    /// Lists the occupied slots that decode cleanly, with their names.
    pub fn list(&self) -> Vec<(u8, String)> {
        (0..SLOTS)
            .filter(|number| self.path(*number).exists())
            .filter_map(|number| match self.try_load(number) {
                Ok(patch) => Some((number, patch.name())),
                Err(e) => {
                    warn!(patch = number, err = %e, "Skipping unreadable patch.");
                    None
                }
            })
            .collect()
    }

    /// Copies every occupied slot from one store into another, byte for
    /// byte. Returns the number of slots copied.
    pub fn copy_all(from: &PatchStore, to: &PatchStore) -> Result<usize, Error> {
        let mut copied = 0;
        for number in 0..SLOTS {
            let source = from.path(number);
            if !source.exists() {
                continue;
            }
            fs::copy(&source, to.path(number))?;
            copied += 1;
        }

        info!(
            from = %from.directory.display(),
            to = %to.directory.display(),
            copied,
            "Copied patches."
        );
        Ok(copied)
    }
}

fn check_slot(number: u8) -> Result<(), Error> {
    if number >= SLOTS {
        return Err(Error::SlotOutOfRange(number));
    }
    Ok(())
}

/// Serializes a patch into the slot file layout.
pub fn encode(patch: &Patch) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LENGTH + patch.len() * RECORD_LENGTH);
    buf.extend_from_slice(SIGNATURE);
    buf.extend_from_slice(patch.name_bytes());
    for (id, value) in patch.iter() {
        buf.extend_from_slice(&id.to_le_bytes());
        buf.push(value);
    }
    buf
}

/// Reads the slot file layout. Parameters missing from the file keep their
/// initial values, unknown ones are dropped and values above a parameter's
/// maximum are clamped.
pub fn decode(bytes: &[u8], registry: &Registry) -> Result<Patch, Error> {
    if bytes.len() < SIGNATURE.len() {
        return Err(Error::Truncated { len: bytes.len() });
    }
    if &bytes[..SIGNATURE.len()] != SIGNATURE {
        return Err(Error::SignatureMismatch);
    }
    if bytes.len() < HEADER_LENGTH {
        return Err(Error::Truncated { len: bytes.len() });
    }

    let mut patch = Patch::init(registry);
    patch.set_name_bytes(&bytes[SIGNATURE.len()..HEADER_LENGTH]);

    let records = bytes[HEADER_LENGTH..].chunks_exact(RECORD_LENGTH);
    let trailing = records.remainder().len();
    for record in records {
        let id = u16::from_le_bytes([record[0], record[1]]);
        let value = record[2];
        match registry.by_id(id) {
            Some(descriptor) => {
                patch.set(id, value, descriptor.max());
            }
            None => warn!(id, value, "Dropping unknown parameter from patch."),
        }
    }

    if trailing > 0 {
        warn!(bytes = trailing, "Ignoring partial record at end of patch.");
    }

    Ok(patch)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;

    fn store() -> (tempfile::TempDir, PatchStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PatchStore::open(dir.path(), Arc::new(Registry::standard().unwrap())).unwrap();
        (dir, store)
    }

    #[test]
    fn test_empty_slot_loads_initial_patch() {
        let (_dir, store) = store();
        let patch = store.load(0);
        assert_eq!(patch, Patch::init(&store.registry));
        assert_eq!(patch.name(), "Init    ");
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = store();
        let mut patch = Patch::init(&store.registry);
        patch.set_name("Pad 2");
        patch.set(200, 10, 127);
        patch.set(207, 3, 6);
        patch.set(501, 40, 92);

        store.save(9, &patch).unwrap();
        assert_eq!(store.load(9), patch);
        assert_eq!(store.list(), vec![(9, "Pad 2   ".to_string())]);
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, store) = store();
        let mut patch = Patch::init(&store.registry);
        store.save(1, &patch).unwrap();

        patch.set_name("Second");
        store.save(1, &patch).unwrap();
        assert_eq!(store.load(1).name(), "Second  ");
        assert!(!store.path(1).with_extension("tmixpatch.tmp").exists());
    }

    #[test]
    fn test_file_layout() {
        let mut patch = Patch::new("Ab");
        patch.set(0x0102, 7, 127);
        patch.set(1, 9, 127);

        let bytes = encode(&patch);
        assert_eq!(&bytes[0..4], b"TMP0");
        assert_eq!(&bytes[4..12], b"Ab      ");
        assert_eq!(&bytes[12..], &[1, 0, 9, 2, 1, 7]);
    }

    #[test]
    fn test_signature_mismatch_falls_back() {
        let (_dir, store) = store();
        fs::write(store.path(2), b"XXXXInit    ").unwrap();

        assert!(matches!(store.try_load(2), Err(Error::SignatureMismatch)));
        assert_eq!(store.load(2), Patch::init(&store.registry));
    }

    #[test]
    fn test_truncated_falls_back() {
        let (_dir, store) = store();
        fs::write(store.path(3), b"TMP0Ini").unwrap();

        assert!(matches!(store.try_load(3), Err(Error::Truncated { len: 7 })));
        assert_eq!(store.load(3), Patch::init(&store.registry));

        fs::write(store.path(3), b"TM").unwrap();
        assert!(matches!(store.try_load(3), Err(Error::Truncated { len: 2 })));
    }

    #[test]
    fn test_decode_defaults_unknown_and_clamping() {
        let registry = Registry::standard().unwrap();
        let mut bytes = b"TMP0Custom  ".to_vec();
        // Unknown id 9999.
        bytes.extend_from_slice(&[0x0f, 0x27, 5]);
        // Filter mode above its maximum.
        bytes.extend_from_slice(&[207u16.to_le_bytes()[0], 207u16.to_le_bytes()[1], 100]);
        // Partial trailing record.
        bytes.extend_from_slice(&[1, 0]);

        let patch = decode(&bytes, &registry).unwrap();
        assert_eq!(patch.name(), "Custom  ");
        assert!(!patch.contains(9999));
        assert_eq!(patch.get(207), 6);
        // Untouched parameters keep their initial values.
        assert_eq!(patch.get(1), 50);
        assert_eq!(patch.len(), registry.len());
    }

    #[test]
    fn test_slot_out_of_range() {
        let (_dir, store) = store();
        let patch = Patch::init(&store.registry);
        assert!(matches!(
            store.save(64, &patch),
            Err(Error::SlotOutOfRange(64))
        ));
    }

    #[test]
    fn test_delete_all() {
        let (_dir, store) = store();
        let patch = Patch::init(&store.registry);
        store.save(0, &patch).unwrap();
        store.save(63, &patch).unwrap();

        store.delete_all().unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_copy_all() {
        let (_from_dir, from) = store();
        let (_to_dir, to) = store();

        let mut patch = Patch::init(&from.registry);
        patch.set_name("Copied");
        from.save(5, &patch).unwrap();
        from.save(12, &patch).unwrap();

        assert_eq!(PatchStore::copy_all(&from, &to).unwrap(), 2);
        assert_eq!(to.load(5), patch);
        assert_eq!(to.load(12), patch);
    }

    #[test]
    fn test_unavailable_storage() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-directory");
        fs::write(&file, b"").unwrap();

        let result = PatchStore::open(&file, Arc::new(Registry::standard().unwrap()));
        assert!(matches!(result, Err(Error::StorageUnavailable { .. })));
    }
}
