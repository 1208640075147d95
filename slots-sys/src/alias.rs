// SPDX-License-Identifier: GPL-3.0-only

//! Slot alias table loaded from the vdev_id configuration
//!
//! Only `alias <slotId> <path> ...` lines matter; the slot id order of first
//! appearance is the order slots are reported in.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, SysError};

/// Standard location of the alias configuration.
pub const DEFAULT_ALIAS_CONFIG: &str = "/etc/vdev_id.conf";

/// Ordered, duplicate-free list of configured slot ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    slot_ids: Vec<String>,
}

impl AliasTable {
    /// Read and parse the alias file. A missing or unreadable file is fatal
    /// for the caller: there is no usable partial table.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SysError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&content);
        debug!("Loaded {} slot aliases from {:?}", table.len(), path);
        Ok(table)
    }

    pub fn parse(input: &str) -> Self {
        let mut slot_ids: Vec<String> = Vec::new();

        for line in input.lines() {
            let mut fields = line.split_whitespace();
            if !line.starts_with("alias") || fields.next() != Some("alias") {
                continue;
            }

            let Some(slot_id) = fields.next() else {
                warn!("Ignoring alias line without a slot id: {:?}", line);
                continue;
            };

            if !slot_ids.iter().any(|existing| existing == slot_id) {
                slot_ids.push(slot_id.to_string());
            }
        }

        Self { slot_ids }
    }

    pub fn slot_ids(&self) -> &[String] {
        &self.slot_ids
    }

    pub fn len(&self) -> usize {
        self.slot_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AliasTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut slot_ids: Vec<String> = Vec::new();
        for slot_id in iter {
            let slot_id = slot_id.into();
            if !slot_ids.contains(&slot_id) {
                slot_ids.push(slot_id);
            }
        }
        Self { slot_ids }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    static COUNTER: AtomicU64 = AtomicU64::new(1);

    struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        fn new() -> Self {
            let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!(
                "slots-sys-alias-{}-{unique}",
                std::process::id()
            ));
            fs::create_dir_all(&path).expect("create temp dir");
            Self { path }
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    const SAMPLE: &str = "\
# by-vdev
multipath no
topology sas_direct
alias 1-1 /dev/disk/by-path/pci-0000:03:00.0-sas-phy0-lun-0
alias 1-2\t/dev/disk/by-path/pci-0000:03:00.0-sas-phy1-lun-0 extra fields
 alias 9-9 /dev/disk/by-path/indented-is-ignored
aliases 8-8 /dev/disk/by-path/not-an-alias
alias 1-10 /dev/disk/by-path/pci-0000:03:00.0-sas-phy9-lun-0
";

    #[test]
    fn parses_alias_lines_in_declaration_order() {
        let table = AliasTable::parse(SAMPLE);
        assert_eq!(table.slot_ids(), ["1-1", "1-2", "1-10"]);
    }

    #[test]
    fn duplicate_aliases_keep_first_position() {
        let table = AliasTable::parse(
            "alias 0-1 /dev/disk/by-path/a\nalias 0-0 /dev/disk/by-path/b\nalias 0-1 /dev/disk/by-path/c\n",
        );
        assert_eq!(table.slot_ids(), ["0-1", "0-0"]);
    }

    #[test]
    fn alias_without_slot_id_is_skipped() {
        let table = AliasTable::parse("alias\nalias 0-0 /dev/disk/by-path/a\n");
        assert_eq!(table.slot_ids(), ["0-0"]);
    }

    #[test]
    fn loads_from_file() {
        let temp = TempDir::new();
        let path = temp.path.join("vdev_id.conf");
        fs::write(&path, SAMPLE).expect("write alias file");

        let table = AliasTable::load(&path).expect("load alias file");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let temp = TempDir::new();
        let error = AliasTable::load(&temp.path.join("absent.conf")).unwrap_err();
        assert!(matches!(error, SysError::Config { .. }));
    }
}
