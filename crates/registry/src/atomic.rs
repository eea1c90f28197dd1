//! Atomic file replace: write to `<file>.tmp`, fsync, rename over the
//! target, rotating a bounded set of `.bak` backups of the previous
//! contents. Mirrors the teacher's snapshot rotation idiom, simplified
//! since the registry needs no WAL replay — it is re-read whole each tick
//! (§3.5).

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out. Keeps
/// up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

/// Atomically replace `path`'s contents with `bytes`. If `path` already
/// exists, its previous contents are rotated into a `.bak` file first
/// (best-effort — a failed backup never blocks the write).
pub fn atomic_replace(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    if path.exists() {
        let _ = fs::copy(path, rotate_bak_path(path));
    }

    let tmp_path = path.with_extension("tmp");
    {
        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(bytes)?;
        tmp.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
