use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, bail};

use crate::config;

pub fn open_input(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Write `dest` through a temporary sibling that is renamed into place only
/// once `fill` has succeeded. A failed run leaves no file behind.
pub fn write_atomically<T, F>(dest: &Path, overwrite: bool, fill: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> huffpress::Result<T>,
{
    if dest.exists() && !overwrite {
        bail!("{} already exists (use --force to overwrite)", dest.display());
    }

    let temp_path = config::temp_path(dest);
    let file = File::create(&temp_path)
        .with_context(|| format!("cannot create {}", temp_path.display()))?;

    match fill_and_flush(BufWriter::new(file), fill) {
        Ok(value) => {
            fs::rename(&temp_path, dest)
                .with_context(|| format!("cannot move output to {}", dest.display()))?;
            Ok(value)
        }
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            Err(err)
        }
    }
}

fn fill_and_flush<T, F>(mut writer: BufWriter<File>, fill: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> huffpress::Result<T>,
{
    let value = fill(&mut writer)?;
    writer.flush()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_and_renames() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("out.huf");

        let n = write_atomically(&dest, false, |w| {
            w.write_all(b"payload")?;
            Ok(7)
        })
        .unwrap();

        assert_eq!(n, 7);
        assert_eq!(fs::read(&dest).unwrap(), b"payload");
        assert!(!config::temp_path(&dest).exists());
    }

    #[test]
    fn refuses_to_clobber_without_overwrite() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("existing");
        fs::write(&dest, b"keep me").unwrap();

        assert!(write_atomically(&dest, false, |_| Ok(())).is_err());
        assert_eq!(fs::read(&dest).unwrap(), b"keep me");

        write_atomically(&dest, true, |w| Ok(w.write_all(b"new")?)).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn failed_fill_leaves_nothing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("broken");

        let result: anyhow::Result<()> = write_atomically(&dest, false, |w| {
            w.write_all(b"partial")?;
            Err(huffpress::Error::ChecksumMismatch)
        });

        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!config::temp_path(&dest).exists());
    }

    #[test]
    fn missing_input_names_the_path() {
        let dir = tempdir().unwrap();
        let err = open_input(&dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
