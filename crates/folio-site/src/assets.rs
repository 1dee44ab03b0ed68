//! Static assets copied verbatim from the public directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::SiteError;

/// A file under the public directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    /// Output path with `/` separators (e.g. `img/chart.png`).
    pub rel_path: String,
    pub abs_path: PathBuf,
}

/// List every file under `dir`, sorted by path. A missing directory has no
/// assets.
pub fn collect(dir: &Path) -> Result<Vec<Asset>, SiteError> {
    let mut assets = Vec::new();
    if dir.is_dir() {
        walk(dir, "", &mut assets)?;
    }
    assets.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(assets)
}

fn walk(dir: &Path, prefix: &str, assets: &mut Vec<Asset>) -> Result<(), SiteError> {
    for entry in fs::read_dir(dir).map_err(SiteError::io(dir))? {
        let entry = entry.map_err(SiteError::io(dir))?;
        let abs_path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel_path = format!("{prefix}{name}");

        let file_type = entry.file_type().map_err(SiteError::io(&abs_path))?;
        if file_type.is_dir() {
            walk(&abs_path, &format!("{rel_path}/"), assets)?;
        } else {
            assets.push(Asset { rel_path, abs_path });
        }
    }
    Ok(())
}

/// Copy assets into `output_dir`, preserving their relative paths.
pub fn copy(assets: &[Asset], output_dir: &Path) -> Result<(), SiteError> {
    for asset in assets {
        let dest = output_dir.join(&asset.rel_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(SiteError::io(parent))?;
        }
        fs::copy(&asset.abs_path, &dest).map_err(SiteError::io(&asset.abs_path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect_and_copy() {
        let public = tempfile::tempdir().unwrap();
        fs::create_dir_all(public.path().join("img")).unwrap();
        fs::write(public.path().join("styles.css"), "body{}").unwrap();
        fs::write(public.path().join("img/chart.png"), [0u8, 1, 2]).unwrap();

        let assets = collect(public.path()).unwrap();
        let paths: Vec<_> = assets.iter().map(|a| a.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["img/chart.png", "styles.css"]);

        let out = tempfile::tempdir().unwrap();
        copy(&assets, out.path()).unwrap();
        assert_eq!(fs::read(out.path().join("img/chart.png")).unwrap(), vec![0, 1, 2]);
        assert_eq!(
            fs::read_to_string(out.path().join("styles.css")).unwrap(),
            "body{}"
        );
    }

    #[test]
    fn test_collect_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect(&dir.path().join("public")).unwrap().is_empty());
    }
}
