//! Built-in formats plus user profiles loaded from disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tally_ingest::{FormatProfile, FormatRegistry};
use tracing::{debug, info};

/// Built-in registry extended with every `*.toml` profile in `dir`.
///
/// A missing directory is not an error. A user profile with a built-in id
/// replaces the built-in.
pub fn load_registry(dir: &Path) -> Result<FormatRegistry> {
    let mut registry = FormatRegistry::builtin().context("compile built-in formats")?;
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "no formats directory");
        return Ok(registry);
    }

    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    for path in paths {
        let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let profile: FormatProfile =
            toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        let id = profile.id.clone();
        registry
            .register(profile)
            .with_context(|| format!("load {}", path.display()))?;
        info!(format = %id, path = %path.display(), "registered format profile");
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tally-registry-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_dir_gives_builtins() {
        let registry = load_registry(Path::new("/nonexistent/tally/formats")).unwrap();
        assert!(registry.contains("capitec"));
        assert!(registry.contains("tymebank"));
    }

    #[test]
    fn test_loads_toml_profiles() {
        let dir = scratch("load");
        fs::write(
            dir.join("iso.toml"),
            r#"
id = "iso-bank"
reference_prefix = "ISO"

[[date_patterns]]
pattern = '\d{4}-\d{2}-\d{2}'
format = "%Y-%m-%d"
"#,
        )
        .unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let registry = load_registry(&dir).unwrap();
        assert!(registry.contains("iso-bank"));
        assert_eq!(registry.len(), 3);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_invalid_profile_is_an_error() {
        let dir = scratch("invalid");
        fs::write(dir.join("bad.toml"), "id = \"bad\"\nreference_prefix = \"B\"\ndate_patterns = []\n")
            .unwrap();
        let err = load_registry(&dir).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
