use std::path::{Path, PathBuf};

use anyhow::Context;
use dictionary_adapter_axum::run_app;
use dictionary_core::manifest::ManifestLoader;
use dictionary_core::DictionaryApp;

const MANIFEST_ENV: &str = "DICTIONARY_MANIFEST";
const DEFAULT_MANIFEST: &str = "dictionary.toml";

fn main() -> anyhow::Result<()> {
    let loader = load_manifest()?;
    run_app::<DictionaryApp>(&loader)
}

/// An explicit `DICTIONARY_MANIFEST` must exist; the default `dictionary.toml` is optional.
fn load_manifest() -> anyhow::Result<ManifestLoader> {
    if let Some(path) = std::env::var_os(MANIFEST_ENV) {
        let path = PathBuf::from(path);
        return ManifestLoader::from_path(&path)
            .with_context(|| format!("failed to load manifest from {}", path.display()));
    }

    let path = Path::new(DEFAULT_MANIFEST);
    if path.exists() {
        ManifestLoader::from_path(path)
            .with_context(|| format!("failed to load manifest from {}", path.display()))
    } else {
        Ok(ManifestLoader::default())
    }
}
