use std::path::Path;

use anyhow::{bail, Result};

use mosaic_core::gallery::manifest;
use mosaic_core::selection::{external_key, resolve_key};
use mosaic_core::AppConfig;
use mosaic_tui::link::extract_key;

pub fn run(config: &AppConfig, manifest_path: &Path, input: &str) -> Result<()> {
    let items = manifest::load(manifest_path)?;

    let Some(key) = extract_key(input, &config.navigation.deep_link_param) else {
        bail!("'{}' does not carry a '{}' key", input, config.navigation.deep_link_param);
    };

    match resolve_key(&items, &key) {
        Some(index) => {
            let item = &items[index];
            let title = item.display_title(&config.general.locale, &config.general.fallback_locale);
            println!("{}  {}  {}", index, external_key(item), title);
            if external_key(item) != key {
                println!("  (matched by title; canonical key is '{}')", external_key(item));
            }
            Ok(())
        }
        None => bail!("No item matches key '{}'", key),
    }
}
