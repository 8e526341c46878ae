use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use mosaic_core::gallery::manifest;
use mosaic_core::layout::rendered_height;
use mosaic_core::AppConfig;

pub fn run(config: &AppConfig, manifest_path: &Path) -> Result<()> {
    // Parse errors, bad heights and duplicate ids surface here
    let items = manifest::load(manifest_path)?;

    if items.is_empty() {
        println!("{}: no items", manifest_path.display());
        return Ok(());
    }

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for item in &items {
        *kinds.entry(item.media.kind().label()).or_default() += 1;
    }

    let missing: Vec<&str> = items
        .iter()
        .filter(|item| item.media.is_missing())
        .map(|item| item.id.as_str())
        .collect();
    let untitled: Vec<&str> = items
        .iter()
        .filter(|item| {
            item.title
                .as_ref()
                .and_then(|t| t.resolve(&config.general.locale, &config.general.fallback_locale))
                .is_none()
        })
        .map(|item| item.id.as_str())
        .collect();
    let total_height: f64 = items.iter().map(rendered_height).sum();

    println!("{}: {} items OK\n", manifest_path.display(), items.len());
    for (kind, count) in &kinds {
        println!("  {:<16} {}", kind, count);
    }
    println!("\n  Rendered height (one column): {:.1}", total_height);

    if !missing.is_empty() {
        println!("\n  Missing media ({}): {}", missing.len(), missing.join(", "));
    }
    if !untitled.is_empty() {
        println!(
            "\n  No '{}' title ({}): {}",
            config.general.locale,
            untitled.len(),
            untitled.join(", ")
        );
    }

    Ok(())
}
