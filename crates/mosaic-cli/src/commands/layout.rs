use std::path::Path;

use anyhow::{bail, Result};

use mosaic_core::gallery::manifest;
use mosaic_core::layout::{self, BreakpointTable};
use mosaic_core::AppConfig;

pub fn run(config: &AppConfig, manifest_path: &Path, width: f64, columns: Option<usize>) -> Result<()> {
    if !width.is_finite() || width <= 0.0 {
        bail!("Width must be a positive number, got {}", width);
    }

    let items = manifest::load(manifest_path)?;
    let table = BreakpointTable::new(config.layout.breakpoints.clone());
    let columns = columns.unwrap_or_else(|| table.columns_for(width));
    let result = layout::layout(&items, columns, width);

    println!(
        "{} items, {} columns of {:.1}px{}\n",
        result.tiles.len(),
        result.columns.len(),
        result.column_width,
        if table.is_compact(width) { " (compact)" } else { "" }
    );
    println!("{:>5}  {:<24} {:>3} {:>9} {:>9} {:>9} {:>9}", "#", "id", "col", "x", "y", "width", "height");

    for tile in &result.tiles {
        println!(
            "{:>5}  {:<24} {:>3} {:>9.1} {:>9.1} {:>9.1} {:>9.1}",
            tile.index,
            tile.id.as_str(),
            tile.column,
            tile.rect.x,
            tile.rect.y,
            tile.rect.width,
            tile.rect.height
        );
    }

    let heights: Vec<String> = result
        .columns
        .heights()
        .iter()
        .map(|h| format!("{:.1}", h))
        .collect();
    println!("\nColumn heights: [{}]", heights.join(", "));
    println!("Content height: {:.1}", result.content_height());

    Ok(())
}
