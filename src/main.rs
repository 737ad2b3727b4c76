use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use stitchkit::settings::ChartStyleSetting;
use stitchkit::{init_logging, ChartState, Config, SettingsPersistence, StitchLibrary};

/// Builds a chart from the saved settings and writes it out as a chart
/// document and a PNG preview.
///
/// Usage: `stitchkit [output-dir]`
fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("StitchKit {} (built {})", stitchkit::VERSION, stitchkit::BUILD_DATE);

    let settings = match SettingsPersistence::at_default_location() {
        Ok(default) => SettingsPersistence::load_or_default(default.path().to_path_buf())
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable settings: {}", e);
                default
            }),
        Err(e) => {
            tracing::warn!("No config location: {}", e);
            SettingsPersistence::new("stitchkit.toml")
        }
    };
    let config: Config = settings.config().clone();

    let mut library = StitchLibrary::builtin();
    library.set_default_stitch(config.chart.default_stitch.clone());
    let mut chart = ChartState::new(Arc::new(config.clone()), Arc::new(library));

    let (rows, columns) = (config.chart.default_rows, config.chart.default_columns);
    let stitch = config.chart.default_stitch.clone();
    match config.chart.style {
        ChartStyleSetting::Rows => chart.create_rows_chart(rows, columns, &stitch)?,
        ChartStyleSetting::Rounds => chart.create_rounds_chart(rows, columns, &stitch)?,
        ChartStyleSetting::Blank => chart.create_blank_chart(),
    }
    chart.set_show_chart_center(config.chart.show_chart_center);

    let scene = chart.scene();
    println!(
        "{:?} chart: {} rows, {} items",
        scene.layout().style,
        scene.grid().row_count(),
        scene.item_count()
    );

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let doc_path = out_dir.join("chart.json");
    scene.to_document("Untitled").save_to_file(&doc_path)?;
    println!("Wrote {}", doc_path.display());

    let png_path = out_dir.join("chart.png");
    chart
        .render(800, 800)
        .save(&png_path)
        .with_context(|| format!("Failed to write {}", png_path.display()))?;
    println!("Wrote {}", png_path.display());

    Ok(())
}
