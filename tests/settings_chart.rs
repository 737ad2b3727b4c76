use std::sync::Arc;

use stitchkit::settings::ChartStyleSetting;
use stitchkit::{ChartState, ChartStyle, Color, Config, SettingsPersistence, StitchLibrary};
use tempfile::TempDir;

#[test]
fn test_saved_settings_seed_new_charts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut persistence = SettingsPersistence::new(&path);
    {
        let config = persistence.config_mut();
        config.chart.style = ChartStyleSetting::Rounds;
        config.chart.cell_width = 20.0;
        config.colors.primary = Color::rgb(0, 128, 0);
        config.editor.undo_limit = 3;
    }
    persistence.save().unwrap();

    let loaded = SettingsPersistence::load_or_default(&path).unwrap();
    let config: Config = loaded.config().clone();
    assert_eq!(config.chart.style, ChartStyleSetting::Rounds);

    let mut chart = ChartState::new(Arc::new(config), Arc::new(StitchLibrary::builtin()));
    assert_eq!(chart.edit_color(), Color::rgb(0, 128, 0));
    assert_eq!(chart.history().max_depth(), 3);

    chart.create_rounds_chart(2, 6, "sc").unwrap();
    let scene = chart.scene();
    assert_eq!(scene.layout().style, ChartStyle::Rounds);
    assert_eq!(scene.layout().cell_size.width, 20.0);
    let cell = scene.cell(scene.cell_at(0, 0).unwrap()).unwrap();
    assert_eq!(cell.color, Color::rgb(0, 128, 0));
}

#[test]
fn test_missing_settings_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = SettingsPersistence::load_or_default(dir.path().join("none.toml")).unwrap();
    assert_eq!(loaded.config().chart.default_stitch, "ch");
}
