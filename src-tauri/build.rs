// App commands get generated allow-/deny- permissions so capabilities can
// grant each one to specific webviews and origins.
const COMMANDS: &[&str] = &[
    "focus_acquired",
    "split_divider",
    "split_focus",
    "split_key",
    "split_reload",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let attributes = tauri_build::Attributes::new()
        .app_manifest(tauri_build::AppManifest::new().commands(COMMANDS));
    tauri_build::try_build(attributes)?;
    Ok(())
}
