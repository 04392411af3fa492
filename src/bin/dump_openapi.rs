use std::fs;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let doc = resetpower_api::docs::build_openapi();
    let s = serde_json::to_string_pretty(&doc)?;

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("openapi.json"));
    fs::write(&path, s)?;
    println!("wrote {}", path.display());
    Ok(())
}
