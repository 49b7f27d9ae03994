use std::fs;

fn main() -> anyhow::Result<()> {
    // The crate name has a hyphen in Cargo.toml; Rust replaces '-' with '_' for the crate identifier.
    let doc = team_dashboard::docs::build_openapi(8000);
    let s = serde_json::to_string_pretty(&doc)?;

    match std::env::args().nth(1) {
        Some(path) => {
            fs::write(&path, s)?;
            println!("wrote {}", path);
        }
        None => println!("{s}"),
    }
    Ok(())
}
