use tacho_core::{Config, Result};

pub fn run() -> Result<()> {
    let limits = Config::load()?.limits()?;
    println!("{}", serde_json::to_string_pretty(&limits)?);
    Ok(())
}
