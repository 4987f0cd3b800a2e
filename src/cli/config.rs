use crate::config::generate::generate_starter_config;
use crate::config::LOCAL_CONFIG_FILES;
use std::fs;
use std::path::{Path, PathBuf};

/// Print the starter config, or write it to `path` (default `./curate.yml`).
pub fn init(stdout: bool, path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config_content = generate_starter_config();

    if stdout {
        print!("{}", config_content);
        return Ok(());
    }

    let config_path = path.unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILES[0]));
    write_config(&config_content, &config_path)?;
    println!("Config file written to {}", config_path.display());
    Ok(())
}

fn write_config(config_content: &str, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        return Err(format!(
            "config file already exists at {}; remove it first or use --stdout",
            path.display()
        )
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, config_content)?;
    Ok(())
}

/// Load and validate a config file without running anything.
pub fn validate(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path.ok_or("no config file found; use --config to specify a path")?;

    println!("Validating config file: {}", path.display());
    crate::config::load_config(&path)?;
    println!("✓ Config is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_starter_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf/curate.yml");

        init(false, Some(path.clone())).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, generate_starter_config());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("curate.yml");
        fs::write(&path, "dedupFields: [id]\n").unwrap();

        let err = init(false, Some(path.clone())).unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "dedupFields: [id]\n");
    }

    #[test]
    fn test_validate_reports_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("curate.yml");
        fs::write(&path, "dedupFields: ['a..b']\n").unwrap();

        assert!(validate(Some(path)).is_err());
        assert!(validate(None).is_err());
    }
}
