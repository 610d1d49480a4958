use clap::{Args, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# cardstack configuration

# Directory for the local image cache (default: platform data dir)
# data_dir: ~/.local/share/cardstack

# Page shown when no --page is given
default_page: "1"

image_host:
  # upload_url: https://api.imgbb.com/1/upload
  # api_key: your-image-host-key

store:
  # fixed: all devices share bin_id
  # auto:  each device creates its own document on first use
  mode: fixed
  # collection_url: https://api.jsonbin.io/v3/b
  # master_key: your-store-master-key
  # bin_id: your-document-id
  # bin_name: cardstack
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&redacted(config))?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.value.display());
                        println!("  source: {}", config.data_dir.source);
                        println!();

                        println!("default_page: {}", config.default_page.value);
                        println!("  source: {}", config.default_page.source);
                        println!();

                        println!("image_host:");
                        println!("  upload_url: {}", config.image_host.upload_url);
                        println!("  api_key: {}", mask(config.image_host.api_key.as_deref()));
                        println!();

                        println!("store:");
                        println!("  mode: {}", config.store.mode);
                        println!("  collection_url: {}", config.store.collection_url);
                        println!("  master_key: {}", mask(config.store.master_key.as_deref()));
                        println!(
                            "  bin_id: {}",
                            config.store.bin_id.as_deref().unwrap_or("(not set)")
                        );
                        println!("  bin_name: {}", config.store.bin_name);
                        println!(
                            "  status: {}",
                            if config.store.is_configured() {
                                "configured"
                            } else {
                                "not configured"
                            }
                        );
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'cardstack config show' to view current configuration.");
                    return Ok(());
                }

                // Create parent directory
                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to add your image host and store keys.");
                Ok(())
            }
        }
    }
}

fn mask(secret: Option<&str>) -> &'static str {
    match secret {
        Some(_) => "********",
        None => "(not set)",
    }
}

/// Copy of the config with secrets masked, for printing.
fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    shown.image_host.api_key = shown.image_host.api_key.map(|_| mask(Some("")).to_string());
    shown.store.master_key = shown.store.master_key.map(|_| mask(Some("")).to_string());
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.default_page.value, "1");
        assert!(!config.store.is_configured());
    }

    #[test]
    fn test_redacted_hides_secrets() {
        let temp_dir = tempdir().unwrap();
        let mut config = Config::load(Some(temp_dir.path().join("none.yaml"))).unwrap();
        config.store.master_key = Some("secret".to_string());

        let shown = redacted(&config);
        assert_eq!(shown.store.master_key.as_deref(), Some("********"));
        assert!(shown.image_host.api_key.is_none());
    }
}
