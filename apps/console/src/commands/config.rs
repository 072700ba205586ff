//! # Config Commands
//!
//! `config show` prints the effective configuration (file plus
//! environment); `config init` writes it out as console.toml.

use clap::Subcommand;
use std::path::PathBuf;

use sapore_client::ClientConfig;

use crate::error::CommandResult;
use crate::output::{or_dash, CommandOutput};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to console.toml
    Init,
}

pub fn run(config: &ClientConfig, path: Option<PathBuf>, command: ConfigCommand) -> CommandResult<CommandOutput> {
    match command {
        ConfigCommand::Show => {
            let text = format!(
                "API: {}\nTimeout: {} s\nSessão: {}\nDebounce da busca: {} ms\nArquivo: {}",
                config.api.base_url,
                config.api.timeout_secs,
                or_dash(config.token_path().map(|p| p.display().to_string())),
                config.search.debounce_ms,
                or_dash(
                    path.or_else(ClientConfig::default_config_path)
                        .map(|p| p.display().to_string())
                ),
            );
            CommandOutput::new(text, config)
        }
        ConfigCommand::Init => {
            let written = config.save(path)?;
            Ok(CommandOutput::message(format!(
                "Configuração salva em {}.",
                written.display()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.toml");
        let mut config = ClientConfig::default();
        config.api.base_url = "https://api.santsapore.com.br".to_string();

        let out = run(&config, Some(path.clone()), ConfigCommand::Init).unwrap();
        assert!(out.text().contains("console.toml"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("base_url = \"https://api.santsapore.com.br\""), "{}", text);
    }

    #[test]
    fn test_show() {
        let out = run(&ClientConfig::default(), None, ConfigCommand::Show).unwrap();
        assert!(out.text().starts_with("API: http://localhost:8080"));
        assert_eq!(out.json()["search"]["debounce_ms"], 400);
    }
}
