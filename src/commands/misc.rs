//! Miscellaneous commands: config, completions

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;

use probectl::cli::{Cli, CompletionShell};
use probectl::config::{Config, API_URL_ENV};
use probectl::error::{ConsoleError, Result};
use probectl::template::Method;

pub fn cmd_config_show() -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load()?;

    println!("\n  {}", "Configuration".bold());
    println!("    File:     {}", path.display());
    println!("    API URL:  {}", config.api_url);
    if std::env::var(API_URL_ENV).is_ok() {
        println!("              (from {})", API_URL_ENV);
    }
    println!("    Timeout:  {}s", config.request_timeout_secs);
    println!("    Method:   {}", config.default_method);
    println!();
    Ok(())
}

pub fn cmd_config_set(api_url: Option<String>, timeout: Option<u64>, method: Option<Method>) -> Result<()> {
    let path = Config::config_path()?;
    let mut config = Config::load_from(&path)?;

    if let Some(api_url) = api_url {
        config.api_url = api_url;
        config.api_base()?;
    }
    if let Some(timeout) = timeout {
        if timeout == 0 {
            return Err(ConsoleError::ConfigError("timeout must be at least 1 second".into()));
        }
        config.request_timeout_secs = timeout;
    }
    if let Some(method) = method {
        config.default_method = method;
    }

    config.save_to(&path)?;
    println!("{} Configuration saved to {}", "✓".green(), path.display());
    Ok(())
}

pub fn cmd_completions(shell: CompletionShell) -> Result<()> {
    let mut cmd = Cli::command();
    let shell = match shell {
        CompletionShell::Bash => Shell::Bash,
        CompletionShell::Zsh => Shell::Zsh,
        CompletionShell::Fish => Shell::Fish,
        CompletionShell::Powershell => Shell::PowerShell,
    };
    generate(shell, &mut cmd, "probectl", &mut io::stdout());
    Ok(())
}
