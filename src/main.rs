//! probectl - operator console for synthetic monitoring templates

use clap::Parser;
use colored::Colorize;

use probectl::cli::{Cli, Commands, ConfigCommands, RegionCommands, SlackCommands, TargetCommands};
use probectl::error::Result;
use probectl::logging;

mod commands;
mod utils;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("\n{}", hint.dimmed());
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { json } => commands::cmd_list(json),
        Commands::Show { template, json } => commands::cmd_show(&template, json),
        Commands::Edit { template } => commands::cmd_edit(&template),
        Commands::Set { template, interval, timeout } => {
            commands::cmd_set(&template, interval, timeout)
        }

        Commands::Region(RegionCommands::Add { template, code }) => {
            commands::cmd_region_add(&template, &code)
        }
        Commands::Region(RegionCommands::Rm { template, code }) => {
            commands::cmd_region_rm(&template, &code)
        }

        Commands::Slack(SlackCommands::Add { template, url }) => {
            commands::cmd_slack_add(&template, &url)
        }
        Commands::Slack(SlackCommands::Rm { template, number }) => {
            commands::cmd_slack_rm(&template, number)
        }

        Commands::Target(TargetCommands::Add {
            template,
            url,
            method,
            headers,
            body,
            verify,
        }) => commands::cmd_target_add(&template, url, method, headers, body, verify),
        Commands::Target(TargetCommands::Edit {
            template,
            number,
            url,
            method,
            headers,
            unset_headers,
            body,
            unset_body,
            verify,
        }) => commands::cmd_target_edit(
            &template, number, url, method, headers, unset_headers, body, unset_body, verify,
        ),
        Commands::Target(TargetCommands::Rm { template, number }) => {
            commands::cmd_target_rm(&template, number)
        }

        Commands::Verify { url, method, json } => commands::cmd_verify(&url, method, json),

        Commands::Config(ConfigCommands::Show) => commands::cmd_config_show(),
        Commands::Config(ConfigCommands::Set { api_url, timeout, method }) => {
            commands::cmd_config_set(api_url, timeout, method)
        }
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
