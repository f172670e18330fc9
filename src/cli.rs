use clap::{Parser, Subcommand, ValueEnum};

use crate::template::Method;

/// Shell types for completion generation
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[derive(Parser)]
#[command(name = "probectl")]
#[command(author, version, about = "Edit synthetic monitoring templates and verify probe targets", long_about = None)]
#[command(after_help = r#"Examples:
  probectl list                                         List all templates
  probectl show checkout                                Show one template
  probectl edit checkout                                Interactive editor
  probectl region add checkout eu-west-1                Probe from another region
  probectl target add checkout --url https://shop.example.com/health --verify
  probectl verify https://example.com                   One-off probe of a URL
"#)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all templates
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of a template
    Show {
        /// Template name
        template: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a template interactively
    Edit {
        /// Template name
        template: String,
    },

    /// Change probe interval or timeout
    #[command(after_help = r#"Examples:
  probectl set checkout --interval 300
  probectl set checkout --timeout 10
"#)]
    Set {
        /// Template name
        template: String,

        /// Seconds between probe rounds
        #[arg(long)]
        interval: Option<u64>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Manage the regions a template probes from
    #[command(subcommand)]
    Region(RegionCommands),

    /// Manage Slack alert destinations
    #[command(subcommand)]
    Slack(SlackCommands),

    /// Manage probe targets
    #[command(subcommand)]
    Target(TargetCommands),

    /// Probe a URL once without saving anything
    #[command(after_help = r#"Examples:
  probectl verify https://example.com/health
  probectl verify http://internal:8080/ready --method POST
  probectl verify https://example.com --json
"#)]
    Verify {
        /// URL to probe
        url: String,

        /// HTTP method (GET, POST, PUT)
        #[arg(long, short = 'm')]
        method: Option<Method>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum RegionCommands {
    /// Add a region
    Add {
        /// Template name
        template: String,
        /// Region code, e.g. us-east-1
        code: String,
    },
    /// Remove a region
    #[command(alias = "remove")]
    Rm {
        /// Template name
        template: String,
        /// Region code
        code: String,
    },
}

#[derive(Subcommand)]
pub enum SlackCommands {
    /// Add a Slack webhook URL
    Add {
        /// Template name
        template: String,
        /// Webhook URL
        url: String,
    },
    /// Remove a Slack webhook URL by number (see `probectl show`)
    #[command(alias = "remove")]
    Rm {
        /// Template name
        template: String,
        /// Position, starting at 1
        number: usize,
    },
}

#[derive(Subcommand)]
pub enum TargetCommands {
    /// Add a target
    #[command(after_help = r#"Examples:
  probectl target add checkout --url https://shop.example.com/health
  probectl target add checkout --url https://api.example.com/orders --method POST \
      --header Authorization="Bearer abc" --body sku=42 --verify
"#)]
    Add {
        /// Template name
        template: String,

        /// Probe URL
        #[arg(long)]
        url: String,

        /// HTTP method (GET, POST, PUT)
        #[arg(long, short = 'm')]
        method: Option<Method>,

        /// Request header as KEY=VALUE (repeatable)
        #[arg(long = "header", short = 'H', value_parser = parse_key_value)]
        headers: Vec<(String, String)>,

        /// Body field as KEY=VALUE (repeatable)
        #[arg(long = "body", short = 'b', value_parser = parse_key_value)]
        body: Vec<(String, String)>,

        /// Probe the target before saving it
        #[arg(long)]
        verify: bool,
    },

    /// Modify a target by number (see `probectl show`)
    Edit {
        /// Template name
        template: String,

        /// Target number, starting at 1
        number: usize,

        /// New probe URL
        #[arg(long)]
        url: Option<String>,

        /// New HTTP method
        #[arg(long, short = 'm')]
        method: Option<Method>,

        /// Add a request header as KEY=VALUE (repeatable)
        #[arg(long = "header", short = 'H', value_parser = parse_key_value)]
        headers: Vec<(String, String)>,

        /// Remove a request header by key (repeatable)
        #[arg(long = "unset-header")]
        unset_headers: Vec<String>,

        /// Add a body field as KEY=VALUE (repeatable)
        #[arg(long = "body", short = 'b', value_parser = parse_key_value)]
        body: Vec<(String, String)>,

        /// Remove a body field by key (repeatable)
        #[arg(long = "unset-body")]
        unset_body: Vec<String>,

        /// Probe the target before saving it
        #[arg(long)]
        verify: bool,
    },

    /// Remove a target by number
    #[command(alias = "remove")]
    Rm {
        /// Template name
        template: String,
        /// Target number, starting at 1
        number: usize,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Persist configuration values
    Set {
        /// Backend base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Default HTTP method for new targets
        #[arg(long)]
        method: Option<Method>,
    },
}

/// Parse `KEY=VALUE`; the value may itself contain `=`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("a=b").unwrap(), ("a".into(), "b".into()));
        assert_eq!(
            parse_key_value("Authorization=Bearer x=y").unwrap(),
            ("Authorization".into(), "Bearer x=y".into())
        );
        assert_eq!(parse_key_value("empty=").unwrap(), ("empty".into(), String::new()));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=v").is_err());
    }

    #[test]
    fn test_parse_target_add() {
        let cli = Cli::try_parse_from([
            "probectl", "target", "add", "web", "--url", "https://a.b", "-m", "post",
            "-H", "X-A=1", "--body", "k=v", "--verify",
        ])
        .unwrap();
        match cli.command {
            Commands::Target(TargetCommands::Add { template, method, headers, body, verify, .. }) => {
                assert_eq!(template, "web");
                assert_eq!(method, Some(Method::Post));
                assert_eq!(headers, vec![("X-A".to_string(), "1".to_string())]);
                assert_eq!(body.len(), 1);
                assert!(verify);
            }
            _ => panic!("expected target add"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["probectl", "list", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
