//! Template commands: list, show, set, region, slack

use colored::Colorize;

use probectl::client::ApiClient;
use probectl::config::Config;
use probectl::document::TemplateDocument;
use probectl::error::Result;
use probectl::template::{Region, Target};

use super::{edit_and_save, Backend};
use crate::utils::{format_interval, to_index, truncate_str};

/// List all templates
pub fn cmd_list(json: bool) -> Result<()> {
    let config = Config::load()?;
    let client = ApiClient::from_config(&config)?;
    let templates = client.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&templates)?);
        return Ok(());
    }

    if templates.is_empty() {
        println!("No templates found at {}.", client.base());
        return Ok(());
    }

    let max_name_len = templates.iter().map(|t| t.name.len()).max().unwrap_or(20).clamp(4, 30);

    println!(
        "\n  {:<width$}  {:>7}  {:>7}  {:>8}  {:>7}",
        "NAME", "REGIONS", "TARGETS", "INTERVAL", "TIMEOUT",
        width = max_name_len
    );
    for t in &templates {
        println!(
            "  {:<width$}  {:>7}  {:>7}  {:>8}  {:>7}",
            truncate_str(&t.name, max_name_len),
            t.regions.len(),
            t.targets.len(),
            format_interval(t.interval),
            format!("{}s", t.timeout),
            width = max_name_len
        );
    }
    println!();
    Ok(())
}

/// Show details of a template
pub fn cmd_show(name: &str, json: bool) -> Result<()> {
    let backend = Backend::open()?;
    let doc = backend.load(name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc.into_template())?);
        return Ok(());
    }

    print_document(&doc);
    Ok(())
}

pub fn cmd_set(name: &str, interval: Option<u64>, timeout: Option<u64>) -> Result<()> {
    edit_and_save(name, |doc, _| {
        if let Some(secs) = interval {
            doc.set_interval(secs)?;
        }
        if let Some(secs) = timeout {
            doc.set_timeout(secs)?;
        }
        Ok(())
    })
}

pub fn cmd_region_add(name: &str, code: &str) -> Result<()> {
    let code = code.trim();
    edit_and_save(name, |doc, _| {
        doc.add_region(code)?;
        if !Region::new(code).is_known() {
            eprintln!("  {} '{}' is not a known region", "warning:".yellow(), code);
        }
        Ok(())
    })
}

pub fn cmd_region_rm(name: &str, code: &str) -> Result<()> {
    let code = code.trim();
    edit_and_save(name, |doc, _| {
        if !doc.remove_region(code) {
            println!("Region '{}' is not in '{}'", code, doc.name());
        }
        Ok(())
    })
}

pub fn cmd_slack_add(name: &str, url: &str) -> Result<()> {
    edit_and_save(name, |doc, _| {
        doc.add_slack_url(url.trim())?;
        Ok(())
    })
}

pub fn cmd_slack_rm(name: &str, number: usize) -> Result<()> {
    edit_and_save(name, |doc, _| {
        let index = to_index(number, doc.template().slack_urls.len())?;
        doc.remove_slack_url(index);
        Ok(())
    })
}

/// Print a template the way `show` and the interactive editor display it
pub(crate) fn print_document(doc: &TemplateDocument) {
    let t = doc.template();

    println!();
    println!("  {}", t.name.bold());
    println!("    Interval: every {}", format_interval(t.interval));
    println!("    Timeout:  {}s", t.timeout);

    println!();
    println!("  {} ({})", "Regions".bold(), t.regions.len());
    if t.regions.is_empty() {
        println!("    No region specified");
    }
    for region in &t.regions {
        let marker = if region.is_known() { "" } else { " (unknown)" };
        println!("    - {}{}", region.code(), marker.yellow());
    }

    println!();
    println!("  {} ({})", "Slack URLs".bold(), t.slack_urls.len());
    if t.slack_urls.is_empty() {
        println!("    No slack urls");
    }
    for (i, url) in t.slack_urls.iter().enumerate() {
        println!("    {}. {}", i + 1, truncate_str(url, 70));
    }

    println!();
    println!("  {} ({})", "Targets".bold(), t.targets.len());
    for (i, (_, target)) in doc.targets().enumerate() {
        print_target(&format!("{}.", i + 1), target);
    }
    println!();
}

pub(crate) fn print_target(label: &str, target: &Target) {
    println!("    {} {} {}", label, target.method.to_string().cyan(), target.url);
    if let Some(header) = &target.header {
        for (key, value) in header {
            println!("         header {}: {}", key, truncate_str(value, 60));
        }
    }
    if let Some(body) = &target.body {
        for (key, value) in body {
            println!("         body   {}: {}", key, truncate_str(value, 60));
        }
    }
}
