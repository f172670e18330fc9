//! Interactive template editor
//!
//! A prompt loop over one loaded document. Every choice is forwarded into the
//! document; validation and network errors are printed and the loop goes on.

use std::fmt;

use colored::Colorize;
use inquire::{Confirm, CustomType, InquireError, Select, Text};

use probectl::collection::EntryKind;
use probectl::document::TemplateDocument;
use probectl::error::{ConsoleError, Result};
use probectl::session::{EditMode, TargetField};
use probectl::template::{Method, KNOWN_REGIONS};

use super::{print_document, print_probe_result, print_target, Backend};

#[derive(Clone, Copy, PartialEq)]
enum MainAction {
    Show,
    SetInterval,
    SetTimeout,
    AddRegion,
    RemoveRegion,
    AddSlack,
    RemoveSlack,
    AddTarget,
    ModifyTarget,
    RemoveTarget,
    Save,
    Reload,
    Quit,
}

impl MainAction {
    const ALL: [MainAction; 13] = [
        MainAction::Show,
        MainAction::SetInterval,
        MainAction::SetTimeout,
        MainAction::AddRegion,
        MainAction::RemoveRegion,
        MainAction::AddSlack,
        MainAction::RemoveSlack,
        MainAction::AddTarget,
        MainAction::ModifyTarget,
        MainAction::RemoveTarget,
        MainAction::Save,
        MainAction::Reload,
        MainAction::Quit,
    ];
}

impl fmt::Display for MainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MainAction::Show => "Show template",
            MainAction::SetInterval => "Set interval",
            MainAction::SetTimeout => "Set timeout",
            MainAction::AddRegion => "Add region",
            MainAction::RemoveRegion => "Remove region",
            MainAction::AddSlack => "Add Slack URL",
            MainAction::RemoveSlack => "Remove Slack URL",
            MainAction::AddTarget => "Add target",
            MainAction::ModifyTarget => "Modify target",
            MainAction::RemoveTarget => "Remove target",
            MainAction::Save => "Save",
            MainAction::Reload => "Reload from backend",
            MainAction::Quit => "Quit",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum DraftAction {
    Method,
    Url,
    AddHeader,
    RemoveHeader,
    AddBody,
    RemoveBody,
    Verify,
    Commit,
    Discard,
}

impl DraftAction {
    const ALL: [DraftAction; 9] = [
        DraftAction::Method,
        DraftAction::Url,
        DraftAction::AddHeader,
        DraftAction::RemoveHeader,
        DraftAction::AddBody,
        DraftAction::RemoveBody,
        DraftAction::Verify,
        DraftAction::Commit,
        DraftAction::Discard,
    ];
}

impl fmt::Display for DraftAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DraftAction::Method => "Set method",
            DraftAction::Url => "Set URL",
            DraftAction::AddHeader => "Add header",
            DraftAction::RemoveHeader => "Remove header",
            DraftAction::AddBody => "Add body field",
            DraftAction::RemoveBody => "Remove body field",
            DraftAction::Verify => "Verify",
            DraftAction::Commit => "Commit",
            DraftAction::Discard => "Discard",
        };
        f.write_str(label)
    }
}

/// Edit a template interactively
pub fn cmd_edit(name: &str) -> Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(ConsoleError::ConfigError(
            "`edit` needs an interactive terminal; use `probectl region|slack|target|set` instead".into(),
        ));
    }

    let backend = Backend::open()?;
    let mut doc = backend.load(name)?;
    print_document(&doc);

    loop {
        let keep_going = if doc.has_session() {
            draft_step(&mut doc, &backend)
        } else {
            main_step(&mut doc, &backend)
        };
        match keep_going {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if is_interrupt(&e) => return Err(e),
            Err(e) => report(&e),
        }
    }
    Ok(())
}

fn main_step(doc: &mut TemplateDocument, backend: &Backend) -> Result<bool> {
    let title = if doc.is_dirty() {
        format!("{} {}", doc.name(), "(unsaved)".yellow())
    } else {
        doc.name().to_string()
    };
    let Some(action) = ask(Select::new(&title, MainAction::ALL.to_vec()).prompt())? else {
        return Ok(true);
    };

    match action {
        MainAction::Show => print_document(doc),
        MainAction::SetInterval => {
            let current = doc.template().interval;
            if let Some(secs) = ask(CustomType::<u64>::new("Interval (seconds)").with_default(current).prompt())? {
                doc.set_interval(secs)?;
            }
        }
        MainAction::SetTimeout => {
            let current = doc.template().timeout;
            if let Some(secs) = ask(CustomType::<u64>::new("Timeout (seconds)").with_default(current).prompt())? {
                doc.set_timeout(secs)?;
            }
        }
        MainAction::AddRegion => {
            let taken: Vec<&str> = doc.template().regions.iter().map(|r| r.code()).collect();
            let mut options: Vec<String> = KNOWN_REGIONS
                .iter()
                .filter(|code| !taken.contains(*code))
                .map(|code| code.to_string())
                .collect();
            options.push("Other...".to_string());
            if let Some(choice) = ask(Select::new("Region", options).prompt())? {
                let code = if choice == "Other..." {
                    match ask(Text::new("Region code").prompt())? {
                        Some(code) => code,
                        None => return Ok(true),
                    }
                } else {
                    choice
                };
                doc.add_region(code.trim())?;
            }
        }
        MainAction::RemoveRegion => {
            let codes: Vec<String> = doc.template().regions.iter().map(|r| r.code().to_string()).collect();
            if codes.is_empty() {
                println!("  No regions to remove");
            } else if let Some(code) = ask(Select::new("Remove region", codes).prompt())? {
                doc.remove_region(&code);
            }
        }
        MainAction::AddSlack => {
            if let Some(url) = ask(Text::new("Slack webhook URL").prompt())? {
                doc.add_slack_url(url.trim())?;
            }
        }
        MainAction::RemoveSlack => {
            let urls = doc.template().slack_urls.clone();
            if urls.is_empty() {
                println!("  No Slack URLs to remove");
            } else if let Some(index) = pick_index("Remove Slack URL", &urls)? {
                doc.remove_slack_url(index);
            }
        }
        MainAction::AddTarget => {
            doc.begin_create()?;
            doc.edit_field(TargetField::Method(backend.config.default_method))?;
        }
        MainAction::ModifyTarget => {
            if let Some(index) = pick_target(doc, "Modify target")? {
                doc.begin_modify(index)?;
            }
        }
        MainAction::RemoveTarget => {
            if let Some(index) = pick_target(doc, "Remove target")? {
                let removed = doc.remove_target(index)?;
                println!("  Removed {} {}", removed.method, removed.url);
            }
        }
        MainAction::Save => {
            backend.save(doc)?;
            println!("{} Saved '{}'", "✓".green(), doc.name());
        }
        MainAction::Reload => {
            if !doc.is_dirty() || confirm("Discard unsaved changes and reload?")? {
                let fresh = backend.client.load(doc.name())?;
                doc.reload(fresh);
                print_document(doc);
            }
        }
        MainAction::Quit => {
            return Ok(doc.is_dirty() && !confirm("Quit without saving?")?);
        }
    }
    Ok(true)
}

fn draft_step(doc: &mut TemplateDocument, backend: &Backend) -> Result<bool> {
    let Some(session) = doc.session() else {
        return Ok(true);
    };

    let heading = match session.mode() {
        EditMode::Create => "New target".to_string(),
        EditMode::Modify(id) => match doc.position_of(id) {
            Some(index) => format!("Target #{}", index + 1),
            None => "Target (removed)".to_string(),
        },
    };
    let status = if session.verification().is_some() { " verified".green() } else { "".normal() };
    println!("\n  {}{}", heading.bold(), status);
    print_target("-", session.draft());
    let current_method = session.draft().method;
    let current_url = session.draft().url.clone();

    let Some(action) = ask(Select::new("Draft", DraftAction::ALL.to_vec()).prompt())? else {
        return Ok(true);
    };

    match action {
        DraftAction::Method => {
            let start = Method::ALL.iter().position(|m| *m == current_method).unwrap_or(0);
            if let Some(method) = ask(Select::new("Method", Method::ALL.to_vec()).with_starting_cursor(start).prompt())? {
                doc.edit_field(TargetField::Method(method))?;
            }
        }
        DraftAction::Url => {
            let prompt = Text::new("URL")
                .with_initial_value(&current_url)
                .with_placeholder("https://example.com/health")
                .prompt();
            if let Some(url) = ask(prompt)? {
                if let Err(e) = probectl::normalize::normalize(&url) {
                    eprintln!("  {} {}", "url:".red(), e);
                }
                doc.edit_field(TargetField::Url(url))?;
            }
        }
        DraftAction::AddHeader => add_entry(doc, EntryKind::Header)?,
        DraftAction::RemoveHeader => remove_entry(doc, EntryKind::Header)?,
        DraftAction::AddBody => add_entry(doc, EntryKind::Body)?,
        DraftAction::RemoveBody => remove_entry(doc, EntryKind::Body)?,
        DraftAction::Verify => {
            println!("  Verifying...");
            let result = doc.verify(&backend.client)?;
            print_probe_result(&result);
        }
        DraftAction::Commit => {
            doc.commit()?;
            println!("{} Target committed (not saved yet)", "✓".green());
        }
        DraftAction::Discard => {
            doc.discard();
            println!("  Draft discarded");
        }
    }
    Ok(true)
}

fn add_entry(doc: &mut TemplateDocument, kind: EntryKind) -> Result<()> {
    let Some(key) = ask(Text::new("Key").prompt())? else {
        return Ok(());
    };
    let Some(value) = ask(Text::new("Value").prompt())? else {
        return Ok(());
    };
    doc.add_draft_entry(kind, key.trim(), &value)
}

fn remove_entry(doc: &mut TemplateDocument, kind: EntryKind) -> Result<()> {
    let keys: Vec<String> = doc
        .session()
        .and_then(|s| match kind {
            EntryKind::Header => s.draft().header.as_ref(),
            EntryKind::Body => s.draft().body.as_ref(),
        })
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();
    if keys.is_empty() {
        println!("  Nothing to remove");
        return Ok(());
    }
    if let Some(key) = ask(Select::new("Remove key", keys).prompt())? {
        doc.remove_draft_entry(kind, &key)?;
    }
    Ok(())
}

fn pick_target(doc: &TemplateDocument, message: &str) -> Result<Option<usize>> {
    let labels: Vec<String> = doc
        .targets()
        .map(|(_, t)| format!("{} {}", t.method, t.url))
        .collect();
    if labels.is_empty() {
        println!("  No targets");
        return Ok(None);
    }
    pick_index(message, &labels)
}

fn pick_index(message: &str, labels: &[String]) -> Result<Option<usize>> {
    let options: Vec<String> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}. {}", i + 1, label))
        .collect();
    let Some(choice) = ask(Select::new(message, options.clone()).prompt())? else {
        return Ok(None);
    };
    Ok(options.iter().position(|o| *o == choice))
}

fn confirm(message: &str) -> Result<bool> {
    Ok(ask(Confirm::new(message).with_default(false).prompt())?.unwrap_or(false))
}

/// Esc goes back to the menu; anything else ends the prompt loop
fn ask<T>(answer: std::result::Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(e) => Err(ConsoleError::PromptError(e.to_string())),
    }
}

fn is_interrupt(e: &ConsoleError) -> bool {
    matches!(e, ConsoleError::PromptError(_))
}

fn report(e: &ConsoleError) {
    eprintln!("  {} {}", "✗".red(), e);
    if !e.is_recoverable_input() {
        if let Some(hint) = e.hint() {
            eprintln!("  {}", hint.dimmed());
        }
    }
}
