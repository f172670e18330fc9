//! Target commands: add, edit, rm
//!
//! Add and edit both run a full editing session: begin, apply field edits,
//! optionally verify, then commit into the document before it is saved.

use colored::Colorize;

use probectl::collection::EntryKind;
use probectl::document::TemplateDocument;
use probectl::error::Result;
use probectl::probe::Verdict;
use probectl::session::TargetField;
use probectl::template::Method;

use super::{edit_and_save, print_probe_result, Backend};
use crate::utils::to_index;

pub fn cmd_target_add(
    name: &str,
    url: String,
    method: Option<Method>,
    headers: Vec<(String, String)>,
    body: Vec<(String, String)>,
    verify: bool,
) -> Result<()> {
    edit_and_save(name, |doc, backend| {
        doc.begin_create()?;
        let method = method.unwrap_or(backend.config.default_method);
        doc.edit_field(TargetField::Method(method))?;
        doc.edit_field(TargetField::Url(url))?;
        apply_draft_edits(doc, headers, Vec::new(), body, Vec::new())?;
        finish_session(doc, backend, verify)
    })
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_target_edit(
    name: &str,
    number: usize,
    url: Option<String>,
    method: Option<Method>,
    headers: Vec<(String, String)>,
    unset_headers: Vec<String>,
    body: Vec<(String, String)>,
    unset_body: Vec<String>,
    verify: bool,
) -> Result<()> {
    edit_and_save(name, |doc, backend| {
        let index = to_index(number, doc.template().targets.len())?;
        doc.begin_modify(index)?;
        if let Some(method) = method {
            doc.edit_field(TargetField::Method(method))?;
        }
        if let Some(url) = url {
            doc.edit_field(TargetField::Url(url))?;
        }
        apply_draft_edits(doc, headers, unset_headers, body, unset_body)?;

        let unchanged = doc
            .session()
            .map(|s| Some(s.draft()) == doc.template().targets.get(index))
            .unwrap_or(true);
        if unchanged && !verify {
            doc.discard();
            return Ok(());
        }
        finish_session(doc, backend, verify)
    })
}

pub fn cmd_target_rm(name: &str, number: usize) -> Result<()> {
    edit_and_save(name, |doc, _| {
        let index = to_index(number, doc.template().targets.len())?;
        let removed = doc.remove_target(index)?;
        println!("Removed {} {}", removed.method, removed.url);
        Ok(())
    })
}

// Removals run before additions so `--unset-header K --header K=new` replaces a value.
fn apply_draft_edits(
    doc: &mut TemplateDocument,
    headers: Vec<(String, String)>,
    unset_headers: Vec<String>,
    body: Vec<(String, String)>,
    unset_body: Vec<String>,
) -> Result<()> {
    for key in unset_headers {
        if !doc.remove_draft_entry(EntryKind::Header, key.trim())? {
            println!("  Header '{}' was not set", key);
        }
    }
    for key in unset_body {
        if !doc.remove_draft_entry(EntryKind::Body, key.trim())? {
            println!("  Body field '{}' was not set", key);
        }
    }
    for (key, value) in headers {
        doc.add_draft_entry(EntryKind::Header, &key, &value)?;
    }
    for (key, value) in body {
        doc.add_draft_entry(EntryKind::Body, &key, &value)?;
    }
    Ok(())
}

fn finish_session(doc: &mut TemplateDocument, backend: &Backend, verify: bool) -> Result<()> {
    if verify {
        // A failed request leaves the draft open; drop it so nothing is saved.
        let result = match doc.verify(&backend.client) {
            Ok(result) => result,
            Err(e) => {
                doc.discard();
                return Err(e);
            }
        };
        print_probe_result(&result);
        if result.verdict() == Verdict::Fail {
            eprintln!("  {} target did not return 200; saving anyway", "warning:".yellow());
        }
    }
    doc.commit()?;
    Ok(())
}
