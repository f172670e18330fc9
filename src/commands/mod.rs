//! Command implementations for the probectl CLI

mod console;
mod misc;
mod target;
mod template;
mod verify;

pub use console::*;
pub use misc::*;
pub use target::*;
pub use template::*;
pub use verify::*;

use colored::Colorize;

use probectl::client::ApiClient;
use probectl::config::Config;
use probectl::document::TemplateDocument;
use probectl::error::Result;

/// Configuration plus a backend client, shared by every command
pub(crate) struct Backend {
    pub config: Config,
    pub client: ApiClient,
}

impl Backend {
    pub fn open() -> Result<Self> {
        let config = Config::load()?;
        let client = ApiClient::from_config(&config)?;
        tracing::debug!(api = %client.base(), "backend configured");
        Ok(Self { config, client })
    }

    pub fn load(&self, name: &str) -> Result<TemplateDocument> {
        Ok(TemplateDocument::new(self.client.load(name)?))
    }

    /// Save the whole document. Local edits are kept if the save fails.
    pub fn save(&self, doc: &mut TemplateDocument) -> Result<()> {
        for issue in doc.template().check() {
            tracing::warn!(template = %doc.name(), "{}", issue);
            eprintln!("  {} {}", "warning:".yellow(), issue);
        }
        self.client.save(doc.template())?;
        doc.mark_saved();
        Ok(())
    }
}

/// Load a template, apply `edit`, and save it if anything changed
pub(crate) fn edit_and_save<F>(name: &str, edit: F) -> Result<()>
where
    F: FnOnce(&mut TemplateDocument, &Backend) -> Result<()>,
{
    let backend = Backend::open()?;
    let mut doc = backend.load(name)?;
    edit(&mut doc, &backend)?;

    if doc.is_dirty() {
        backend.save(&mut doc)?;
        println!("{} Saved '{}'", "✓".green(), doc.name());
    } else {
        println!("No changes to '{}'", doc.name());
    }
    Ok(())
}
