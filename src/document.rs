//! The in-memory template being edited.
//!
//! `TemplateDocument` is the single owner of a [`Template`] during a console
//! session. All mutation goes through it so it can keep a stable id for every
//! target and hold at most one open [`TargetEditingSession`].

use std::collections::HashSet;

use crate::client::TargetProber;
use crate::collection::{self, EntryKind};
use crate::error::{ConsoleError, Result, ValidationError};
use crate::probe::ProbeResult;
use crate::session::{EditMode, TargetEditingSession, TargetField, TargetId, VerifyTicket};
use crate::template::{Target, Template};

#[derive(Debug, Clone)]
pub struct TemplateDocument {
    template: Template,
    /// Parallel to `template.targets`
    ids: Vec<TargetId>,
    session: Option<TargetEditingSession>,
    next_session: u64,
    dirty: bool,
}

impl TemplateDocument {
    /// Take ownership of a fetched template. Repeated region codes are collapsed to one.
    pub fn new(mut template: Template) -> Self {
        dedupe_regions(&mut template);
        let ids = template.targets.iter().map(|_| TargetId::new()).collect();
        Self {
            template,
            ids,
            session: None,
            next_session: 1,
            dirty: false,
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Whether there are edits not yet saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Replace the content with a freshly fetched copy.
    ///
    /// Targets get new ids, so an open modify session will fail to commit.
    pub fn reload(&mut self, mut template: Template) {
        dedupe_regions(&mut template);
        self.ids = template.targets.iter().map(|_| TargetId::new()).collect();
        self.template = template;
        self.dirty = false;
    }

    pub fn targets(&self) -> impl Iterator<Item = (TargetId, &Target)> {
        self.ids.iter().copied().zip(self.template.targets.iter())
    }

    pub fn target_id(&self, index: usize) -> Option<TargetId> {
        self.ids.get(index).copied()
    }

    pub fn position_of(&self, id: TargetId) -> Option<usize> {
        self.ids.iter().position(|i| *i == id)
    }

    // Template-level edits

    pub fn add_region(&mut self, code: &str) -> std::result::Result<(), ValidationError> {
        collection::add_region(&mut self.template, code)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_region(&mut self, code: &str) -> bool {
        let removed = collection::remove_region(&mut self.template, code);
        self.dirty |= removed;
        removed
    }

    pub fn add_slack_url(&mut self, url: &str) -> std::result::Result<(), ValidationError> {
        collection::add_slack_url(&mut self.template, url)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_slack_url(&mut self, index: usize) -> Option<String> {
        let removed = collection::remove_slack_url(&mut self.template, index);
        self.dirty |= removed.is_some();
        removed
    }

    pub fn set_interval(&mut self, secs: u64) -> std::result::Result<(), ValidationError> {
        collection::set_interval(&mut self.template, secs)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_timeout(&mut self, secs: u64) -> std::result::Result<(), ValidationError> {
        collection::set_timeout(&mut self.template, secs)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove a committed target. The target under edit cannot be removed.
    pub fn remove_target(&mut self, index: usize) -> Result<Target> {
        let id = self.target_id(index).ok_or(ConsoleError::TargetIndexOutOfRange {
            index,
            len: self.ids.len(),
        })?;
        if let Some(session) = &self.session {
            if session.mode() == EditMode::Modify(id) {
                return Err(ConsoleError::SessionBusy);
            }
        }
        self.ids.remove(index);
        self.dirty = true;
        Ok(self.template.targets.remove(index))
    }

    // Target editing session

    pub fn session(&self) -> Option<&TargetEditingSession> {
        self.session.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn begin_create(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let seq = self.take_session_seq();
        self.session = Some(TargetEditingSession::create(seq));
        Ok(())
    }

    pub fn begin_modify(&mut self, index: usize) -> Result<()> {
        self.ensure_idle()?;
        let out_of_range = ConsoleError::TargetIndexOutOfRange {
            index,
            len: self.ids.len(),
        };
        let Some(id) = self.target_id(index) else {
            return Err(out_of_range);
        };
        let seq = self.take_session_seq();
        let target = self.template.targets.get(index).ok_or(out_of_range)?;
        self.session = Some(TargetEditingSession::modify(seq, id, target));
        Ok(())
    }

    pub fn edit_field(&mut self, field: TargetField) -> Result<()> {
        self.session_mut()?.edit_field(field);
        Ok(())
    }

    pub fn add_draft_entry(&mut self, kind: EntryKind, key: &str, value: &str) -> Result<()> {
        self.session_mut()?.add_entry(kind, key, value)?;
        Ok(())
    }

    pub fn remove_draft_entry(&mut self, kind: EntryKind, key: &str) -> Result<bool> {
        Ok(self.session_mut()?.remove_entry(kind, key))
    }

    /// Snapshot the draft for a verification request
    pub fn verify_ticket(&self) -> Result<VerifyTicket> {
        self.session
            .as_ref()
            .map(TargetEditingSession::ticket)
            .ok_or(ConsoleError::NoSession)
    }

    /// Apply a verification result; late results for a discarded or edited draft are dropped
    pub fn apply_verification(&mut self, ticket: &VerifyTicket, result: ProbeResult) -> bool {
        match self.session.as_mut() {
            Some(session) => session.apply_verification(ticket, result),
            None => {
                tracing::debug!(session = ticket.session, "ignoring verification after discard");
                false
            }
        }
    }

    /// Verify the current draft. On failure the session is left untouched.
    pub fn verify(&mut self, prober: &dyn TargetProber) -> Result<ProbeResult> {
        let ticket = self.verify_ticket()?;
        let result = prober.verify_target(&ticket.target)?;
        self.apply_verification(&ticket, result.clone());
        Ok(result)
    }

    /// Write the draft into the committed targets and close the session
    pub fn commit(&mut self) -> Result<TargetId> {
        let session = self.session.as_ref().ok_or(ConsoleError::NoSession)?;

        let position = match session.mode() {
            EditMode::Create => None,
            EditMode::Modify(id) => Some(self.position_of(id).ok_or(ConsoleError::StaleTarget)?),
        };

        let (mode, draft) = self
            .session
            .take()
            .map(TargetEditingSession::into_parts)
            .ok_or(ConsoleError::NoSession)?;

        let id = match (mode, position) {
            (EditMode::Modify(id), Some(index)) => {
                self.template.targets[index] = draft;
                tracing::info!(template = %self.template.name, index, "target updated");
                id
            }
            _ => {
                let id = TargetId::new();
                self.template.targets.push(draft);
                self.ids.push(id);
                tracing::info!(template = %self.template.name, "target added");
                id
            }
        };
        self.dirty = true;
        Ok(id)
    }

    /// Drop the draft without touching committed targets. Returns whether a session was open.
    pub fn discard(&mut self) -> bool {
        self.session.take().is_some()
    }

    fn ensure_idle(&self) -> Result<()> {
        match &self.session {
            Some(_) => Err(ConsoleError::SessionBusy),
            None => Ok(()),
        }
    }

    fn take_session_seq(&mut self) -> u64 {
        let seq = self.next_session;
        self.next_session += 1;
        seq
    }

    fn session_mut(&mut self) -> Result<&mut TargetEditingSession> {
        self.session.as_mut().ok_or(ConsoleError::NoSession)
    }
}

fn dedupe_regions(template: &mut Template) {
    let before = template.regions.len();
    let mut seen = HashSet::new();
    template.regions.retain(|r| seen.insert(r.region.clone()));
    let dropped = before - template.regions.len();
    if dropped > 0 {
        tracing::warn!(template = %template.name, dropped, "repeated regions collapsed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Method, Region};

    fn doc() -> TemplateDocument {
        let mut template = Template::new("checkout");
        template.targets.push(Target::new(Method::Get, "https://a.b/one"));
        template.targets.push(Target::new(Method::Post, "https://a.b/two"));
        TemplateDocument::new(template)
    }

    #[test]
    fn test_ids_assigned_per_target() {
        let d = doc();
        let ids: Vec<_> = d.targets().map(|(id, _)| id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(d.position_of(ids[1]), Some(1));
    }

    #[test]
    fn test_repeated_regions_collapsed_on_load() {
        let mut template = Template::new("checkout");
        for code in ["us-east-1", "eu-west-1", "us-east-1"] {
            template.regions.push(Region::new(code));
        }
        let mut d = TemplateDocument::new(template.clone());
        let codes: Vec<_> = d.template().regions.iter().map(|r| r.code()).collect();
        assert_eq!(codes, ["us-east-1", "eu-west-1"]);

        assert!(d.remove_region("us-east-1"));
        assert_eq!(d.template().regions.len(), 1);

        d.reload(template);
        assert_eq!(d.template().regions.len(), 2);
    }

    #[test]
    fn test_into_template_keeps_committed_edits() {
        let mut d = doc();
        d.begin_create().unwrap();
        d.edit_field(TargetField::Url("https://a.b/three".into())).unwrap();
        d.commit().unwrap();
        d.begin_modify(0).unwrap();
        d.edit_field(TargetField::Url("https://a.b/draft".into())).unwrap();

        let template = d.into_template();
        assert_eq!(template.targets.len(), 3);
        assert_eq!(template.targets[0].url, "https://a.b/one");
        assert_eq!(template.targets[2].url, "https://a.b/three");
    }

    #[test]
    fn test_every_session_gets_a_fresh_sequence() {
        let mut d = doc();
        d.begin_modify(0).unwrap();
        let first = d.verify_ticket().unwrap();
        d.discard();

        d.begin_modify(0).unwrap();
        assert!(!d.apply_verification(&first, ProbeResult::default()));
        d.discard();

        assert!(d.begin_modify(5).is_err());
        d.begin_create().unwrap();
        let third = d.verify_ticket().unwrap();
        assert!(d.apply_verification(&third, ProbeResult::default()));
    }

    #[test]
    fn test_second_session_rejected() {
        let mut d = doc();
        d.begin_create().unwrap();
        assert!(matches!(d.begin_modify(0), Err(ConsoleError::SessionBusy)));
        assert!(matches!(d.begin_create(), Err(ConsoleError::SessionBusy)));
    }

    #[test]
    fn test_modify_out_of_range() {
        let mut d = doc();
        assert!(matches!(
            d.begin_modify(9),
            Err(ConsoleError::TargetIndexOutOfRange { index: 9, len: 2 })
        ));
        assert!(!d.has_session());
    }

    #[test]
    fn test_edit_without_session() {
        let mut d = doc();
        assert!(matches!(
            d.edit_field(TargetField::Url("x".into())),
            Err(ConsoleError::NoSession)
        ));
        assert!(matches!(d.commit(), Err(ConsoleError::NoSession)));
        assert!(!d.discard());
    }

    #[test]
    fn test_modify_follows_identity_not_position() {
        let mut d = doc();
        d.begin_modify(1).unwrap();
        d.edit_field(TargetField::Url("https://a.b/changed".into())).unwrap();
        d.remove_target(0).unwrap();
        d.commit().unwrap();

        assert_eq!(d.template().targets.len(), 1);
        assert_eq!(d.template().targets[0].url, "https://a.b/changed");
        assert_eq!(d.template().targets[0].method, Method::Post);
    }

    #[test]
    fn test_cannot_remove_target_under_edit() {
        let mut d = doc();
        d.begin_modify(0).unwrap();
        assert!(matches!(d.remove_target(0), Err(ConsoleError::SessionBusy)));
        assert_eq!(d.template().targets.len(), 2);
    }

    #[test]
    fn test_commit_after_reload_is_stale() {
        let mut d = doc();
        d.begin_modify(0).unwrap();
        d.edit_field(TargetField::Url("https://elsewhere".into())).unwrap();
        let fresh = d.template().clone();
        d.reload(fresh);

        assert!(matches!(d.commit(), Err(ConsoleError::StaleTarget)));
        assert!(d.has_session());
        assert_eq!(d.template().targets[0].url, "https://a.b/one");
        assert!(d.discard());
    }

    #[test]
    fn test_dirty_tracking() {
        let mut d = doc();
        assert!(!d.is_dirty());
        assert!(!d.remove_region("nowhere"));
        assert!(!d.is_dirty());
        d.add_region("us-west-2").unwrap();
        assert!(d.is_dirty());
        d.mark_saved();
        assert!(!d.is_dirty());
        d.begin_create().unwrap();
        d.discard();
        assert!(!d.is_dirty());
    }

    #[test]
    fn test_late_verification_after_discard_ignored() {
        let mut d = doc();
        d.begin_create().unwrap();
        let ticket = d.verify_ticket().unwrap();
        d.discard();
        assert!(!d.apply_verification(&ticket, ProbeResult::default()));

        d.begin_create().unwrap();
        assert!(!d.apply_verification(&ticket, ProbeResult::default()));
        assert!(d.session().unwrap().verification().is_none());
    }
}
