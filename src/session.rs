//! Editing lifecycle of a single target draft.
//!
//! A session is either drafting or holding a verification result for the
//! current draft. Idle is the absence of a session; see
//! [`TemplateDocument`](crate::document::TemplateDocument), which owns the
//! only session slot.

use std::fmt;

use uuid::Uuid;

use crate::collection::{self, EntryKind};
use crate::error::ValidationError;
use crate::probe::ProbeResult;
use crate::template::{Method, Target};

/// Stable identity of a target within a loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(Uuid);

impl TargetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.to_string();
        f.write_str(&s[..8])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Modify(TargetId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Drafting,
    Verified(ProbeResult),
}

/// Scalar draft fields replaced wholesale by an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetField {
    Method(Method),
    Url(String),
}

/// Snapshot of a draft sent out for verification.
///
/// The result is only applied if the same session is still open and the
/// draft has not changed since the ticket was taken.
#[derive(Debug, Clone)]
pub struct VerifyTicket {
    pub(crate) session: u64,
    pub(crate) revision: u64,
    pub target: Target,
}

#[derive(Debug, Clone)]
pub struct TargetEditingSession {
    seq: u64,
    mode: EditMode,
    draft: Target,
    state: SessionState,
    revision: u64,
}

impl TargetEditingSession {
    pub(crate) fn create(seq: u64) -> Self {
        Self {
            seq,
            mode: EditMode::Create,
            draft: Target::default(),
            state: SessionState::Drafting,
            revision: 0,
        }
    }

    pub(crate) fn modify(seq: u64, id: TargetId, committed: &Target) -> Self {
        Self {
            seq,
            mode: EditMode::Modify(id),
            draft: committed.clone(),
            state: SessionState::Drafting,
            revision: 0,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn draft(&self) -> &Target {
        &self.draft
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn verification(&self) -> Option<&ProbeResult> {
        match &self.state {
            SessionState::Verified(result) => Some(result),
            SessionState::Drafting => None,
        }
    }

    pub fn edit_field(&mut self, field: TargetField) {
        match field {
            TargetField::Method(method) => self.draft.method = method,
            TargetField::Url(url) => self.draft.url = url,
        }
        self.touch();
    }

    pub fn add_entry(&mut self, kind: EntryKind, key: &str, value: &str) -> Result<(), ValidationError> {
        collection::add_entry(&mut self.draft, kind, key, value)?;
        self.touch();
        Ok(())
    }

    pub fn remove_entry(&mut self, kind: EntryKind, key: &str) -> bool {
        let removed = collection::remove_entry(&mut self.draft, kind, key);
        if removed {
            self.touch();
        }
        removed
    }

    pub fn ticket(&self) -> VerifyTicket {
        VerifyTicket {
            session: self.seq,
            revision: self.revision,
            target: self.draft.clone(),
        }
    }

    /// Returns whether the result was applied
    pub fn apply_verification(&mut self, ticket: &VerifyTicket, result: ProbeResult) -> bool {
        if ticket.session != self.seq || ticket.revision != self.revision {
            tracing::debug!(
                session = ticket.session,
                revision = ticket.revision,
                "ignoring verification for an outdated draft"
            );
            return false;
        }
        self.state = SessionState::Verified(result);
        true
    }

    pub(crate) fn into_parts(self) -> (EditMode, Target) {
        (self.mode, self.draft)
    }

    // Any edit invalidates a previous verification.
    fn touch(&mut self) {
        self.revision += 1;
        self.state = SessionState::Drafting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeResponse;

    fn ok_result() -> ProbeResult {
        ProbeResult {
            response: ProbeResponse { status_code: 200, status_msg: "OK".into() },
            ..Default::default()
        }
    }

    #[test]
    fn test_edit_invalidates_verification() {
        let mut session = TargetEditingSession::create(1);
        session.edit_field(TargetField::Url("https://a.b".into()));
        let ticket = session.ticket();
        assert!(session.apply_verification(&ticket, ok_result()));
        assert!(session.verification().is_some());

        session.edit_field(TargetField::Method(Method::Post));
        assert_eq!(session.state(), &SessionState::Drafting);
    }

    #[test]
    fn test_outdated_ticket_ignored() {
        let mut session = TargetEditingSession::create(1);
        let ticket = session.ticket();
        session.add_entry(EntryKind::Header, "X-Trace", "1").unwrap();
        assert!(!session.apply_verification(&ticket, ok_result()));
        assert!(session.verification().is_none());
    }

    #[test]
    fn test_ticket_from_other_session_ignored() {
        let first = TargetEditingSession::create(1);
        let mut second = TargetEditingSession::create(2);
        assert!(!second.apply_verification(&first.ticket(), ok_result()));
    }

    #[test]
    fn test_failed_entry_edit_keeps_verification() {
        let mut session = TargetEditingSession::create(1);
        session.add_entry(EntryKind::Body, "a", "1").unwrap();
        let ticket = session.ticket();
        session.apply_verification(&ticket, ok_result());

        assert!(session.add_entry(EntryKind::Body, "a", "2").is_err());
        assert!(!session.remove_entry(EntryKind::Body, "missing"));
        assert!(session.verification().is_some());
    }

    #[test]
    fn test_modify_draft_is_a_copy() {
        let committed = Target::new(Method::Get, "https://a.b");
        let mut session = TargetEditingSession::modify(3, TargetId::new(), &committed);
        session.edit_field(TargetField::Url("https://c.d".into()));
        assert_eq!(committed.url, "https://a.b");
        assert_eq!(session.draft().url, "https://c.d");
    }

    #[test]
    fn test_target_id_display_is_short() {
        assert_eq!(TargetId::new().to_string().len(), 8);
    }
}
