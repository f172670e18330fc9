//! Validated add/remove over the keyed collections of a template and its targets.
//!
//! Every add rejects empty input and duplicates without touching the
//! collection. Removes of unknown keys are silent no-ops. Codes and keys are
//! compared exactly; input is trimmed by the console before it gets here.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::template::{EntryMap, Region, Target, Template};

/// Which entry map of a target an edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Header,
    Body,
}

impl EntryKind {
    fn field(&self) -> &'static str {
        match self {
            EntryKind::Header => "header",
            EntryKind::Body => "body",
        }
    }

    fn key_field(&self) -> &'static str {
        match self {
            EntryKind::Header => "header key",
            EntryKind::Body => "body key",
        }
    }

    fn slot<'a>(&self, target: &'a mut Target) -> &'a mut EntryMap {
        match self {
            EntryKind::Header => &mut target.header,
            EntryKind::Body => &mut target.body,
        }
    }
}

pub fn add_region(template: &mut Template, code: &str) -> Result<(), ValidationError> {
    if code.trim().is_empty() {
        return Err(ValidationError::Empty { field: "region" });
    }
    if template.regions.iter().any(|r| r.region == code) {
        return Err(ValidationError::Duplicate {
            field: "regions",
            key: code.to_string(),
        });
    }
    template.regions.push(Region::new(code));
    Ok(())
}

/// Returns whether a region was removed
pub fn remove_region(template: &mut Template, code: &str) -> bool {
    let before = template.regions.len();
    template.regions.retain(|r| r.region != code);
    template.regions.len() != before
}

pub fn add_header_entry(target: &mut Target, key: &str, value: &str) -> Result<(), ValidationError> {
    add_entry(target, EntryKind::Header, key, value)
}

pub fn add_body_entry(target: &mut Target, key: &str, value: &str) -> Result<(), ValidationError> {
    add_entry(target, EntryKind::Body, key, value)
}

pub fn remove_header_entry(target: &mut Target, key: &str) -> bool {
    remove_entry(target, EntryKind::Header, key)
}

pub fn remove_body_entry(target: &mut Target, key: &str) -> bool {
    remove_entry(target, EntryKind::Body, key)
}

/// Insert `key` into the chosen map, creating the map if the target has none
pub fn add_entry(
    target: &mut Target,
    kind: EntryKind,
    key: &str,
    value: &str,
) -> Result<(), ValidationError> {
    if key.trim().is_empty() {
        return Err(ValidationError::Empty { field: kind.key_field() });
    }

    let slot = kind.slot(target);
    if slot.as_ref().is_some_and(|m| m.contains_key(key)) {
        return Err(ValidationError::Duplicate {
            field: kind.field(),
            key: key.to_string(),
        });
    }
    slot.get_or_insert_with(BTreeMap::new)
        .insert(key.to_string(), value.to_string());
    Ok(())
}

/// Delete `key`; a map left empty reverts to absent
pub fn remove_entry(target: &mut Target, kind: EntryKind, key: &str) -> bool {
    let slot = kind.slot(target);
    let Some(map) = slot.as_mut() else {
        return false;
    };
    let removed = map.remove(key).is_some();
    if map.is_empty() {
        *slot = None;
    }
    removed
}

pub fn add_slack_url(template: &mut Template, url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::Empty { field: "slack url" });
    }
    template.slack_urls.push(url.to_string());
    Ok(())
}

pub fn remove_slack_url(template: &mut Template, index: usize) -> Option<String> {
    (index < template.slack_urls.len()).then(|| template.slack_urls.remove(index))
}

pub fn set_interval(template: &mut Template, secs: u64) -> Result<(), ValidationError> {
    if secs == 0 {
        return Err(ValidationError::NotPositive { field: "interval" });
    }
    template.interval = secs;
    Ok(())
}

pub fn set_timeout(template: &mut Template, secs: u64) -> Result<(), ValidationError> {
    if secs == 0 {
        return Err(ValidationError::NotPositive { field: "timeout" });
    }
    template.timeout = secs;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Method;

    fn template() -> Template {
        let mut t = Template::new("t");
        t.regions.push(Region::new("us-east-1"));
        t
    }

    #[test]
    fn test_region_round_trip() {
        let mut t = template();
        let original = t.regions.clone();
        add_region(&mut t, "eu-west-1").unwrap();
        assert_eq!(t.regions.len(), 2);
        assert!(remove_region(&mut t, "eu-west-1"));
        assert_eq!(t.regions, original);
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let mut t = template();
        let err = add_region(&mut t, "us-east-1").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Duplicate { field: "regions", key: "us-east-1".into() }
        );
        assert_eq!(t.regions.len(), 1);
    }

    #[test]
    fn test_empty_region_rejected() {
        let mut t = template();
        assert_eq!(add_region(&mut t, "  "), Err(ValidationError::Empty { field: "region" }));
        assert_eq!(t.regions.len(), 1);
    }

    #[test]
    fn test_codes_and_keys_match_exactly() {
        let mut t = template();
        assert!(!remove_region(&mut t, " us-east-1 "));
        assert_eq!(t.regions.len(), 1);

        let mut target = Target::new(Method::Get, "https://a.b");
        add_header_entry(&mut target, "Accept", "*/*").unwrap();
        assert!(!remove_header_entry(&mut target, "Accept "));
        assert!(target.header.is_some());
    }

    #[test]
    fn test_remove_missing_region_is_noop() {
        let mut t = template();
        assert!(!remove_region(&mut t, "ap-south-1"));
        assert_eq!(t.regions.len(), 1);
    }

    #[test]
    fn test_header_created_lazily_and_reverts_to_absent() {
        let mut target = Target::new(Method::Get, "https://a.b");
        add_header_entry(&mut target, "Authorization", "Bearer x").unwrap();
        add_header_entry(&mut target, "Accept", "*/*").unwrap();
        assert_eq!(target.header.as_ref().map(|h| h.len()), Some(2));

        assert!(remove_header_entry(&mut target, "Accept"));
        assert!(target.header.is_some());
        assert!(remove_header_entry(&mut target, "Authorization"));
        assert_eq!(target.header, None);
    }

    #[test]
    fn test_duplicate_body_key_rejected() {
        let mut target = Target::new(Method::Post, "https://a.b");
        add_body_entry(&mut target, "id", "1").unwrap();
        let err = add_body_entry(&mut target, "id", "2").unwrap_err();
        assert_eq!(err, ValidationError::Duplicate { field: "body", key: "id".into() });
        assert_eq!(target.body.unwrap().get("id").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_empty_key_rejected_without_creating_map() {
        let mut target = Target::default();
        assert!(add_body_entry(&mut target, "", "v").is_err());
        assert_eq!(target.body, None);
    }

    #[test]
    fn test_remove_from_absent_map() {
        let mut target = Target::default();
        assert!(!remove_body_entry(&mut target, "x"));
        assert_eq!(target.body, None);
    }

    #[test]
    fn test_slack_urls_allow_duplicates() {
        let mut t = template();
        add_slack_url(&mut t, "https://hooks.slack.com/a").unwrap();
        add_slack_url(&mut t, "https://hooks.slack.com/a").unwrap();
        assert_eq!(t.slack_urls.len(), 2);
        assert!(add_slack_url(&mut t, "").is_err());
        assert_eq!(remove_slack_url(&mut t, 5), None);
        assert_eq!(remove_slack_url(&mut t, 0).as_deref(), Some("https://hooks.slack.com/a"));
        assert_eq!(t.slack_urls.len(), 1);
    }

    #[test]
    fn test_cadence_must_be_positive() {
        let mut t = template();
        assert_eq!(set_interval(&mut t, 0), Err(ValidationError::NotPositive { field: "interval" }));
        set_timeout(&mut t, 30).unwrap();
        assert_eq!(t.timeout, 30);
    }
}
