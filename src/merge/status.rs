//! Status check aggregation

use crate::types::{CheckState, StatusCheck};
use std::collections::BTreeMap;

/// Reduce statuses to one authoritative entry per context
///
/// The authoritative entry is the one with the greatest `created_at`. On a
/// tie the entry that appears later in `statuses` wins. The result is
/// ordered by context name.
pub fn authoritative_statuses(statuses: &[StatusCheck]) -> Vec<StatusCheck> {
    let mut latest: BTreeMap<&str, &StatusCheck> = BTreeMap::new();
    for status in statuses {
        latest
            .entry(status.context.as_str())
            .and_modify(|current| {
                if status.created_at >= current.created_at {
                    *current = status;
                }
            })
            .or_insert(status);
    }
    latest.into_values().cloned().collect()
}

/// Whether the authoritative set is non-empty and entirely successful
pub fn all_checks_pass(statuses: &[StatusCheck]) -> bool {
    let authoritative = authoritative_statuses(statuses);
    !authoritative.is_empty()
        && authoritative
            .iter()
            .all(|status| status.state == CheckState::Success)
}

/// Authoritative contexts that are not successful, as `context: state`
pub fn failing_checks(statuses: &[StatusCheck]) -> Vec<String> {
    authoritative_statuses(statuses)
        .into_iter()
        .filter(|status| status.state != CheckState::Success)
        .map(|status| format!("{}: {}", status.context, status.state))
        .collect()
}
