//! Alias transforms: declared-entry expansion, drift-aware reconciliation
//! back into the declared view, and plan summaries.

#![forbid(unsafe_code)]

use aliasdrift_core::{
    AliasError, AliasRecord, AliasResult, AliasSet, DeclaredAliasEntry, DeclaredAliasView,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Expand one declared entry into a canonical alias record.
///
/// A non-empty `filter` string must parse as a JSON object; the raw
/// decode error is preserved for diagnostics.
pub fn expand_alias(entry: &DeclaredAliasEntry) -> AliasResult<AliasRecord> {
    let filter = if entry.filter.is_empty() {
        None
    } else {
        let doc = serde_json::from_str(&entry.filter).map_err(|e| AliasError::MalformedFilter {
            name: entry.name.clone(),
            source: e,
        })?;
        Some(doc)
    };
    Ok(AliasRecord {
        name: entry.name.clone(),
        filter,
        index_routing: entry.index_routing.clone(),
        routing: entry.routing.clone(),
        search_routing: entry.search_routing.clone(),
        is_hidden: entry.is_hidden,
        is_write_index: entry.is_write_index,
        allow_rollover: entry.allow_rollover,
        rollover_detected: entry.rollover_detected,
    })
}

/// Expand a batch of declared entries into an alias set keyed by name.
///
/// All-or-nothing: the first malformed filter or duplicate name aborts
/// the batch and no partial set is returned.
pub fn expand_aliases<'a, I>(entries: I) -> AliasResult<AliasSet>
where
    I: IntoIterator<Item = &'a DeclaredAliasEntry>,
{
    let mut set = AliasSet::default();
    for entry in entries {
        let record = expand_alias(entry)?;
        if set.insert(record.name.clone(), record).is_some() {
            return Err(AliasError::DuplicateName {
                name: entry.name.clone(),
            });
        }
    }
    debug!(aliases = set.len(), "expanded declared aliases");
    Ok(set)
}

/// Reconcile one remote-observed record against its previously recorded
/// value, producing the user-facing view.
///
/// `allow_rollover` is a sticky declared setting: it is copied from
/// `prior`, never taken from what the engine reports back. When prior is
/// absent there is no baseline, so nothing is detected or suppressed.
pub fn reconcile_alias(
    current: &AliasRecord,
    prior: Option<&AliasRecord>,
) -> AliasResult<DeclaredAliasView> {
    let filter = match &current.filter {
        Some(doc) => serde_json::to_string(doc).map_err(|e| AliasError::FilterEncode {
            name: current.name.clone(),
            source: e,
        })?,
        None => String::new(),
    };

    let (allow_rollover, rollover_detected, is_write_index) = match prior {
        None => (false, false, current.is_write_index),
        Some(prev) => {
            let detected = current.is_write_index != prev.is_write_index;
            // With rollover allowed, display the last declared value so an
            // out-of-band write-index handoff does not show up as drift.
            let shown = if prev.allow_rollover {
                prev.is_write_index
            } else {
                current.is_write_index
            };
            (prev.allow_rollover, detected, shown)
        }
    };

    Ok(DeclaredAliasView {
        name: current.name.clone(),
        filter,
        index_routing: current.index_routing.clone(),
        routing: current.routing.clone(),
        search_routing: current.search_routing.clone(),
        is_hidden: current.is_hidden,
        is_write_index,
        allow_rollover,
        rollover_detected,
    })
}

/// Reconcile every alias observed on the remote against the prior set.
///
/// Aliases present only in `prior` (deleted remotely) are not emitted;
/// the view reflects current remote reality plus drift annotations.
/// Output order is unspecified.
pub fn reconcile_aliases(
    current: &AliasSet,
    prior: &AliasSet,
) -> AliasResult<Vec<DeclaredAliasView>> {
    let mut views = Vec::with_capacity(current.len());
    for (name, record) in current.iter() {
        views.push(reconcile_alias(record, prior.get(name))?);
    }
    debug!(
        current = current.len(),
        prior = prior.len(),
        "reconciled remote aliases"
    );
    Ok(views)
}

/// Counts of alias-level changes a push of `declared` would cause.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSummary {
    pub adds: usize,
    pub updates: usize,
    pub removes: usize,
}

/// Summarize what pushing `declared` to the remote engine would change.
///
/// A write-index difference on an alias whose declared record allows
/// rollover is expected handoff, not an update.
pub fn plan_summary(declared: &AliasSet, remote: &AliasSet) -> PlanSummary {
    let mut summary = PlanSummary::default();
    for (name, want) in declared.iter() {
        match remote.get(name) {
            None => summary.adds += 1,
            Some(have) => {
                if alias_changed(want, have) {
                    summary.updates += 1;
                }
            }
        }
    }
    summary.removes = remote.keys().filter(|k| !declared.contains_key(*k)).count();
    summary
}

fn alias_changed(want: &AliasRecord, have: &AliasRecord) -> bool {
    if want.filter != have.filter
        || want.index_routing != have.index_routing
        || want.routing != have.routing
        || want.search_routing != have.search_routing
        || want.is_hidden != have.is_hidden
    {
        return true;
    }
    !want.allow_rollover && want.is_write_index != have.is_write_index
}
