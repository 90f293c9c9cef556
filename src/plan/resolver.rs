//! Reduction of same-named plan entries
//!
//! Entries for one dependency are ordered by the priority of their
//! `version-source`, the first one carrying a version supplies the
//! constraint, and the `launch`/`build` flags are OR-ed across all of them.

use crate::plan::entry::PlanEntry;
use crate::plan::{BUILD_KEY, LAUNCH_KEY};
use tracing::debug;

/// Merges plan entries for a single dependency
pub trait EntryResolver: Send + Sync {
    /// Reduce every entry named `name` into one entry.
    ///
    /// Returns the merged entry and the entries for other dependencies.
    /// No matching entry yields `PlanEntry::default()`.
    fn resolve(
        &self,
        name: &str,
        entries: &[PlanEntry],
        priorities: &[&str],
    ) -> (PlanEntry, Vec<PlanEntry>);

    /// OR-reduce the `launch` and `build` flags of every entry named `name`
    fn merge_layer_types(&self, name: &str, entries: &[PlanEntry]) -> (bool, bool);
}

/// Default [`EntryResolver`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanEntryResolver;

impl PlanEntryResolver {
    pub fn new() -> Self {
        Self
    }
}

/// Rank of an entry's version source; unlisted sources sort last
fn priority_rank(entry: &PlanEntry, priorities: &[&str]) -> usize {
    entry
        .version_source()
        .and_then(|source| priorities.iter().position(|p| *p == source))
        .unwrap_or(priorities.len())
}

impl EntryResolver for PlanEntryResolver {
    fn resolve(
        &self,
        name: &str,
        entries: &[PlanEntry],
        priorities: &[&str],
    ) -> (PlanEntry, Vec<PlanEntry>) {
        let (mut matching, remainder): (Vec<PlanEntry>, Vec<PlanEntry>) =
            entries.iter().cloned().partition(|e| e.name == name);

        if matching.is_empty() {
            debug!("No plan entries for {}, using defaults", name);
            return (PlanEntry::default(), remainder);
        }

        // Stable: equal ranks keep input order, so "first present wins".
        matching.sort_by_key(|e| priority_rank(e, priorities));

        let (launch, build) = self.merge_layer_types(name, &matching);

        let chosen_index = matching
            .iter()
            .position(|e| e.version().is_some())
            .unwrap_or(0);
        let mut chosen = matching.swap_remove(chosen_index);

        chosen.metadata.remove(LAUNCH_KEY);
        chosen.metadata.remove(BUILD_KEY);
        if launch {
            chosen.metadata.insert(LAUNCH_KEY.to_string(), true.into());
        }
        if build {
            chosen.metadata.insert(BUILD_KEY.to_string(), true.into());
        }

        debug!(
            "Resolved {} to version {:?} (launch: {}, build: {})",
            name,
            chosen.version(),
            launch,
            build
        );

        (chosen, remainder)
    }

    fn merge_layer_types(&self, name: &str, entries: &[PlanEntry]) -> (bool, bool) {
        entries
            .iter()
            .filter(|e| e.name == name)
            .fold((false, false), |(launch, build), e| {
                (launch || e.launch(), build || e.build())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{VERSION_KEY, VERSION_SOURCE_KEY};

    fn resolver() -> PlanEntryResolver {
        PlanEntryResolver::new()
    }

    #[test]
    fn ors_flags_on_merged_entry() {
        let entries = vec![
            PlanEntry::new("dep").with(LAUNCH_KEY, true),
            PlanEntry::new("dep").with(BUILD_KEY, true),
        ];

        let (entry, remainder) = resolver().resolve("dep", &entries, &[]);

        assert_eq!(
            entry,
            PlanEntry::new("dep")
                .with(BUILD_KEY, true)
                .with(LAUNCH_KEY, true)
        );
        assert!(remainder.is_empty());
    }

    #[test]
    fn flag_merge_is_order_independent_and_idempotent() {
        let a = PlanEntry::new("dep").with(LAUNCH_KEY, true);
        let b = PlanEntry::new("dep").with(BUILD_KEY, "true");
        let c = PlanEntry::new("dep");

        let orders = [
            vec![a.clone(), b.clone(), c.clone()],
            vec![c.clone(), b.clone(), a.clone()],
            vec![b.clone(), a.clone(), a.clone(), c.clone(), b.clone()],
        ];
        for entries in orders {
            assert_eq!(resolver().merge_layer_types("dep", &entries), (true, true));
        }

        assert_eq!(
            resolver().merge_layer_types("dep", &[c.clone(), c]),
            (false, false)
        );
    }

    #[test]
    fn false_flags_never_clear_true_ones() {
        let entries = vec![
            PlanEntry::new("dep").with(LAUNCH_KEY, true),
            PlanEntry::new("dep").with(LAUNCH_KEY, false),
        ];

        let (entry, _) = resolver().resolve("dep", &entries, &[]);
        assert!(entry.launch());
        assert!(!entry.metadata.contains_key(BUILD_KEY));
    }

    #[test]
    fn first_present_version_wins() {
        let entries = vec![
            PlanEntry::new("dep").with(LAUNCH_KEY, true),
            PlanEntry::new("dep").with(VERSION_KEY, "0.5.4"),
            PlanEntry::new("dep").with(VERSION_KEY, "0.4.1"),
        ];

        let (entry, _) = resolver().resolve("dep", &entries, &[]);

        assert_eq!(entry.version(), Some("0.5.4"));
        assert!(entry.launch());
    }

    #[test]
    fn priorities_order_version_sources() {
        let entries = vec![
            PlanEntry::new("dep")
                .with(VERSION_KEY, "0.4.1")
                .with(VERSION_SOURCE_KEY, "go.mod"),
            PlanEntry::new("dep")
                .with(VERSION_KEY, "0.5.4")
                .with(VERSION_SOURCE_KEY, "BP_DEP_VERSION"),
        ];

        let (entry, _) = resolver().resolve("dep", &entries, &["BP_DEP_VERSION", "go.mod"]);
        assert_eq!(entry.version(), Some("0.5.4"));

        let (entry, _) = resolver().resolve("dep", &entries, &[]);
        assert_eq!(entry.version(), Some("0.4.1"));
    }

    #[test]
    fn other_names_are_returned_as_remainder() {
        let entries = vec![
            PlanEntry::new("go").with(BUILD_KEY, true),
            PlanEntry::new("dep"),
            PlanEntry::new("node"),
        ];

        let (entry, remainder) = resolver().resolve("dep", &entries, &[]);

        assert_eq!(entry.name, "dep");
        let names: Vec<&str> = remainder.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["go", "node"]);
        assert_eq!(resolver().merge_layer_types("dep", &entries), (false, false));
    }

    #[test]
    fn no_matching_entry_yields_defaults() {
        let entries = vec![PlanEntry::new("go").with(LAUNCH_KEY, true)];

        let (entry, remainder) = resolver().resolve("dep", &entries, &[]);

        assert_eq!(entry, PlanEntry::default());
        assert_eq!(entry.version(), None);
        assert_eq!(remainder.len(), 1);
    }
}
