//! Folding partial profiles into one

use dossier_domain::ClientProfile;

/// Merge `partial` into `acc` field by field; returns true if anything changed
///
/// Better value wins, ties keep the existing value:
/// - an empty value always loses to a non-empty one
/// - of two strings, the longer wins if it fits in `max_value_length` chars
/// - of two lists, the longer wins
/// - of two nested objects (source tiers, briefing), the one with more
///   populated keys wins
///
/// A populated field is never cleared.
pub fn merge_into(acc: &mut ClientProfile, partial: ClientProfile, max_value_length: usize) -> bool {
    let ClientProfile {
        client_name,
        industry,
        products,
        executives,
        competitors,
        excluded_topics,
        sources,
        briefing,
        contacts,
    } = partial;

    let mut changed = false;
    changed |= merge_string(&mut acc.client_name, client_name, max_value_length);
    changed |= merge_string(&mut acc.industry, industry, max_value_length);
    changed |= merge_list(&mut acc.products, products);
    changed |= merge_list(&mut acc.executives, executives);
    changed |= merge_list(&mut acc.competitors, competitors);
    changed |= merge_list(&mut acc.excluded_topics, excluded_topics);
    changed |= merge_list(&mut acc.contacts, contacts);

    if sources.populated_tiers() > acc.sources.populated_tiers() {
        acc.sources = sources;
        changed = true;
    }
    if briefing.populated_keys() > acc.briefing.populated_keys() {
        acc.briefing = briefing;
        changed = true;
    }
    changed
}

fn merge_string(current: &mut String, candidate: String, max_value_length: usize) -> bool {
    let candidate_len = candidate.trim().chars().count();
    if candidate_len == 0 {
        return false;
    }
    let current_len = current.trim().chars().count();
    let better = current_len == 0 || (candidate_len > current_len && candidate_len <= max_value_length);
    if better {
        *current = candidate;
    }
    better
}

fn merge_list<T>(current: &mut Vec<T>, candidate: Vec<T>) -> bool {
    if candidate.len() > current.len() {
        *current = candidate;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_domain::{Competitor, CompetitorKind, Priority, ProfileField, SourceTier};
    use proptest::prelude::*;

    fn named(name: &str) -> ClientProfile {
        ClientProfile {
            client_name: name.to_string(),
            ..ClientProfile::default()
        }
    }

    #[test]
    fn test_empty_loses() {
        let mut acc = ClientProfile::new();
        assert!(merge_into(&mut acc, named("Acme"), 100));
        assert_eq!(acc.client_name, "Acme");

        assert!(!merge_into(&mut acc, ClientProfile::new(), 100));
        assert_eq!(acc.client_name, "Acme");
    }

    #[test]
    fn test_longer_string_wins_under_ceiling() {
        let mut acc = named("Acme");
        merge_into(&mut acc, named("Acme Corporation"), 100);
        assert_eq!(acc.client_name, "Acme Corporation");

        let noise = "Acme Corporation, which was founded in a garage and has since grown into the market leader for rockets";
        merge_into(&mut acc, named(noise), 100);
        assert_eq!(acc.client_name, "Acme Corporation");
    }

    #[test]
    fn test_ties_keep_existing() {
        let mut acc = named("Acme");
        assert!(!merge_into(&mut acc, named("Ajax"), 100));
        assert_eq!(acc.client_name, "Acme");
    }

    #[test]
    fn test_longer_list_wins() {
        let mut acc = ClientProfile::new();
        acc.add_competitor(Competitor::new("Foo", CompetitorKind::Direct, Priority::High));

        let mut partial = ClientProfile::new();
        for name in ["Bar", "Baz"] {
            partial.add_competitor(Competitor::new(name, CompetitorKind::Indirect, Priority::Low));
        }
        merge_into(&mut acc, partial, 100);
        assert_eq!(acc.competitor_names(), vec!["Bar", "Baz"]);
    }

    #[test]
    fn test_nested_objects_by_populated_keys() {
        let mut acc = ClientProfile::new();
        acc.sources.push(SourceTier::Tier1, "IGN");
        acc.sources.push(SourceTier::Tier1, "GameSpot");

        let mut partial = ClientProfile::new();
        partial.sources.push(SourceTier::Tier1, "Polygon");
        partial.sources.push(SourceTier::Tier3, "Blogs");
        partial.briefing.schedule = "7 AM".to_string();

        merge_into(&mut acc, partial, 100);
        assert_eq!(acc.sources.tier1, vec!["Polygon"]);
        assert_eq!(acc.briefing.schedule, "7 AM");
    }

    fn arb_profile() -> impl Strategy<Value = ClientProfile> {
        let word = prop::sample::select(vec!["", "Acme", "Acme Corp", "Foo", "Bar", "Games"]);
        (
            word.clone(),
            word.clone(),
            prop::collection::vec(word.clone(), 0..4),
            prop::collection::vec(word.clone(), 0..4),
            prop::collection::vec((0usize..4, word.clone()), 0..5),
            prop::collection::vec(word, 0..3),
        )
            .prop_map(|(name, industry, products, competitors, sources, briefing)| {
                let mut profile = ClientProfile::new();
                profile.client_name = name.to_string();
                profile.industry = industry.to_string();
                for p in products {
                    profile.add_product(p);
                }
                for c in competitors {
                    profile.add_competitor(Competitor::new(c, CompetitorKind::Direct, Priority::Medium));
                }
                for (tier, s) in sources {
                    profile.sources.push(SourceTier::ALL[tier], s);
                }
                for (slot, value) in briefing.into_iter().enumerate() {
                    match slot {
                        0 => profile.briefing.schedule = value.to_string(),
                        1 => profile.briefing.audience = value.to_string(),
                        _ => profile.briefing.frequency = value.to_string(),
                    }
                }
                profile
            })
    }

    proptest! {
        #[test]
        fn prop_merge_never_clears_a_field(acc in arb_profile(), partial in arb_profile()) {
            let mut merged = acc.clone();
            merge_into(&mut merged, partial, 100);
            for field in ProfileField::ALL {
                if acc.is_populated(field) {
                    prop_assert!(merged.is_populated(field), "{} was cleared", field);
                }
            }
        }

        #[test]
        fn prop_merging_empty_is_identity(acc in arb_profile()) {
            let mut merged = acc.clone();
            prop_assert!(!merge_into(&mut merged, ClientProfile::new(), 100));
            prop_assert_eq!(merged, acc);
        }
    }
}
