//! Property-based tests for the merge engine.
//!
//! Every property runs against all five categories. Running configurations
//! are built from units of the category under test (managed or
//! operator-owned, some spanning several blocks) mixed with lines and blocks
//! the category must ignore: other categories, physical interfaces, blank
//! lines and separators. A random desired set is merged in and the invariants
//! of the engine are checked.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeSet;

    use crate::block::{extract_blocks, Block};
    use crate::category::Category;
    use crate::identifier::{resolve_identifier, Identifier};
    use crate::merge::{merge, DesiredSet};
    use crate::ownership::ManagedMarker;
    use crate::text::ConfigText;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Item {
        /// A unit of the category under test; `extra` adds a second block
        /// (or, for BGP, a blank line inside the body)
        Unit { id: u8, managed: bool, extra: bool },
        Hostname,
        Bang,
        Blank,
        /// A physical interface sharing its number with sub-interfaces
        Physical(u8),
        /// A managed block of some category
        Foreign(usize),
    }

    const FOREIGN: [&str; 5] = [
        "interface Loopback90\n description Managed-By-Tool\n",
        "interface GigabitEthernet3.90\n description Managed-By-Tool\n",
        "ip prefix-list PL_BGP_FOREIGN description Managed-By-Tool\n",
        "route-map RM_BGP_FOREIGN permit 10\n description Managed-By-Tool\n",
        "router bgp 64999\n description Managed-By-Tool\n",
    ];

    fn category() -> impl Strategy<Value = Category> {
        prop::sample::select(Category::ALL.to_vec())
    }

    fn item() -> impl Strategy<Value = Item> {
        prop_oneof![
            4 => (0u8..4, any::<bool>(), any::<bool>())
                .prop_map(|(id, managed, extra)| Item::Unit { id, managed, extra }),
            1 => Just(Item::Hostname),
            1 => Just(Item::Bang),
            1 => Just(Item::Blank),
            1 => (0u8..4).prop_map(Item::Physical),
            1 => (0..FOREIGN.len()).prop_map(Item::Foreign),
        ]
    }

    fn description(managed: bool, n: usize) -> String {
        if managed {
            format!(" description Managed-By-Tool old {n}\n")
        } else {
            format!(" description operator {n}\n")
        }
    }

    fn existing_unit(category: Category, id: u8, managed: bool, extra: bool, n: usize) -> String {
        let desc = description(managed, n);
        match category {
            Category::Loopbacks => {
                let mut unit = format!("interface Loopback{id}\n{desc}");
                if extra {
                    unit.push_str(" shutdown\n");
                }
                unit
            }
            Category::SubInterfaces => {
                format!("interface GigabitEthernet2.{id}\n{desc} encapsulation dot1Q {id}\n")
            }
            Category::PrefixLists => {
                let mut unit = String::new();
                if managed {
                    unit.push_str(&format!("ip prefix-list PL_BGP_{id} description Managed-By-Tool\n"));
                }
                unit.push_str(&format!("ip prefix-list PL_BGP_{id} seq 5 permit 10.{id}.{n}.0/24\n"));
                if extra {
                    unit.push_str(&format!("ip prefix-list PL_BGP_{id} seq 10 deny 0.0.0.0/0 le 32\n"));
                }
                unit
            }
            Category::RouteMaps => {
                let mut unit = format!("route-map RM_BGP_{id} permit 10\n{desc} set local-preference {n}\n");
                if extra {
                    unit.push_str(&format!("route-map RM_BGP_{id} permit 20\n set weight {n}\n"));
                }
                unit
            }
            Category::Bgp => {
                let mut unit = format!("router bgp 6500{id}\n{desc} bgp log-neighbor-changes\n");
                if extra {
                    unit.push_str(&format!("\n address-family ipv4\n  network 10.{n}.0.0\n"));
                }
                unit
            }
        }
    }

    fn desired_unit(category: Category, id: u8) -> String {
        match category {
            Category::Loopbacks => format!(
                "interface Loopback{id}\n description Managed-By-Tool\n ip address 10.0.0.{id} 255.255.255.255\n"
            ),
            Category::SubInterfaces => format!(
                "interface GigabitEthernet2.{id}\n description Managed-By-Tool\n encapsulation dot1Q 1{id}\n"
            ),
            Category::PrefixLists => format!(
                "ip prefix-list PL_BGP_{id} description Managed-By-Tool\nip prefix-list PL_BGP_{id} seq 5 permit 192.168.{id}.0/24\n"
            ),
            Category::RouteMaps => format!(
                "route-map RM_BGP_{id} permit 10\n description Managed-By-Tool\n match ip address prefix-list PL_BGP_{id}\n"
            ),
            Category::Bgp => format!(
                "router bgp 65000\n description Managed-By-Tool\n bgp log-neighbor-changes\n\n neighbor 10.0.0.{id} remote-as 65001\n"
            ),
        }
    }

    fn running_config(category: Category, items: &[Item]) -> String {
        let mut out = String::new();
        for (n, item) in items.iter().enumerate() {
            match item {
                Item::Unit { id, managed, extra } => {
                    out.push_str(&existing_unit(category, *id, *managed, *extra, n))
                }
                Item::Hostname => out.push_str("hostname r1\n"),
                Item::Bang => out.push_str("!\n"),
                Item::Blank => out.push('\n'),
                Item::Physical(id) => out.push_str(&format!(
                    "interface GigabitEthernet{id}\n description Managed-By-Tool uplink\n"
                )),
                Item::Foreign(k) => out.push_str(FOREIGN[*k]),
            }
        }
        out
    }

    /// Rendered text for `ids`; BGP renders at most one process block
    fn rendered(category: Category, ids: &BTreeSet<u8>) -> String {
        if category.is_singleton() {
            return ids
                .iter()
                .next()
                .map(|id| desired_unit(category, *id))
                .unwrap_or_default();
        }
        ids.iter().map(|id| desired_unit(category, *id)).collect()
    }

    fn resolved(text: &ConfigText, category: Category) -> Vec<(Identifier, Block)> {
        extract_blocks(text, category)
            .into_iter()
            .map(|b| (resolve_identifier(&b).unwrap(), b))
            .collect()
    }

    fn outside_lines(text: &ConfigText, category: Category) -> Vec<String> {
        let mut covered = vec![false; text.len()];
        for block in extract_blocks(text, category) {
            for flag in &mut covered[block.span] {
                *flag = true;
            }
        }
        text.lines()
            .iter()
            .zip(covered)
            .filter(|(_, covered)| !covered)
            .map(|(line, _)| line.clone())
            .collect()
    }

    fn setup(category: Category, items: &[Item], ids: &BTreeSet<u8>) -> (ConfigText, DesiredSet) {
        let text = ConfigText::from(running_config(category, items));
        let desired = DesiredSet::from_rendered(category, &rendered(category, ids)).unwrap();
        (text, desired)
    }

    proptest! {
        /// Property: merging the same desired set twice changes nothing more
        #[test]
        fn merge_is_idempotent(
            category in category(),
            items in prop::collection::vec(item(), 0..12),
            ids in prop::collection::btree_set(0u8..4, 0..3),
        ) {
            let (text, desired) = setup(category, &items, &ids);
            let marker = ManagedMarker::default();
            let once = merge(&text, &desired, &marker).unwrap().text;
            let twice = merge(&once, &desired, &marker).unwrap().text;
            prop_assert_eq!(once, twice);
        }

        /// Property: the desired blocks appear exactly once, contiguous and verbatim
        #[test]
        fn desired_blocks_appear_exactly_once(
            category in category(),
            items in prop::collection::vec(item(), 0..12),
            ids in prop::collection::btree_set(0u8..4, 1..3),
        ) {
            let (text, desired) = setup(category, &items, &ids);
            let merged = merge(&text, &desired, &ManagedMarker::default()).unwrap().text;

            let wanted: Vec<Block> = resolved(&merged, category)
                .into_iter()
                .filter(|(id, _)| desired.contains(id))
                .map(|(_, b)| b)
                .collect();
            for pair in wanted.windows(2) {
                prop_assert_eq!(pair[0].span.end, pair[1].span.start);
            }
            let lines: Vec<String> = wanted.iter().flat_map(|b| b.lines().cloned()).collect();
            prop_assert_eq!(lines.as_slice(), desired.lines());
        }

        /// Property: stale managed units are removed, operator units survive verbatim
        #[test]
        fn stale_removed_and_operator_blocks_preserved(
            category in category(),
            items in prop::collection::vec(item(), 0..12),
            ids in prop::collection::btree_set(0u8..4, 0..3),
        ) {
            let (text, desired) = setup(category, &items, &ids);
            let marker = ManagedMarker::default();
            let merged = merge(&text, &desired, &marker).unwrap().text;

            let old = resolved(&text, category);
            let managed = marker.managed_identifiers(old.iter().map(|(id, b)| (id, b)));
            let before: Vec<Vec<String>> = old
                .iter()
                .filter(|(id, _)| !desired.contains(id) && !managed.contains(id))
                .map(|(_, b)| b.lines().cloned().collect())
                .collect();
            let after: Vec<(Identifier, Block)> = resolved(&merged, category)
                .into_iter()
                .filter(|(id, _)| !desired.contains(id))
                .collect();

            prop_assert!(after.iter().all(|(id, _)| !managed.contains(id)));
            let after: Vec<Vec<String>> =
                after.into_iter().map(|(_, b)| b.lines().cloned().collect()).collect();
            prop_assert_eq!(before, after);
        }

        /// Property: lines outside the category's blocks are never touched
        #[test]
        fn unrelated_lines_are_preserved(
            category in category(),
            items in prop::collection::vec(item(), 0..12),
            ids in prop::collection::btree_set(0u8..4, 0..3),
        ) {
            let (text, desired) = setup(category, &items, &ids);
            let merged = merge(&text, &desired, &ManagedMarker::default()).unwrap().text;
            prop_assert_eq!(outside_lines(&text, category), outside_lines(&merged, category));
        }
    }
}
