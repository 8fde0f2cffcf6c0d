use astcompat_common::{SourceLocation, SourceManager, SourceRange};
use proptest::prelude::*;
use std::cmp::Ordering;

const MAIN: &str = "#include \"a.hxx\"\nint x = TWO;\nint y = 3;\n";
const HEADER: &str = "#define TWO 2\nint h;\n";

fn manager() -> (SourceManager, Vec<SourceLocation>) {
    let mut sm = SourceManager::new();
    let main = sm.add_file("main.cxx", MAIN, SourceLocation::INVALID);
    let header = sm.add_file("a.hxx", HEADER, sm.location(main, 0));
    let use_site = sm.location(main, 25);
    let mac =
        sm.add_expansion(sm.location(header, 12), SourceRange::new(use_site, use_site), 1, true);

    let mut locations = Vec::new();
    locations.extend((0..MAIN.len() as u32).map(|offset| sm.location(main, offset)));
    locations.extend((0..HEADER.len() as u32).map(|offset| sm.location(header, offset)));
    locations.push(mac);
    locations.push(mac.with_offset(1));
    (sm, locations)
}

proptest! {
    #[test]
    fn order_is_antisymmetric(a in 0usize..64, b in 0usize..64) {
        let (sm, locs) = manager();
        let (a, b) = (locs[a % locs.len()], locs[b % locs.len()]);
        prop_assert_eq!(
            sm.compare_in_translation_unit(a, b),
            sm.compare_in_translation_unit(b, a).reverse()
        );
    }

    #[test]
    fn order_is_total_on_distinct_locations(a in 0usize..64, b in 0usize..64) {
        let (sm, locs) = manager();
        let (a, b) = (locs[a % locs.len()], locs[b % locs.len()]);
        let equal = sm.compare_in_translation_unit(a, b) == Ordering::Equal;
        prop_assert_eq!(equal, a == b);
    }

    #[test]
    fn order_is_transitive(a in 0usize..64, b in 0usize..64, c in 0usize..64) {
        let (sm, locs) = manager();
        let (a, b, c) = (locs[a % locs.len()], locs[b % locs.len()], locs[c % locs.len()]);
        if sm.is_before_in_translation_unit(a, b) && sm.is_before_in_translation_unit(b, c) {
            prop_assert!(sm.is_before_in_translation_unit(a, c));
        }
    }

    #[test]
    fn point_within_matches_ordering(p in 0usize..64, s in 0usize..64, e in 0usize..64) {
        let (sm, locs) = manager();
        let (p, s, e) = (locs[p % locs.len()], locs[s % locs.len()], locs[e % locs.len()]);
        let expected = p == s
            || p == e
            || (sm.is_before_in_translation_unit(s, p) && sm.is_before_in_translation_unit(p, e));
        prop_assert_eq!(sm.is_point_within(p, s, e), expected);
    }
}
