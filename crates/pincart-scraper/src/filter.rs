//! Boolean filter expressions for the JioMart search index.
//!
//! The index accepts filters such as
//! `(mart_availability:JIO OR mart_availability:JIO_WA) AND (available_stores:R1 OR available_stores:R2)`.

use std::collections::HashSet;

use crate::location::InventoryCodes;

const AVAILABILITY_CLAUSE: &str = "(mart_availability:JIO OR mart_availability:JIO_WA)";
const CATEGORY_EXCLUSIONS: [&str; 2] = ["(NOT vertical_code:ALCOHOL)", "(NOT vertical_code:LOCALSHOPS)"];
const INVENTORY_KEYS: [&str; 2] = ["inventory_stores", "inventory_stores_3p"];

/// Builds `(key:v1 OR key:v2 ...)` from `values`.
///
/// Duplicates are dropped, keeping the first occurrence. Returns an empty
/// string when `values` is empty.
pub fn build_or_filter<I, S>(key: &str, values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let clauses: Vec<String> = dedup(values)
        .into_iter()
        .map(|value| format!("{key}:{value}"))
        .collect();
    join_or(&clauses)
}

/// Builds the inventory clause: both `ALL` wildcards, then every store code
/// under each inventory key.
pub fn build_inventory_filter<I, S>(store_codes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let codes = dedup(store_codes);
    let mut clauses: Vec<String> = INVENTORY_KEYS
        .iter()
        .map(|key| format!("{key}:ALL"))
        .collect();
    for key in INVENTORY_KEYS {
        clauses.extend(codes.iter().map(|code| format!("{key}:{code}")));
    }
    join_or(&clauses)
}

/// Builds the full filter expression for one search.
///
/// Returns `None` when either code set is empty: a filter missing the
/// region or store restriction would match products from other areas.
#[must_use]
pub fn build_search_filters(codes: &InventoryCodes) -> Option<String> {
    if codes.region_codes.is_empty() || codes.store_codes.is_empty() {
        return None;
    }

    let region_clause = build_or_filter("available_stores", &codes.region_codes);
    let inventory_clause = build_inventory_filter(&codes.store_codes);

    let parts = [
        AVAILABILITY_CLAUSE,
        region_clause.as_str(),
        CATEGORY_EXCLUSIONS[0],
        CATEGORY_EXCLUSIONS[1],
        inventory_clause.as_str(),
    ];
    Some(parts.join(" AND "))
}

fn dedup<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .map(|v| v.as_ref().to_owned())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

fn join_or(clauses: &[String]) -> String {
    if clauses.is_empty() {
        return String::new();
    }
    format!("({})", clauses.join(" OR "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(regions: &[&str], stores: &[&str]) -> InventoryCodes {
        InventoryCodes {
            region_codes: regions.iter().map(|s| (*s).to_owned()).collect(),
            store_codes: stores.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn or_filter_empty_values_is_empty_string() {
        assert_eq!(build_or_filter("k", Vec::<String>::new()), "");
    }

    #[test]
    fn or_filter_single_value() {
        assert_eq!(build_or_filter("k", ["a"]), "(k:a)");
    }

    #[test]
    fn or_filter_drops_duplicates() {
        let filter = build_or_filter("k", ["a", "a", "b"]);
        assert_eq!(filter, "(k:a OR k:b)");
        assert_eq!(filter.matches(" OR ").count(), 1);
        assert_eq!(filter.matches("k:a").count(), 1);
    }

    #[test]
    fn inventory_filter_always_has_wildcards() {
        assert_eq!(
            build_inventory_filter(Vec::<String>::new()),
            "(inventory_stores:ALL OR inventory_stores_3p:ALL)"
        );
    }

    #[test]
    fn inventory_filter_lists_codes_under_both_keys() {
        assert_eq!(
            build_inventory_filter(["S1", "S2", "S1"]),
            "(inventory_stores:ALL OR inventory_stores_3p:ALL \
             OR inventory_stores:S1 OR inventory_stores:S2 \
             OR inventory_stores_3p:S1 OR inventory_stores_3p:S2)"
        );
    }

    #[test]
    fn search_filters_conjoin_all_clauses() {
        let filter = build_search_filters(&codes(&["PANINDIAGROCERIES"], &["U3HR"])).unwrap();
        assert_eq!(
            filter,
            "(mart_availability:JIO OR mart_availability:JIO_WA) \
             AND (available_stores:PANINDIAGROCERIES) \
             AND (NOT vertical_code:ALCOHOL) \
             AND (NOT vertical_code:LOCALSHOPS) \
             AND (inventory_stores:ALL OR inventory_stores_3p:ALL \
             OR inventory_stores:U3HR OR inventory_stores_3p:U3HR)"
        );
    }

    #[test]
    fn search_filters_none_without_regions() {
        assert!(build_search_filters(&codes(&[], &["U3HR"])).is_none());
    }

    #[test]
    fn search_filters_none_without_stores() {
        assert!(build_search_filters(&codes(&["R1"], &[])).is_none());
    }
}
