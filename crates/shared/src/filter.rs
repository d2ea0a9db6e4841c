//! Pure derivation of the visible user list from the working set and the
//! current filter inputs.

use std::collections::HashSet;

use crate::domain::{FilterState, UserRecord};

/// Case-insensitive substring test against `"first last"`.
pub fn name_matches(user: &UserRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    user.full_name()
        .to_lowercase()
        .contains(&query.to_lowercase())
}

pub fn country_matches(user: &UserRecord, country: &str) -> bool {
    country.is_empty() || user.country == country
}

/// Positions (into `users`) of every record passing both predicates, in
/// working-set order.
pub fn filter_users(users: &[UserRecord], filter: &FilterState) -> Vec<usize> {
    users
        .iter()
        .enumerate()
        .filter(|(_, user)| {
            name_matches(user, &filter.query) && country_matches(user, &filter.country)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Distinct country values in first-seen order. Blank countries are left
/// out: an empty selection already means "any country".
pub fn derive_countries(users: &[UserRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    users
        .iter()
        .filter(|user| !user.country.is_empty() && seen.insert(user.country.as_str()))
        .map(|user| user.country.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str, country: &str) -> UserRecord {
        UserRecord {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!(
                "{}.{}@example.com",
                first.to_lowercase(),
                last.to_lowercase()
            ),
            country: country.to_string(),
            portrait_url: String::new(),
        }
    }

    fn scenario_set() -> Vec<UserRecord> {
        vec![user("Ana", "Smith", "Peru"), user("Ana", "Lopez", "Chile")]
    }

    fn sample_set() -> Vec<UserRecord> {
        vec![
            user("Ana", "Smith", "Peru"),
            user("Ana", "Lopez", "Chile"),
            user("Björn", "Ågren", "Sweden"),
            user("Mateo", "Anaya", "Chile"),
            user("Lena", "Meyer", "Germany"),
            user("Joanna", "Nowak", "Peru"),
        ]
    }

    #[test]
    fn query_matches_both_first_names_case_insensitively() {
        let users = scenario_set();
        let visible = filter_users(&users, &FilterState::new("ana", ""));
        assert_eq!(visible, vec![0, 1]);
    }

    #[test]
    fn country_selection_keeps_only_exact_matches() {
        let users = scenario_set();
        let visible = filter_users(&users, &FilterState::new("", "Chile"));
        assert_eq!(visible, vec![1]);
        assert_eq!(users[visible[0]].last_name, "Lopez");
    }

    #[test]
    fn both_predicates_must_hold() {
        let users = scenario_set();
        let visible = filter_users(&users, &FilterState::new("smith", "Chile"));
        assert!(visible.is_empty());
    }

    #[test]
    fn unconstrained_filter_is_identity() {
        let users = sample_set();
        let filter = FilterState::default();
        assert!(filter.is_unconstrained());
        let visible = filter_users(&users, &filter);
        assert_eq!(visible, (0..users.len()).collect::<Vec<_>>());
    }

    #[test]
    fn query_spans_the_separating_space() {
        let users = sample_set();
        let visible = filter_users(&users, &FilterState::new("a s", ""));
        assert_eq!(visible, vec![0]);
    }

    #[test]
    fn every_result_contains_the_query() {
        let users = sample_set();
        for query in ["an", "AN", "ya", "ö", "meyer", "x"] {
            let visible = filter_users(&users, &FilterState::new(query, ""));
            for index in &visible {
                assert!(users[*index]
                    .full_name()
                    .to_lowercase()
                    .contains(&query.to_lowercase()));
            }
            let expected = users
                .iter()
                .filter(|user| name_matches(user, query))
                .count();
            assert_eq!(visible.len(), expected, "query {query:?}");
        }
    }

    #[test]
    fn every_result_has_the_selected_country() {
        let users = sample_set();
        for country in ["Peru", "Chile", "Sweden", "Narnia", "peru"] {
            let visible = filter_users(&users, &FilterState::new("", country));
            assert!(visible.iter().all(|index| users[*index].country == country));
        }
        assert!(filter_users(&users, &FilterState::new("", "peru")).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let users = sample_set();
        let filter = FilterState::new("an", "Chile");
        assert_eq!(filter_users(&users, &filter), filter_users(&users, &filter));
    }

    #[test]
    fn non_ascii_names_match_case_insensitively() {
        let users = sample_set();
        assert_eq!(filter_users(&users, &FilterState::new("ÅGREN", "")), vec![2]);
    }

    #[test]
    fn country_set_is_distinct_in_first_seen_order() {
        let users = sample_set();
        assert_eq!(
            derive_countries(&users),
            vec!["Peru", "Chile", "Sweden", "Germany"]
        );
    }

    #[test]
    fn blank_country_is_not_offered_as_a_selection() {
        let users = vec![user("Ana", "Smith", "Peru"), user("No", "Where", "")];
        let countries = derive_countries(&users);
        assert_eq!(countries, vec!["Peru"]);
        assert!(countries.iter().all(|country| !country.is_empty()));
        assert_eq!(filter_users(&users, &FilterState::new("", "")), vec![0, 1]);
    }

    #[test]
    fn empty_working_set_yields_nothing() {
        assert!(derive_countries(&[]).is_empty());
        assert!(filter_users(&[], &FilterState::new("ana", "Peru")).is_empty());
    }
}
