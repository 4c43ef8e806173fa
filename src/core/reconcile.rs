//! Field-level merge of the two partial university records.

use crate::core::normalize::{clean, clean_opt, or_sentinel, title_case};
use crate::domain::model::{PartialUniversity, University};

/// Merges `primary` (ranking site) over `secondary` (encyclopedia): each
/// field takes the primary value unless it is unresolved. The website only
/// ever comes from the secondary source.
pub fn reconcile(
    university_id: &str,
    primary: &PartialUniversity,
    secondary: &PartialUniversity,
) -> University {
    let pick = |a: &Option<String>, b: &Option<String>| or_sentinel(a.clone().or_else(|| b.clone()));

    University {
        university_id: university_id.to_string(),
        university_name: clean(&pick(&primary.name, &secondary.name)),
        country: title_case(&pick(&primary.country, &secondary.country)),
        city: title_case(&pick(&primary.city, &secondary.city)),
        website: clean_opt(secondary.website.as_deref()),
    }
}

/// Hard retention gate on the normalized country.
pub fn is_retained(university: &University, target_country: &str) -> bool {
    university.country == target_country
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SENTINEL;

    fn partial(name: Option<&str>, city: Option<&str>, country: Option<&str>) -> PartialUniversity {
        PartialUniversity {
            name: name.map(String::from),
            city: city.map(String::from),
            country: country.map(String::from),
            website: None,
        }
    }

    #[test]
    fn test_primary_wins_when_resolved() {
        let primary = partial(Some("University of Hyderabad"), Some("Hyderabad"), Some("India"));
        let secondary = partial(Some("UoH"), Some("Gachibowli"), Some("Bharat"));
        let merged = reconcile("U001", &primary, &secondary);
        assert_eq!(merged.university_name, "University of Hyderabad");
        assert_eq!(merged.city, "Hyderabad");
        assert_eq!(merged.country, "India");
    }

    #[test]
    fn test_secondary_fills_unresolved_fields() {
        let primary = partial(Some("Osmania University"), None, None);
        let mut secondary = partial(None, Some("hyderabad"), Some("india"));
        secondary.website = Some("https://www.osmania.ac.in".to_string());
        let merged = reconcile("U002", &primary, &secondary);
        assert_eq!(merged.university_id, "U002");
        assert_eq!(merged.university_name, "Osmania University");
        assert_eq!(merged.city, "Hyderabad");
        assert_eq!(merged.country, "India");
        assert_eq!(merged.website, "https://www.osmania.ac.in");
    }

    #[test]
    fn test_both_unresolved_yields_sentinel() {
        let merged = reconcile("U003", &PartialUniversity::default(), &PartialUniversity::default());
        assert_eq!(merged.university_name, SENTINEL);
        assert_eq!(merged.city, SENTINEL);
        assert_eq!(merged.country, SENTINEL);
        assert_eq!(merged.website, SENTINEL);
    }

    #[test]
    fn test_primary_website_is_ignored() {
        let mut primary = partial(Some("X"), None, None);
        primary.website = Some("https://primary.example".to_string());
        let merged = reconcile("U004", &primary, &PartialUniversity::default());
        assert_eq!(merged.website, SENTINEL);
    }

    #[test]
    fn test_country_filter() {
        let india = reconcile("U001", &partial(Some("A"), None, Some("india")), &PartialUniversity::default());
        let usa = reconcile("U002", &partial(Some("B"), None, Some("usa")), &PartialUniversity::default());
        assert!(is_retained(&india, "India"));
        assert_eq!(usa.country, "United States");
        assert!(!is_retained(&usa, "India"));
        assert!(!is_retained(&india, "india"));
    }
}
