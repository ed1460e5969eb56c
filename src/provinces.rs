//! Static catalog of known provinces and municipal suppliers.
//!
//! This is the one hardcoded dataset in the system; everything else is
//! fetched. Defined once per process, never mutated.
use once_cell::sync::Lazy;

use crate::model::Province;

static PROVINCES: Lazy<Vec<Province>> = Lazy::new(|| {
    [
        ("city-of-cape-town", "city of cape town"),
        ("city-power", "city power"),
        ("eastern-cape", "eastern cape"),
        ("free-state", "free state"),
        ("kwazulu-natal", "kwazulu natal"),
        ("gauteng", "gauteng"),
        ("limpopo", "limpopo"),
        ("mpumalanga", "mpumalanga"),
        ("north-west", "north west"),
        ("northern-cape", "northern cape"),
        ("western-cape", "western cape"),
    ]
    .into_iter()
    .map(|(key, value)| Province {
        key: key.to_string(),
        value: value.to_string(),
    })
    .collect()
});

/// The full catalog, in display order.
pub fn all() -> &'static [Province] {
    &PROVINCES
}

/// Look up a catalog entry by its URL-safe key.
pub fn by_key(key: &str) -> Option<&'static Province> {
    PROVINCES.iter().find(|p| p.key == key)
}
