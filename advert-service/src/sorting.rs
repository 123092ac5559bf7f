//! Ordering of list results

use std::cmp::Reverse;

use crate::models::Advert;

/// Attribute a list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Creation order; identifiers are assigned in creation order
    #[default]
    Date,
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

/// Order adverts in place
///
/// Ascending date leaves the storage order untouched. Adverts without a
/// loaded price sort as if priced zero.
pub fn sort_adverts(adverts: &mut [Advert], spec: SortSpec) {
    match (spec.key, spec.direction) {
        (SortKey::Date, SortDirection::Asc) => {}
        (SortKey::Date, SortDirection::Desc) => adverts.sort_by_key(|ad| Reverse(ad.id)),
        (SortKey::Price, SortDirection::Asc) => adverts.sort_by_key(price_of),
        (SortKey::Price, SortDirection::Desc) => adverts.sort_by_key(|ad| Reverse(price_of(ad))),
    }
}

fn price_of(advert: &Advert) -> i64 {
    advert.price.unwrap_or_default()
}
