//! Query parameter validation for advert reads
//!
//! Raw parameters arrive as optional strings; an empty value counts as
//! absent. Every failure is an [`Error::BadRequest`] naming the offending
//! input.

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};

use crate::error::{Error, Result};
use crate::models::AdvertField;
use crate::pagination::PageRequest;
use crate::sorting::{SortDirection, SortKey, SortSpec};

/// Raw query string of `GET /adverts/{id}`
#[derive(Debug, Default)]
pub struct GetQuery {
    pub fields: Option<String>,
}

/// Raw query string of `GET /adverts`
#[derive(Debug, Default)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
}

/// Validated parameters of a list request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListParams {
    pub sort: SortSpec,
    pub page: PageRequest,
}

/// Client-selected subset of advert attributes
///
/// Holds distinct, recognized names only. An empty selection means the
/// caller asked for nothing in particular.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    fields: Vec<AdvertField>,
}

impl FieldSelection {
    /// Parse a raw `fields` parameter
    ///
    /// Duplicates are detected on the raw string before it is split, so
    /// `title,title` fails even though both tokens are valid.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw.filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };

        for field in AdvertField::ALL {
            if raw.matches(field.as_str()).count() > 1 {
                return Err(Error::BadRequest(format!(
                    "wrong number of fields '{}'; available fields: {}",
                    raw,
                    AdvertField::available()
                )));
            }
        }

        let fields = raw
            .split(',')
            .map(str::parse::<AdvertField>)
            .collect::<Result<Vec<AdvertField>>>()?;

        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[AdvertField] {
        &self.fields
    }

    /// Whether the caller asked for every photo rather than just the first
    pub fn wants_all_photos(&self) -> bool {
        self.fields.contains(&AdvertField::Photos)
    }
}

impl GetQuery {
    pub fn validate(&self) -> Result<FieldSelection> {
        FieldSelection::parse(self.fields.as_deref())
    }
}

impl ListQuery {
    /// Validate order, sort and page, in that order
    pub fn validate(&self) -> Result<ListParams> {
        let direction = match non_empty(&self.order) {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(Error::BadRequest(format!(
                    "there is no order like {other}; available orders: asc,desc"
                )))
            }
        };

        let key = match non_empty(&self.sort) {
            None | Some("date") => SortKey::Date,
            Some("price") => SortKey::Price,
            Some(other) => {
                return Err(Error::BadRequest(format!(
                    "there is no sort like {other}; available sorts: date,price"
                )))
            }
        };

        let page = match non_empty(&self.page) {
            None => PageRequest::default(),
            Some(raw) => raw
                .parse::<usize>()
                .map(PageRequest::new)
                .map_err(|_| {
                    Error::BadRequest(format!(
                        "page should be a non-negative integer, got '{raw}'"
                    ))
                })?,
        };

        Ok(ListParams {
            sort: SortSpec { key, direction },
            page,
        })
    }
}

/// Decoded `key=value` pairs of a request URI
///
/// A repeated key resolves to its first value.
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    fn from_uri(uri: &Uri) -> Result<Self> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map_err(|e| Error::BadRequest(e.body_text()))?;
        Ok(Self(pairs))
    }

    fn first(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for GetQuery {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let pairs = QueryPairs::from_uri(&parts.uri)?;
        Ok(Self {
            fields: pairs.first("fields"),
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ListQuery {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let pairs = QueryPairs::from_uri(&parts.uri)?;
        Ok(Self {
            sort: pairs.first("sort"),
            order: pairs.first("order"),
            page: pairs.first("page"),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(sort: Option<&str>, order: Option<&str>, page: Option<&str>) -> ListQuery {
        ListQuery {
            sort: sort.map(String::from),
            order: order.map(String::from),
            page: page.map(String::from),
        }
    }

    #[test]
    fn test_absent_fields_is_empty_selection() {
        let selection = FieldSelection::parse(None).unwrap();
        assert!(selection.is_empty());
        assert!(!selection.wants_all_photos());
        assert_eq!(AdvertField::or_default(selection.fields()), &AdvertField::DEFAULT);

        assert!(FieldSelection::parse(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_valid_selections() {
        let selection = FieldSelection::parse(Some("title,ad_description,price,photos")).unwrap();
        assert_eq!(selection.fields(), &AdvertField::ALL);
        assert!(selection.wants_all_photos());

        let selection = FieldSelection::parse(Some("price")).unwrap();
        assert_eq!(AdvertField::or_default(selection.fields()), &[AdvertField::Price]);
        assert!(!selection.wants_all_photos());
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let err = FieldSelection::parse(Some("title,title")).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
        assert!(err.to_string().contains("wrong number of fields 'title,title'"));

        assert!(FieldSelection::parse(Some("photos,price,photos")).is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = FieldSelection::parse(Some("title,name")).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
        assert!(err.to_string().contains("there is no field like 'name'"));

        // Trailing comma leaves an empty token
        assert!(FieldSelection::parse(Some("title,")).is_err());
    }

    #[test]
    fn test_list_defaults() {
        let params = list(None, None, None).validate().unwrap();
        assert_eq!(params.sort, SortSpec::default());
        assert_eq!(params.page.number, 0);

        let params = list(Some(""), Some(""), Some("")).validate().unwrap();
        assert_eq!(params, ListParams::default());
    }

    #[test]
    fn test_list_valid_combinations() {
        let params = list(Some("price"), Some("desc"), Some("3")).validate().unwrap();
        assert_eq!(params.sort.key, SortKey::Price);
        assert_eq!(params.sort.direction, SortDirection::Desc);
        assert_eq!(params.page.number, 3);

        let params = list(Some("date"), Some("asc"), Some("100")).validate().unwrap();
        assert_eq!(params.sort.key, SortKey::Date);
        assert_eq!(params.page.number, 100);
    }

    #[test]
    fn test_bad_order() {
        let err = list(None, Some("badinput"), None).validate().unwrap_err();
        assert!(err.to_string().contains("there is no order like badinput"));
    }

    #[test]
    fn test_bad_sort() {
        let err = list(Some("title"), None, None).validate().unwrap_err();
        assert!(err.to_string().contains("there is no sort like title"));
    }

    #[test]
    fn test_bad_page() {
        let err = list(Some("price"), Some("desc"), Some("NaN")).validate().unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
        assert!(err.to_string().contains("'NaN'"));

        assert!(list(None, None, Some("-1")).validate().is_err());
    }

    async fn extract<T: FromRequestParts<(), Rejection = Error>>(uri: &str) -> Result<T> {
        let (mut parts, _) = axum::http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        T::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_repeated_keys_take_first_value() {
        let query: ListQuery = extract("/adverts?page=1&page=2&order=desc").await.unwrap();
        assert_eq!(query.page.as_deref(), Some("1"));
        assert_eq!(query.order.as_deref(), Some("desc"));
        assert_eq!(query.sort, None);

        let query: GetQuery = extract("/adverts/1?fields=title&fields=price").await.unwrap();
        assert_eq!(query.fields.as_deref(), Some("title"));
    }

    #[tokio::test]
    async fn test_query_values_are_percent_decoded() {
        let query: GetQuery = extract("/adverts/1?fields=title%2Cprice").await.unwrap();
        let selection = query.validate().unwrap();
        assert_eq!(selection.fields(), &[AdvertField::Title, AdvertField::Price]);
    }
}
