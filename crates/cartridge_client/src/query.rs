//! Query options and their wire serialization.

/// Optional sort, field selection and filter for a platforms fetch.
///
/// Every part is optional; absent parts are left out of the request
/// entirely rather than sent empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    sort: Option<String>,
    field_list: Option<Vec<String>>,
    filter: Option<Vec<(String, String)>>,
}

impl QueryOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sort expression, e.g. `"original_price:desc"`. Sent verbatim.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Restricts the returned fields, in the given order. An empty list
    /// clears the selection.
    #[must_use]
    pub fn field_list<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.field_list = (!fields.is_empty()).then_some(fields);
        self
    }

    /// Adds one filter condition. Conditions keep insertion order; setting
    /// a key again replaces its value in place.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        let filter = self.filter.get_or_insert_with(Vec::new);
        match filter.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => filter.push((key, value)),
        }
        self
    }

    /// Returns the sort expression.
    pub fn sort_expr(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    /// Returns the `field_list` wire value, if fields were selected.
    pub fn field_list_param(&self) -> Option<String> {
        self.field_list.as_ref().map(|fields| fields.join(","))
    }

    /// Returns the `filter` wire value, if any condition was set.
    pub fn filter_param(&self) -> Option<String> {
        self.filter.as_ref().map(|pairs| {
            pairs
                .iter()
                .map(|(key, value)| format!("{key}:{value}"))
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    /// Wire parameters contributed by these options, in a stable order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(fields) = self.field_list_param() {
            params.push(("field_list", fields));
        }
        if let Some(filter) = self.filter_param() {
            params.push(("filter", filter));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn field_list_is_comma_joined_in_order() {
        let options = QueryOptions::new().field_list(["name", "price"]);
        assert_eq!(options.field_list_param().as_deref(), Some("name,price"));
    }

    #[test]
    fn single_filter() {
        let options = QueryOptions::new().filter("name", "PC");
        assert_snapshot!(options.filter_param().unwrap(), @"name:PC");
    }

    #[test]
    fn filters_keep_insertion_order() {
        let options = QueryOptions::new()
            .filter("name", "PC")
            .filter("category", "console");
        assert_snapshot!(options.filter_param().unwrap(), @"name:PC,category:console");
    }

    #[test]
    fn repeated_filter_key_replaces_in_place() {
        let options = QueryOptions::new()
            .filter("name", "PC")
            .filter("category", "console")
            .filter("name", "Amiga");
        assert_eq!(
            options.filter_param().as_deref(),
            Some("name:Amiga,category:console")
        );
    }

    #[test]
    fn empty_field_list_is_omitted() {
        let options = QueryOptions::new().field_list(Vec::<String>::new());
        assert_eq!(options.field_list_param(), None);
        assert!(options.to_params().is_empty());
    }

    #[test]
    fn sort_is_verbatim() {
        let options = QueryOptions::new().sort("original_price:desc");
        assert_eq!(options.sort_expr(), Some("original_price:desc"));
        assert_eq!(
            options.to_params(),
            vec![("sort", "original_price:desc".to_string())]
        );
    }

    #[test]
    fn absent_options_produce_no_params() {
        assert!(QueryOptions::new().to_params().is_empty());
        assert_eq!(QueryOptions::new().filter_param(), None);
        assert_eq!(QueryOptions::new().field_list_param(), None);
    }

    #[test]
    fn all_options_together() {
        let options = QueryOptions::new()
            .sort("name:asc")
            .field_list(vec!["name".to_string(), "abbreviation".to_string()])
            .filter("name", "PC");
        let rendered = options
            .to_params()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        assert_snapshot!(rendered, @"field_list=name,abbreviation&filter=name:PC&sort=name:asc");
    }
}
