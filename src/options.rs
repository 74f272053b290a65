//! Query options shared by list endpoints.
//!
//! Option structs are plain `Serialize` types turned into query strings by
//! `serde_urlencoded`. Keys use the API's PascalCase names and fields holding
//! their default value are skipped.

use serde::{Serialize, Serializer};

/// Page size used by the server when `per_page` is unset.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Pagination parameters, passed through to the server as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListOptions {
    #[serde(skip_serializing_if = "is_zero")]
    pub per_page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub page: u32,
}

impl ListOptions {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { per_page, page }
    }

    pub fn per_page_or_default(&self) -> u32 {
        if self.per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            self.per_page
        }
    }

    /// Page numbers start at 1.
    pub fn page_or_default(&self) -> u32 {
        self.page.max(1)
    }

    pub fn limit(&self) -> u32 {
        self.per_page_or_default()
    }

    /// Number of items before the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_or_default() - 1) * u64::from(self.per_page_or_default())
    }
}

/// Serializes a list as a single comma-separated value (`Kinds=a,b`).
pub(crate) fn comma_separated<S>(values: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&values.join(","))
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

pub(crate) fn is_zero(n: &u32) -> bool {
    *n == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Default)]
    #[serde(rename_all = "PascalCase")]
    struct Opts {
        #[serde(skip_serializing_if = "String::is_empty")]
        name: String,
        #[serde(skip_serializing_if = "Vec::is_empty", serialize_with = "comma_separated")]
        kinds: Vec<String>,
        #[serde(skip_serializing_if = "is_false")]
        exported: bool,
        #[serde(flatten)]
        list: ListOptions,
    }

    #[test]
    fn default_options_encode_empty() {
        assert_eq!(serde_urlencoded::to_string(Opts::default()).unwrap(), "");
    }

    #[test]
    fn options_encode_pascal_case_and_commas() {
        let opts = Opts {
            name: "x".into(),
            kinds: vec!["func".into(), "type".into()],
            exported: true,
            list: ListOptions::new(2, 1),
        };
        assert_eq!(
            serde_urlencoded::to_string(&opts).unwrap(),
            "Name=x&Kinds=func%2Ctype&Exported=true&PerPage=1&Page=2"
        );
    }

    #[test]
    fn list_options_defaults() {
        let opts = ListOptions::default();
        assert_eq!(opts.per_page_or_default(), DEFAULT_PER_PAGE);
        assert_eq!(opts.page_or_default(), 1);
        assert_eq!(opts.offset(), 0);

        let opts = ListOptions::new(3, 20);
        assert_eq!(opts.limit(), 20);
        assert_eq!(opts.offset(), 40);
    }
}
