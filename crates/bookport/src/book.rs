use serde::Serialize;

/// Bibliographic fields as they were scraped from a catalog page.
///
/// Only light cleaning has been applied: names and scalars are whitespace collapsed and the page
/// count is reduced to its digits. The publish date is kept exactly as the catalog wrote it, see
/// [`crate::normalize::convert_pubdate`] for how it is interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RawBook {
    /// Title of the book.
    pub title: String,
    /// Publisher, empty when the page does not list one.
    pub publisher: String,
    /// Authors in the order the catalog lists them.
    pub authors: Vec<String>,
    /// Translators in the order the catalog lists them.
    pub translators: Vec<String>,
    /// Free-form publish date, e.g. `2018-8`.
    pub pubdate: Option<String>,
    /// Producer (出品方), the imprint or studio behind the edition.
    pub producer: Option<String>,
    /// Binding, e.g. 平装 or 精装.
    pub binding: Option<String>,
    /// Page count, digits only.
    pub pages: Option<String>,
}
