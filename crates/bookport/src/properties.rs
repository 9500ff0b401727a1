//! The Notion database schema that imported books are written to.
//!
//! The database must have exactly these columns:
//!
//! | Column   | Type      |
//! |----------|-----------|
//! | 书名     | Title     |
//! | 出版社   | Text      |
//! | 作者     | Text      |
//! | 译者     | Text      |
//! | 出版日期 | Date      |
//! | 出品方   | Text      |
//! | 封面类型 | Select    |
//! | 页数     | Number    |
//!
//! A name or type mismatch is reported by Notion when the page is created.

use serde::Serialize;

use crate::{
    book::RawBook,
    normalize::{collapse_spaces, convert_pubdate},
};

/// A single Notion property value.
///
/// Serializes to the shape the Notion API expects, e.g. `{"number": 200}` or `{"date": null}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// The title column of a database.
    Title(Vec<RichText>),
    /// A text column.
    RichText(Vec<RichText>),
    /// A date column, `None` clears the value.
    Date(Option<DateValue>),
    /// A number column, `None` clears the value.
    Number(Option<u64>),
    /// A single select column, `None` clears the value.
    Select(Option<SelectOption>),
}

/// A run of plain text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RichText {
    text: TextContent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct TextContent {
    content: String,
}

/// The start of a date value, formatted as `YYYY-MM-DD`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateValue {
    start: String,
}

/// A select option referenced by name. Notion creates the option if it does not exist yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    name: String,
}

impl RichText {
    fn new(content: String) -> Self {
        Self {
            text: TextContent { content },
        }
    }

    /// Returns the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.text.content
    }
}

impl Property {
    /// A title value, always holding a single (possibly empty) text run.
    #[must_use]
    pub fn title(text: &str) -> Self {
        Self::Title(vec![RichText::new(text.to_owned())])
    }

    /// A text value, empty text is stored as no text at all.
    #[must_use]
    pub fn rich_text(text: &str) -> Self {
        if text.is_empty() {
            Self::RichText(vec![])
        } else {
            Self::RichText(vec![RichText::new(text.to_owned())])
        }
    }

    /// A date value from an already normalized `YYYY-MM-DD` string.
    #[must_use]
    pub fn date(date: Option<String>) -> Self {
        Self::Date(date.filter(|d| !d.is_empty()).map(|start| DateValue { start }))
    }

    /// A number value parsed from a string of digits.
    ///
    /// Anything that does not parse (an empty string, stray characters or a value too large)
    /// clears the column instead of failing.
    #[must_use]
    pub fn number(digits: &str) -> Self {
        Self::Number(digits.trim().parse().ok())
    }

    /// A select value, an empty name clears the column.
    #[must_use]
    pub fn select(name: &str) -> Self {
        if name.is_empty() {
            Self::Select(None)
        } else {
            Self::Select(Some(SelectOption {
                name: name.to_owned(),
            }))
        }
    }
}

/// The `properties` object of a create page request.
///
/// Every column is always present, so a [`Properties`] value can't be partially built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Properties {
    /// 书名
    #[serde(rename = "书名")]
    pub title: Property,
    /// 出版社
    #[serde(rename = "出版社")]
    pub publisher: Property,
    /// 作者
    #[serde(rename = "作者")]
    pub author: Property,
    /// 译者
    #[serde(rename = "译者")]
    pub translator: Property,
    /// 出版日期
    #[serde(rename = "出版日期")]
    pub publish_date: Property,
    /// 出品方
    #[serde(rename = "出品方")]
    pub producer: Property,
    /// 封面类型
    #[serde(rename = "封面类型")]
    pub binding: Property,
    /// 页数
    #[serde(rename = "页数")]
    pub pages: Property,
}

/// Map a scraped book onto the database columns.
///
/// This never fails, fields that are missing from `book` clear their column.
#[must_use]
pub fn build_properties(book: &RawBook) -> Properties {
    let author = collapse_spaces(&book.authors.join(", "));
    let translator = collapse_spaces(&book.translators.join(", "));

    Properties {
        title: Property::title(&book.title),
        publisher: Property::rich_text(&collapse_spaces(&book.publisher)),
        author: Property::rich_text(&author),
        translator: Property::rich_text(&translator),
        publish_date: Property::date(convert_pubdate(book.pubdate.as_deref())),
        producer: Property::rich_text(book.producer.as_deref().unwrap_or_default()),
        binding: Property::select(book.binding.as_deref().unwrap_or_default()),
        pages: Property::number(book.pages.as_deref().unwrap_or_default()),
    }
}
