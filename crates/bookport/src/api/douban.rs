use std::time::Duration;

use log::{debug, info, trace};
use scraper::{ElementRef, Html, Node, Selector};

use crate::{
    book::RawBook,
    normalize::{collapse_spaces, digits_only, split_names},
    Error, ErrorKind,
};

use super::Client;

const DOUBAN_ISBN_URL: &str = "https://book.douban.com/isbn/";
const DOUBAN_REFERER: &str = "https://book.douban.com/";
// Douban answers unidentified clients with 418, so pretend to be a desktop browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const TIMEOUT: Duration = Duration::from_secs(10);

const TITLE_SELECTOR: &str = r#"span[property="v:itemreviewed"]"#;
const INFO_SELECTOR: &str = "div#info";
const LABEL_SELECTOR: &str = "span.pl";

type Setter = fn(&mut RawBook, &str);

/// Labels are matched with `starts_with` since Douban is not consistent with the punctuation
/// that follows them. The first match wins.
const LABELS: [(&str, Setter); 7] = [
    ("作者", set_authors),
    ("译者", set_translators),
    ("出版社", set_publisher),
    ("出品方", set_producer),
    ("装帧", set_binding),
    ("出版年", set_pubdate),
    ("页数", set_pages),
];

pub(crate) fn get_book_by_isbn<C: Client>(isbn: &str) -> Result<RawBook, Error> {
    let isbn = clean_isbn(isbn);
    if isbn.is_empty() {
        return Err(Error::new(ErrorKind::InvalidInput, "ISBN is empty"));
    }

    info!("Searching for ISBN '{isbn}' on Douban");
    let url = format!("{DOUBAN_ISBN_URL}{isbn}/");

    let client = C::default();
    let reply = client.get_text(
        &url,
        &[("User-Agent", USER_AGENT), ("Referer", DOUBAN_REFERER)],
        TIMEOUT,
    )?;

    match reply.status {
        200 => trace!("Request was successful"),
        404 => {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Douban has no book page for this ISBN: {url}"),
            ))
        }
        status => {
            return Err(Error::new(
                ErrorKind::UnexpectedStatus,
                format!(
                    "Douban responded with status {status}, body starts with: {}",
                    reply.snippet(200)
                ),
            ))
        }
    }

    parse_book_page(&reply.body)
}

/// Remove hyphens and whitespace, `978-7-5447-3217-2` is requested as `9787544732172`.
fn clean_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

fn selector(selectors: &str) -> Selector {
    Selector::parse(selectors).expect("Selector should always be valid")
}

pub(crate) fn parse_book_page(html: &str) -> Result<RawBook, Error> {
    let document = Html::parse_document(html);

    let title_selector = selector(TITLE_SELECTOR);
    let title = document.select(&title_selector).next().ok_or_else(|| {
        Error::new(
            ErrorKind::PageStructure,
            format!("No title found ({TITLE_SELECTOR}) - the Douban page layout may have changed"),
        )
    })?;

    let info_selector = selector(INFO_SELECTOR);
    let info = document.select(&info_selector).next().ok_or_else(|| {
        Error::new(
            ErrorKind::PageStructure,
            format!("No info block found ({INFO_SELECTOR}) - the Douban page layout may have changed"),
        )
    })?;

    let mut book = RawBook {
        title: text_of(title),
        ..RawBook::default()
    };

    let label_selector = selector(LABEL_SELECTOR);
    for label in info.select(&label_selector) {
        let text = label.text().collect::<String>();
        let name = text.trim().trim_end_matches(is_colon);

        let value = label_value(label);
        if value.is_empty() {
            continue;
        }

        match LABELS.iter().find(|(prefix, _)| name.starts_with(prefix)) {
            Some((_, set)) => set(&mut book, &value),
            None => debug!("Ignoring unknown label '{name}'"),
        }
    }

    Ok(book)
}

/// Collect the text that follows `label` up to the next `<br>`.
fn label_value(label: ElementRef<'_>) -> String {
    let mut parts = vec![];

    for sibling in label.next_siblings() {
        match sibling.value() {
            Node::Element(element) if element.name() == "br" => break,
            Node::Element(_) => {
                if let Some(text) = ElementRef::wrap(sibling).map(text_of) {
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
            }
            Node::Text(text) => {
                let cleaned = text.replace("&nbsp;", " ").replace('\u{a0}', " ");
                let cleaned = cleaned.trim();
                if !cleaned.is_empty() && cleaned != "/" {
                    parts.push(cleaned.to_owned());
                }
            }
            _ => {}
        }
    }

    parts
        .join(" ")
        .trim()
        .trim_start_matches(is_colon)
        .trim()
        .to_owned()
}

fn text_of(element: ElementRef<'_>) -> String {
    collapse_spaces(&element.text().collect::<String>())
}

fn is_colon(c: char) -> bool {
    c == ':' || c == '：'
}

fn set_authors(book: &mut RawBook, value: &str) {
    book.authors = split_names(value);
}

fn set_translators(book: &mut RawBook, value: &str) {
    book.translators = split_names(value);
}

fn set_publisher(book: &mut RawBook, value: &str) {
    book.publisher = collapse_spaces(value);
}

fn set_producer(book: &mut RawBook, value: &str) {
    book.producer = Some(collapse_spaces(value));
}

fn set_binding(book: &mut RawBook, value: &str) {
    book.binding = Some(collapse_spaces(value));
}

fn set_pubdate(book: &mut RawBook, value: &str) {
    book.pubdate = Some(value.to_owned());
}

fn set_pages(book: &mut RawBook, value: &str) {
    book.pages = Some(digits_only(&collapse_spaces(value)));
}
