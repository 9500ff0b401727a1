#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # bookport
//!
//! bookport imports a book into a Notion database by ISBN. The book is looked up on Douban, the
//! fields of its info block are scraped into a [`RawBook`], mapped onto the columns of the
//! database as [`Properties`] and then written as a new page.
//!
//! ```no_run
//! let import = bookport::run_import("secret_token", "database_id", "9787208061644")?;
//! println!("{}", import.record.title);
//! # Ok::<(), bookport::Error>(())
//! ```

mod api;
mod book;
mod error;
pub mod normalize;
pub mod properties;

pub use book::RawBook;
pub use error::{Error, ErrorKind};
pub use properties::{build_properties, Properties};

use log::trace;
use serde::Serialize;
use serde_json::Value;

type Client = reqwest::blocking::Client;

/// Everything produced by a single [`run_import`].
#[derive(Debug, Serialize)]
pub struct Import {
    /// The book as it was scraped from Douban.
    pub record: RawBook,
    /// The properties that were sent to Notion.
    pub payload: Properties,
    /// The page object returned by Notion.
    pub response: Value,
}

/// Fetch and scrape the Douban page of the book with this `isbn`.
///
/// Hyphens and whitespace in the `isbn` are ignored.
///
/// # Errors
///
/// An `Err` is returned when the `isbn` is empty.
/// An `Err` is returned when Douban has no page for the `isbn` or responds with any other
/// unexpected status.
/// An `Err` is returned when the page is missing the title or the info block.
/// An `Err` is returned when the request fails or times out.
#[inline]
pub fn fetch_book(isbn: &str) -> Result<RawBook, Error> {
    trace!("Fetch book by ISBN of '{isbn}'");
    api::douban::get_book_by_isbn::<Client>(isbn)
}

/// Create a page with `properties` in the Notion database `database_id`.
///
/// Timeouts are retried up to three times, two seconds apart. The page object returned by
/// Notion is passed back untouched.
///
/// # Errors
///
/// An `Err` is returned when the `token` or `database_id` is empty.
/// An `Err` is returned when every attempt times out or the request fails for any other reason.
/// An `Err` is returned when Notion rejects the page, e.g. when the columns of the database do
/// not match [`Properties`].
#[inline]
pub fn create_page(
    token: &str,
    database_id: &str,
    properties: &Properties,
) -> Result<Value, Error> {
    trace!("Create page in Notion database '{database_id}'");
    api::notion::create_page::<Client>(token, database_id, properties)
}

/// Fetch the book with this `isbn` and map it onto [`Properties`] without writing anything.
///
/// # Errors
///
/// See [`fetch_book`].
#[inline]
pub fn preview(isbn: &str) -> Result<(RawBook, Properties), Error> {
    preview_with::<Client>(isbn)
}

/// Import the book with this `isbn` into the Notion database `database_id`.
///
/// The first failing step ends the import, a page is either created in full or not at all.
///
/// # Errors
///
/// See [`fetch_book`] and [`create_page`].
#[inline]
pub fn run_import(token: &str, database_id: &str, isbn: &str) -> Result<Import, Error> {
    run_import_with::<Client>(token, database_id, isbn)
}

fn preview_with<C: api::Client>(isbn: &str) -> Result<(RawBook, Properties), Error> {
    let record = api::douban::get_book_by_isbn::<C>(isbn)?;
    let payload = build_properties(&record);
    Ok((record, payload))
}

fn run_import_with<C: api::Client>(
    token: &str,
    database_id: &str,
    isbn: &str,
) -> Result<Import, Error> {
    let (record, payload) = preview_with::<C>(isbn)?;
    let response = api::notion::create_page::<C>(token, database_id, &payload)?;

    Ok(Import {
        record,
        payload,
        response,
    })
}
