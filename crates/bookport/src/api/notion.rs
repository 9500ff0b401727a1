use std::time::Duration;

use log::{info, trace, warn};
use serde::Serialize;
use serde_json::Value;

use crate::{properties::Properties, Error, ErrorKind};

use super::{Client, Reply};

const NOTION_PAGES_URL: &str = "https://api.notion.com/v1/pages";
const NOTION_VERSION: &str = "2022-06-28";
const TIMEOUT: Duration = Duration::from_secs(30);

const ATTEMPTS: usize = 3;
const BACKOFF: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct CreatePage<'a> {
    parent: Parent<'a>,
    properties: &'a Properties,
}

#[derive(Serialize)]
struct Parent<'a> {
    database_id: &'a str,
}

pub(crate) fn create_page<C: Client>(
    token: &str,
    database_id: &str,
    properties: &Properties,
) -> Result<Value, Error> {
    if token.is_empty() {
        return Err(Error::new(ErrorKind::Auth, "Notion token is empty"));
    }
    if database_id.is_empty() {
        return Err(Error::new(ErrorKind::Config, "Notion database id is empty"));
    }

    let authorization = format!("Bearer {token}");
    let headers = [
        ("Authorization", authorization.as_str()),
        ("Notion-Version", NOTION_VERSION),
        ("Content-Type", "application/json"),
    ];
    let body = CreatePage {
        parent: Parent { database_id },
        properties,
    };

    let client = C::default();
    let reply = send_with_retry(&client, &headers, &body)?;

    if reply.status != 200 {
        return Err(Error::new(
            ErrorKind::Rejected,
            format!(
                "Notion responded with status {}: {}",
                reply.status,
                reply.snippet(500)
            ),
        ));
    }

    let page: Value =
        serde_json::from_str(&reply.body).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

    match page.get("url").and_then(Value::as_str) {
        Some(url) => info!("Created Notion page {url}"),
        None => trace!("Created Notion page"),
    }

    Ok(page)
}

/// Only timeouts are retried, every other error is returned straight away.
fn send_with_retry<C: Client>(
    client: &C,
    headers: &[(&str, &str)],
    body: &CreatePage<'_>,
) -> Result<Reply, Error> {
    let mut last_timeout = None;

    for attempt in 1..=ATTEMPTS {
        match client.post_json(NOTION_PAGES_URL, headers, body, TIMEOUT) {
            Err(err) if err.kind() == ErrorKind::Timeout => {
                warn!("Writing to Notion timed out (attempt {attempt} of {ATTEMPTS})");
                last_timeout = Some(err);
                if attempt < ATTEMPTS {
                    client.pause(BACKOFF);
                }
            }
            res => return res,
        }
    }

    let err = Error::new(
        ErrorKind::Timeout,
        format!("Writing to Notion timed out {ATTEMPTS} times in a row - check the network"),
    );
    Err(match last_timeout {
        Some(cause) => err.with_source(cause),
        None => err,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use crate::{
        api::{
            assert_url, impl_reply_producer, MockClient, NetworkErrorProducer, Reply,
            TimeoutProducer, ATTEMPTS, BODY_SINK, HEADER_SINK, PAUSES,
        },
        book::RawBook,
        properties::{build_properties, Properties},
        ErrorKind,
    };

    impl_reply_producer! {
        PageProducer => Ok(Reply::new(200, r#"{"object": "page", "id": "abc", "url": "https://www.notion.so/abc"}"#)),
        RejectedProducer => Ok(Reply::new(400, format!(r#"{{"message": "{}"}}"#, "y".repeat(1000)))),
        NotJsonProducer => Ok(Reply::new(200, "<html>")),
        SlowTwiceProducer => {
            if ATTEMPTS.with(std::cell::Cell::get) <= 2 {
                Err(crate::Error::new(ErrorKind::Timeout, "operation timed out"))
            } else {
                Ok(Reply::new(200, r#"{"id": "abc"}"#))
            }
        },
    }

    fn properties() -> Properties {
        build_properties(&RawBook {
            title: "T".to_owned(),
            ..RawBook::default()
        })
    }

    fn attempts() -> usize {
        ATTEMPTS.with(std::cell::Cell::get)
    }

    fn pauses() -> Vec<Duration> {
        PAUSES.with(|p| p.borrow().clone())
    }

    #[test]
    fn page_is_created_in_database() {
        let page = super::create_page::<MockClient<PageProducer, PageProducer>>(
            "secret",
            "db-id",
            &properties(),
        )
        .unwrap();

        assert_eq!("abc", page["id"]);
        assert_url!("https://api.notion.com/v1/pages");

        let body = BODY_SINK.with(|b| b.borrow().clone()).unwrap();
        assert_eq!(json!({"database_id": "db-id"}), body["parent"]);
        assert_eq!(serde_json::to_value(properties()).unwrap(), body["properties"]);
    }

    #[test]
    fn protocol_headers_are_sent() {
        super::create_page::<MockClient<PageProducer, PageProducer>>("secret", "db", &properties())
            .unwrap();

        let headers = HEADER_SINK.with(|sink| sink.borrow().clone());
        let expected = [
            ("Authorization", "Bearer secret"),
            ("Notion-Version", "2022-06-28"),
            ("Content-Type", "application/json"),
        ];
        for (name, value) in expected {
            assert!(
                headers.iter().any(|(k, v)| k == name && v == value),
                "missing header {name}"
            );
        }
    }

    #[test]
    fn empty_token_is_auth_error() {
        let err = super::create_page::<MockClient>("", "db", &properties()).unwrap_err();
        assert_eq!(ErrorKind::Auth, err.kind());
        assert_eq!(0, attempts());
    }

    #[test]
    fn empty_database_id_is_config_error() {
        let err = super::create_page::<MockClient>("secret", "", &properties()).unwrap_err();
        assert_eq!(ErrorKind::Config, err.kind());
        assert_eq!(0, attempts());
    }

    #[test]
    fn timeouts_are_retried_until_success() {
        let page = super::create_page::<MockClient<PageProducer, SlowTwiceProducer>>(
            "secret",
            "db",
            &properties(),
        )
        .unwrap();

        assert_eq!("abc", page["id"]);
        assert_eq!(3, attempts());
        assert_eq!(vec![Duration::from_secs(2); 2], pauses());
    }

    #[test]
    fn gives_up_after_three_timeouts() {
        let err = super::create_page::<MockClient<PageProducer, TimeoutProducer>>(
            "secret",
            "db",
            &properties(),
        )
        .unwrap_err();

        assert_eq!(ErrorKind::Timeout, err.kind());
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(3, attempts());
        assert_eq!(2, pauses().len());
    }

    #[test]
    fn other_transport_errors_are_not_retried() {
        let err = super::create_page::<MockClient<PageProducer, NetworkErrorProducer>>(
            "secret",
            "db",
            &properties(),
        )
        .unwrap_err();

        assert_eq!(ErrorKind::Transport, err.kind());
        assert_eq!(1, attempts());
        assert!(pauses().is_empty());
    }

    #[test]
    fn rejection_is_not_retried_and_body_is_truncated() {
        let err = super::create_page::<MockClient<PageProducer, RejectedProducer>>(
            "secret",
            "db",
            &properties(),
        )
        .unwrap_err();

        assert_eq!(ErrorKind::Rejected, err.kind());
        assert_eq!(1, attempts());

        let message = err.to_string();
        assert!(message.contains("status 400"));
        assert!(message.contains(&"y".repeat(400)));
        assert!(!message.contains(&"y".repeat(500)));
    }

    #[test]
    fn non_json_body_is_deserialize_error() {
        let err = super::create_page::<MockClient<PageProducer, NotJsonProducer>>(
            "secret",
            "db",
            &properties(),
        )
        .unwrap_err();

        assert_eq!(ErrorKind::Deserialize, err.kind());
    }
}
