use std::time::Duration;

use serde::Serialize;

pub(crate) mod douban;
pub(crate) mod notion;

/// The parts of an HTTP response that the importer looks at.
#[derive(Debug)]
pub(crate) struct Reply {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl Reply {
    #[cfg(test)]
    pub(crate) fn new<S: Into<String>>(status: u16, body: S) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The first `max` characters of the body, for use in error messages.
    pub(crate) fn snippet(&self, max: usize) -> String {
        self.body.chars().take(max).collect()
    }
}

pub(crate) type Headers<'a> = &'a [(&'a str, &'a str)];

pub(crate) trait Client
where
    Self: Default,
{
    fn get_text(&self, url: &str, headers: Headers<'_>, timeout: Duration) -> Result<Reply, Error>;

    fn post_json<T>(
        &self,
        url: &str,
        headers: Headers<'_>,
        body: &T,
        timeout: Duration,
    ) -> Result<Reply, Error>
    where
        T: Serialize + ?Sized;

    /// Blocks the current thread, used between retries.
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl Client for reqwest::blocking::Client {
    fn get_text(&self, url: &str, headers: Headers<'_>, timeout: Duration) -> Result<Reply, Error> {
        let request = headers
            .iter()
            .fold(self.get(url).timeout(timeout), |req, (name, value)| {
                req.header(*name, *value)
            });

        request.send().map_err(transport_error).and_then(into_reply)
    }

    fn post_json<T>(
        &self,
        url: &str,
        headers: Headers<'_>,
        body: &T,
        timeout: Duration,
    ) -> Result<Reply, Error>
    where
        T: Serialize + ?Sized,
    {
        let request = headers
            .iter()
            .fold(self.post(url).timeout(timeout), |req, (name, value)| {
                req.header(*name, *value)
            });

        request
            .json(body)
            .send()
            .map_err(transport_error)
            .and_then(into_reply)
    }
}

fn into_reply(resp: reqwest::blocking::Response) -> Result<Reply, Error> {
    let status = resp.status().as_u16();
    let body = resp.text().map_err(transport_error)?;
    Ok(Reply { status, body })
}

/// Timeouts are kept apart from other transport failures so that callers can retry them.
fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::wrap(ErrorKind::Timeout, e)
    } else {
        Error::wrap(ErrorKind::Transport, e)
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_reply_producer, MockClient, NetworkErrorProducer, Producer, TimeoutProducer,
    ATTEMPTS, BODY_SINK, HEADER_SINK, PAUSES, URL_SINK,
};

use crate::{Error, ErrorKind};

#[cfg(test)]
mod test {

    use super::*;

    thread_local! {
        pub(crate) static URL_SINK: std::cell::RefCell<Option<String>> = std::cell::RefCell::new(None);
        pub(crate) static HEADER_SINK: std::cell::RefCell<Vec<(String, String)>> = std::cell::RefCell::new(vec![]);
        pub(crate) static BODY_SINK: std::cell::RefCell<Option<serde_json::Value>> = std::cell::RefCell::new(None);
        pub(crate) static ATTEMPTS: std::cell::Cell<usize> = std::cell::Cell::new(0);
        pub(crate) static PAUSES: std::cell::RefCell<Vec<Duration>> = std::cell::RefCell::new(vec![]);
    }

    /// Asserts that the expected URL is the same as the last one provided to the [`MockClient`].
    ///
    /// The [`MockClient`] will update the static thread local `URL_SINK` with the URL string that
    /// was passed to it, this allows for asserting that implementing functions or methods are
    /// requesting the correct URL.
    macro_rules! assert_url {
        ($expected: expr) => {
            assert_url!($expected, "");
        };
        ($expected: expr, $($arg: tt)+) => {
            let url = crate::api::URL_SINK.with(|url| url.borrow().clone().unwrap_or_default());
            assert_eq!($expected, url, $($arg)+);
        };
    }

    pub(crate) trait Producer<T>
    where
        Self: Default,
    {
        fn produce() -> Result<T, Error>;
    }

    /// A client that answers `GET`s with `G` and `POST`s with `P`.
    ///
    /// Each call bumps the thread local `ATTEMPTS` counter before producing, so producers can
    /// change their answer between attempts. Pauses are recorded in `PAUSES` instead of sleeping.
    #[derive(Default)]
    pub(crate) struct MockClient<G: Producer<Reply> = EmptyReplyProducer, P: Producer<Reply> = EmptyReplyProducer> {
        _get: std::marker::PhantomData<G>,
        _post: std::marker::PhantomData<P>,
    }

    fn record(url: &str, headers: Headers<'_>) {
        URL_SINK.with(|sink| *sink.borrow_mut() = Some(url.to_owned()));
        HEADER_SINK.with(|sink| {
            *sink.borrow_mut() = headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect();
        });
        ATTEMPTS.with(|a| a.set(a.get() + 1));
    }

    impl<G: Producer<Reply>, P: Producer<Reply>> Client for MockClient<G, P> {
        fn get_text(&self, url: &str, headers: Headers<'_>, _: Duration) -> Result<Reply, Error> {
            record(url, headers);
            G::produce()
        }

        fn post_json<T>(
            &self,
            url: &str,
            headers: Headers<'_>,
            body: &T,
            _: Duration,
        ) -> Result<Reply, Error>
        where
            T: Serialize + ?Sized,
        {
            record(url, headers);
            BODY_SINK.with(|sink| *sink.borrow_mut() = serde_json::to_value(body).ok());
            P::produce()
        }

        fn pause(&self, duration: Duration) {
            PAUSES.with(|p| p.borrow_mut().push(duration));
        }
    }

    macro_rules! impl_reply_producer {
        ($($producer:ident => $exp:expr,)*) => {
            $(
                #[derive(Default)]
                pub(crate) struct $producer;

                impl crate::api::Producer<crate::api::Reply> for $producer {
                    fn produce() -> Result<crate::api::Reply, crate::Error> {
                        $exp
                    }
                }
            )*
        };
    }
    impl_reply_producer! {
        EmptyReplyProducer => Ok(Reply::new(200, "")),
        NetworkErrorProducer => Err(Error::new(ErrorKind::Transport, "Network error")),
        TimeoutProducer => Err(Error::new(ErrorKind::Timeout, "operation timed out")),
    }

    pub(crate) use assert_url;
    pub(crate) use impl_reply_producer;
}
