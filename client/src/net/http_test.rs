use super::*;

#[test]
fn trailing_slash_is_dropped_from_base_url() {
    let api = HttpBlogApi::new("http://localhost:8000/", Duration::from_secs(1));
    assert_eq!(api.base_url(), "http://localhost:8000");
}

#[test]
fn same_origin_base_url_stays_empty() {
    let api = HttpBlogApi::new("", Duration::from_secs(1));
    assert_eq!(api.base_url(), "");
}

#[test]
fn server_build_reports_transport_failure() {
    let api = HttpBlogApi::new("", Duration::from_secs(1));
    let token = BearerToken::new("t");
    let result = poll_once(api.list_posts(&token));
    assert_eq!(result, Err(ApiError::Transport(SERVER_UNAVAILABLE.to_owned())));
}

/// The server-side stubs never suspend, so one poll is enough.
fn poll_once<F: std::future::Future>(future: F) -> F::Output {
    use std::task::{Context, Poll, Waker};

    let mut future = std::pin::pin!(future);
    let mut cx = Context::from_waker(Waker::noop());
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(output) => output,
        Poll::Pending => panic!("server-side stub suspended"),
    }
}
