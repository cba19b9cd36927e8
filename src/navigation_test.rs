use super::*;

#[test]
fn static_routes() {
    assert_eq!(Route::Home.href(), "/");
    assert_eq!(Route::Login.href(), "/login");
    assert_eq!(Route::Register.href(), "/register");
    assert_eq!(Route::Chat.href(), "/chat");
}

#[test]
fn post_route_encodes_slug() {
    let route = Route::Post { slug: "hello world/2".to_owned() };
    assert_eq!(route.href(), "/post?slug=hello+world%2F2");
    let plain = Route::Post { slug: "first-post".to_owned() };
    assert_eq!(plain.href(), "/post?slug=first-post");
}
