//! Behavioural tests for cursor tokens, limits, and envelope links.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use pagination::{Cursor, PageParams, PaginationLinks};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use url::Url;

#[derive(Default, ScenarioState)]
struct World {
    request: Slot<Url>,
    links: Slot<PaginationLinks>,
    params: Slot<PageParams>,
    token: Slot<String>,
}

impl World {
    fn next_link(&self) -> Url {
        let links = self.links.get().expect("links should be built");
        Url::parse(&links.next.expect("next link")).expect("absolute next link")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

#[given("a request for {url}")]
fn a_request_for(world: &World, url: Url) {
    world.request.set(url);
}

#[given("a requested limit of {limit}")]
fn a_requested_limit(world: &World, limit: usize) {
    world.params.set(PageParams::new(None, Some(limit)));
}

#[given("no requested limit")]
fn no_requested_limit(world: &World) {
    world.params.set(PageParams::new(None, None));
}

#[given("the cursor token {token}")]
fn the_cursor_token(world: &World, token: String) {
    world.token.set(token);
}

#[when("links are built with next cursor {token}")]
fn links_are_built(world: &World, token: String) {
    let request = world.request.get().expect("request should be set");
    let next = Some(token);
    world
        .links
        .set(PaginationLinks::for_request(&request, next.as_deref(), None));
}

#[then("the next link keeps {first} and {second}")]
fn the_next_link_keeps(world: &World, first: String, second: String) {
    let next = world.next_link();
    let query = next.query().expect("query string");
    for pair in [first, second] {
        assert!(query.contains(pair.as_str()), "{query} lacks {pair}");
    }
}

#[then("the next link carries exactly one cursor {token}")]
fn the_next_link_carries_one_cursor(world: &World, token: String) {
    let cursors: Vec<String> = world
        .next_link()
        .query_pairs()
        .filter(|(key, _)| key == "cursor")
        .map(|(_, value)| value.into_owned())
        .collect();
    assert_eq!(cursors, vec![token]);
}

#[then("there is no previous link")]
fn there_is_no_previous_link(world: &World) {
    let links = world.links.get().expect("links should be built");
    assert!(links.prev.is_none());
}

#[then("the effective limit is {limit}")]
fn the_effective_limit_is(world: &World, limit: usize) {
    let params = world.params.get().expect("params should be set");
    assert_eq!(params.limit(), limit);
}

#[then("decoding the cursor fails")]
fn decoding_the_cursor_fails(world: &World) {
    let token = world.token.get().expect("token should be set");
    assert!(Cursor::<u64>::decode(&token).is_err());
}

#[scenario(path = "tests/features/cursor_paging.feature")]
fn cursor_paging(world: World) {
    let _ = world;
}
