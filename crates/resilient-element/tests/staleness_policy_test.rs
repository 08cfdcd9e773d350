// Integration tests for the eager-probe staleness policy
//
// Tests cover:
// - A healthy cache costs one probe per operation and no extra lookup
// - A stale cache is replaced before the operation runs
// - Other probe failures propagate as raised
// - Children inherit the policy and probe their own cache only
// - The policy can be read from the environment


use fake_page::{FakePage, NodeSpec, init_tracing};
use resilient_element::{
    Error, Locator, ResilientElement, STALENESS_POLICY_ENV, StalenessPolicy, WebElement,
};
use std::sync::Arc;

#[tokio::test]
async fn test_probe_reuses_healthy_cache() {
    let page = FakePage::new();
    let main = page.add(None, NodeSpec::new("div").id("main"));
    let handle = ResilientElement::builder()
        .context(page.context())
        .locator(Locator::id("main"))
        .policy(StalenessPolicy::EagerProbe)
        .build()
        .expect("Failed to build handle");

    handle.click().await.unwrap();
    assert_eq!(page.calls(main, "is_displayed"), 0, "Nothing to probe yet");

    handle.click().await.unwrap();
    handle.click().await.unwrap();

    assert_eq!(page.calls(main, "is_displayed"), 2);
    assert_eq!(page.calls(main, "click"), 3);
    assert_eq!(page.root_lookups(), 1);
}

#[tokio::test]
async fn test_probe_replaces_stale_cache_before_operation() {
    init_tracing();
    let page = FakePage::new();
    let main = page.add(None, NodeSpec::new("div").id("main"));
    let handle = ResilientElement::new(page.context(), Locator::id("main"))
        .unwrap()
        .with_policy(StalenessPolicy::EagerProbe);

    handle.click().await.unwrap();
    page.refresh(main);
    handle.click().await.expect("Click should run on a fresh reference");

    assert_eq!(page.root_lookups(), 2);
    // No click was attempted against the stale reference
    assert_eq!(page.calls(main, "click"), 2);
    assert_eq!(page.calls(main, "is_displayed"), 1);
}

#[tokio::test]
async fn test_probe_policy_still_retries_once() {
    let page = FakePage::new();
    let main = page.add(None, NodeSpec::new("div").id("main"));
    let handle = ResilientElement::new(page.context(), Locator::id("main"))
        .unwrap()
        .with_policy(StalenessPolicy::EagerProbe);

    handle.click().await.unwrap();
    page.poison(main);

    let err = handle.click().await.expect_err("Poisoned node stays stale");

    assert!(matches!(err, Error::StaleElementReference(_)));
    // Initial lookup, re-lookup after the stale probe, re-lookup for the retry
    assert_eq!(page.root_lookups(), 3);
    assert!(!handle.is_resolved());
}

#[tokio::test]
async fn test_probe_failure_propagates_without_resolving() {
    let page = FakePage::new();
    let main = page.add(None, NodeSpec::new("div").id("main"));
    let handle = ResilientElement::new(page.context(), Locator::id("main"))
        .unwrap()
        .with_policy(StalenessPolicy::EagerProbe);

    handle.click().await.unwrap();
    page.fail_visibility(main, "visibility check timed out");

    let err = handle.click().await.expect_err("Probe failure should surface");

    match err {
        Error::Timeout(message) => assert_eq!(message, "visibility check timed out"),
        other => panic!("Expected Timeout, got: {:?}", other),
    }
    assert_eq!(page.calls(main, "is_displayed"), 1);
    assert_eq!(page.calls(main, "click"), 1, "The operation never ran");
    assert_eq!(page.root_lookups(), 1, "A non-stale probe failure is not recovered");
    assert!(handle.is_resolved(), "The cached reference is kept");
}

#[tokio::test]
async fn test_wrapped_element_is_probed() {
    let page = FakePage::new();
    let main = page.add(None, NodeSpec::new("div").id("main").text("Main"));
    let handle = ResilientElement::new(page.context(), Locator::id("main"))
        .unwrap()
        .with_policy(StalenessPolicy::EagerProbe);

    handle.wrapped_element().await.unwrap();
    page.refresh(main);

    let fresh = handle.wrapped_element().await.unwrap();
    assert_eq!(fresh.text().await.unwrap(), "Main");
    assert_eq!(page.root_lookups(), 2);
}

#[tokio::test]
async fn test_children_probe_only_their_own_cache() {
    let page = FakePage::new();
    let a = page.add(None, NodeSpec::new("div").id("a"));
    let b = page.add(Some(a), NodeSpec::new("button").id("b"));

    let handle_a = Arc::new(
        ResilientElement::new(page.context(), Locator::id("a"))
            .unwrap()
            .with_policy(StalenessPolicy::EagerProbe),
    );
    let handle_b = handle_a.child(Locator::id("b")).unwrap();
    assert_eq!(handle_b.policy(), StalenessPolicy::EagerProbe);

    handle_b.click().await.unwrap();
    handle_b.click().await.unwrap();
    assert_eq!(page.calls(b, "is_displayed"), 1);
    assert_eq!(page.calls(a, "is_displayed"), 0, "B's cache hit never reaches A");

    page.refresh(b);
    handle_b.click().await.unwrap();

    assert_eq!(page.calls(b, "is_displayed"), 2);
    assert_eq!(page.calls(a, "is_displayed"), 1, "A is probed when B re-resolves");
    assert_eq!(page.root_lookups(), 1);
    assert_eq!(page.times_found(b), 2);
}

#[test]
fn test_policy_from_env() {
    // Only this test touches the variable
    unsafe { std::env::remove_var(STALENESS_POLICY_ENV) };
    assert_eq!(
        StalenessPolicy::from_env().unwrap(),
        StalenessPolicy::LazyInvalidate
    );

    unsafe { std::env::set_var(STALENESS_POLICY_ENV, "eager-probe") };
    assert_eq!(
        StalenessPolicy::from_env().unwrap(),
        StalenessPolicy::EagerProbe
    );

    unsafe { std::env::set_var(STALENESS_POLICY_ENV, "always") };
    assert!(matches!(
        StalenessPolicy::from_env(),
        Err(Error::InvalidArgument(_))
    ));

    unsafe { std::env::remove_var(STALENESS_POLICY_ENV) };
}
