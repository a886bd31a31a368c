mod common;

use common::{run_default_pipeline, sorted, test_config, FEED, HOME_PAGE};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use siterate::checks::{
    default_pipeline, DnsResolution, DomainVariations, HttpAndHttps, Hyperlinks, PageContent,
};
use siterate::errors::PipelineError;
use siterate::pipeline::PipelineBuilder;
use siterate::rating::RatingEngine;
use siterate::results::CheckName;
use siterate::testkit::FakeWeb;
use std::collections::BTreeSet;

fn expand(seed: &str) -> BTreeSet<String> {
    let pipeline = PipelineBuilder::new()
        .check(DomainVariations)
        .check(HttpAndHttps)
        .build();
    let run = pipeline
        .run(seed, &test_config(), &FakeWeb::new().collaborators())
        .unwrap();
    run.urls.snapshot().into_iter().collect()
}

proptest! {
    #[test]
    fn prop_expansion_is_closed(
        label in "[a-z][a-z0-9]{0,11}",
        tld in prop::sample::select(vec!["de", "com", "org"]),
        https in any::<bool>(),
        www in any::<bool>(),
    ) {
        let scheme = if https { "https" } else { "http" };
        let prefix = if www { "www." } else { "" };
        let seed = format!("{}://{}{}.{}/", scheme, prefix, label, tld);

        let expanded = expand(&seed);
        prop_assert_eq!(expanded.len(), 4);
        prop_assert!(expanded.contains(&seed));
        for url in &expanded {
            prop_assert_eq!(&expand(url), &expanded);
        }
    }
}

#[test]
fn test_unresolvable_variants_are_pruned() {
    let web = FakeWeb::new()
        .host("example.com", &["192.0.2.10"])
        .page("http://example.com/", 200, HOME_PAGE)
        .page("https://example.com/", 200, HOME_PAGE);

    let run = run_default_pipeline(&web, "https://example.com/");

    let dns = run.results.dns_resolution().unwrap();
    assert_eq!(dns.len(), 4);
    assert!(!dns["https://www.example.com/"].resolvable);
    assert!(dns["https://example.com/"].resolvable_ipv4);
    assert_eq!(run.urls.snapshot(), vec!["https://example.com/".to_string()]);
}

#[test]
fn test_redirects_collapse_onto_their_target() {
    let mut web = FakeWeb::new().host("example.com", &["192.0.2.10"]).host(
        "www.example.com",
        &["192.0.2.10"],
    );
    for url in [
        "http://example.com/",
        "https://example.com/",
        "http://www.example.com/",
        "https://www.example.com/",
    ] {
        web = web.redirect(url, 302, "https://www2.example.com/");
    }
    let web = web.page("https://www2.example.com/", 200, HOME_PAGE);

    let run = run_default_pipeline(&web, "http://example.com/");

    assert_eq!(
        run.results.url_canonicalization().unwrap(),
        &vec!["https://www2.example.com/".to_string()]
    );
    let reachability = run.results.url_reachability().unwrap();
    let record = &reachability["http://example.com/"];
    assert_eq!(record.redirect_history.len(), 1);
    assert_eq!(record.redirect_history[0].status, 302);
    assert!(record.exception.is_none());
}

#[test]
fn test_redirect_to_blocked_host_empties_the_set() {
    let web = FakeWeb::new()
        .host("example.com", &["192.0.2.10"])
        .redirect("http://example.com/", 301, "https://sedo.com/search?q=example")
        .page("https://sedo.com/search?q=example", 200, "<html></html>");

    let run = run_default_pipeline(&web, "http://example.com/");

    assert!(run.urls.is_empty());
    let record = &run.results.url_reachability().unwrap()["http://example.com/"];
    assert!(record.exception.is_some());
}

#[test]
fn test_not_found_page_is_kept() {
    let web = FakeWeb::new().site("example.com", "192.0.2.10", HOME_PAGE);
    let web = web
        .page("https://example.com/", 404, HOME_PAGE)
        .page("http://example.com/", 404, HOME_PAGE)
        .page("https://www.example.com/", 404, HOME_PAGE)
        .page("http://www.example.com/", 404, HOME_PAGE);

    let run = run_default_pipeline(&web, "https://example.com/");

    assert_eq!(run.urls.snapshot(), vec!["https://example.com/".to_string()]);
    let record = &run.results.url_reachability().unwrap()["https://example.com/"];
    assert_eq!(record.status, Some(404));
    assert!(record.exception.is_none());
}

#[test]
fn test_duplicates_leave_the_shortest_plain_http_url() {
    let web = FakeWeb::new()
        .host("example.com", &["192.0.2.10"])
        .host("www.example.com", &["192.0.2.10"])
        .page("http://example.com/", 200, HOME_PAGE)
        .page("http://www.example.com/", 200, HOME_PAGE);

    let run = run_default_pipeline(&web, "http://www.example.com/");

    assert_eq!(run.urls.snapshot(), vec!["http://example.com/".to_string()]);
    let pairs = run.results.duplicate_content().unwrap();
    assert_eq!(
        pairs["http://example.com/ http://www.example.com/"].similarity,
        Some(1.0)
    );
}

#[test]
fn test_distinct_pages_all_survive() {
    let web = FakeWeb::new()
        .host("example.com", &["192.0.2.10"])
        .host("www.example.com", &["192.0.2.10"])
        .page("https://example.com/", 200, HOME_PAGE)
        .page(
            "https://www.example.com/",
            200,
            "<html><body><table><tr><td>Parkplatz</td></tr></table></body></html>",
        );

    let run = run_default_pipeline(&web, "https://example.com/");

    assert_eq!(
        sorted(run.urls.snapshot()),
        vec![
            "https://example.com/".to_string(),
            "https://www.example.com/".to_string()
        ]
    );
}

#[test]
fn test_empty_working_set_is_a_valid_outcome() {
    let web = FakeWeb::new();

    let run = run_default_pipeline(&web, "https://nowhere.example/");

    assert!(run.urls.is_empty());
    assert!(run.results.contains(CheckName::DnsResolution));
    assert!(run.results.contains(CheckName::UrlCanonicalization));
    let skipped: Vec<CheckName> = run.skipped.iter().map(|s| s.name).collect();
    assert!(skipped.contains(&CheckName::DuplicateContent));
    assert!(skipped.contains(&CheckName::Generator));
}

#[test]
fn test_feed_interval_is_averaged_over_entries() {
    let web = FakeWeb::new()
        .host("example.com", &["192.0.2.10"])
        .page("https://example.com/", 200, HOME_PAGE)
        .page("https://example.com/feed/", 200, FEED);

    let run = run_default_pipeline(&web, "https://example.com/");

    let feeds = run.results.load_feeds().unwrap();
    let feed = &feeds["https://example.com/feed/"];
    assert_eq!(feed.num_entries, Some(2));
    assert_eq!(feed.average_interval, Some(340359));
}

#[test]
fn test_default_pipeline_is_ordered_consistently() {
    let pipeline = default_pipeline();
    assert!(pipeline.validate_order().is_ok());
    assert_eq!(pipeline.check_count(), 17);
    assert!(RatingEngine::default().validate_against(&pipeline).is_ok());
}

#[test]
fn test_dependency_before_producer_is_rejected() {
    let pipeline = PipelineBuilder::new()
        .check(Hyperlinks)
        .check(PageContent)
        .build();
    let err = pipeline.validate_order().unwrap_err();
    assert!(matches!(err, PipelineError::Misconfigured(_)));
}

#[test]
fn test_expander_after_pruner_is_rejected() {
    let pipeline = PipelineBuilder::new()
        .check(DnsResolution)
        .check(HttpAndHttps)
        .build();
    assert!(pipeline.validate_order().is_err());
}
