// Test utility module for siterate integration tests
#![allow(dead_code)]

use indoc::indoc;
use siterate::checks::default_pipeline;
use siterate::config::{RetryConfig, SiteRateConfig};
use siterate::pipeline::PipelineRun;
use siterate::testkit::FakeWeb;

pub const HOME_PAGE: &str = indoc! {r#"
    <html>
      <head>
        <title>Ortsverband Beispielstadt</title>
        <link rel="alternate" type="application/rss+xml" href="/feed/">
      </head>
      <body>
        <div class="nav"><a href="/kontakt/">Kontakt</a></div>
        <div class="content"><p>Willkommen</p></div>
        <a href="https://www.facebook.com/beispiel">Facebook</a>
      </body>
    </html>
"#};

pub const FEED: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <rss version="2.0"><channel>
      <title>Neuigkeiten</title>
      <item><title>Zweiter</title><pubDate>Tue, 10 Jan 2017 07:05:18 +0000</pubDate></item>
      <item><title>Erster</title><pubDate>Fri, 06 Jan 2017 08:32:39 +0000</pubDate></item>
    </channel></rss>
"#};

/// Configuration without retry delays, so browser failures stay fast.
pub fn test_config() -> SiteRateConfig {
    SiteRateConfig {
        browser_retry: RetryConfig::immediate(1),
        ..Default::default()
    }
}

pub fn run_default_pipeline(web: &FakeWeb, url: &str) -> PipelineRun {
    default_pipeline()
        .run(url, &test_config(), &web.collaborators())
        .expect("pipeline run")
}

pub fn sorted(urls: Vec<String>) -> Vec<String> {
    let mut urls = urls;
    urls.sort();
    urls
}
