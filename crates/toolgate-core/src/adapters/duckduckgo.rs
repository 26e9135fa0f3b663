use std::sync::Arc;
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};

use super::{fetch, timeout_ms};
use crate::domain::SearchHit;
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize;
use crate::provider::{Provider, ProviderFailure, ProviderFuture};
use crate::request::{SearchKind, SearchQuery};
use crate::ProviderId;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Web and news search scraped from DuckDuckGo's HTML frontend.
#[derive(Clone)]
pub struct DuckDuckGoAdapter {
    http_client: Arc<dyn HttpClient>,
    user_agent: String,
    timeout: Duration,
}

impl DuckDuckGoAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client,
            user_agent: user_agent.into(),
            timeout,
        }
    }

    fn url(query: &SearchQuery) -> String {
        match query.kind() {
            SearchKind::Web => format!("{SEARCH_URL}?q={}", urlencoding::encode(query.query())),
            SearchKind::News => format!(
                "{SEARCH_URL}?q={}&ia=news",
                urlencoding::encode(&format!("{} news", query.query()))
            ),
        }
    }
}

impl Provider<SearchQuery, Vec<SearchHit>> for DuckDuckGoAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Duckduckgo
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    // An empty page is still a valid answer, so this never reports `Ok(None)`.
    fn fetch<'a>(&'a self, input: &'a SearchQuery) -> ProviderFuture<'a, Vec<SearchHit>> {
        Box::pin(async move {
            let request = HttpRequest::get(Self::url(input))
                .with_header("user-agent", &self.user_agent)
                .with_timeout_ms(timeout_ms(self.timeout));
            let response = fetch(self.http_client.as_ref(), ProviderId::Duckduckgo, request).await?;
            parse_results(&response.body, input.limit()).map(Some)
        })
    }
}

fn selector(css: &str) -> Result<Selector, ProviderFailure> {
    Selector::parse(css)
        .map_err(|error| ProviderFailure::unparseable(format!("bad selector '{css}': {error}")))
}

fn text_of(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_owned())
        .unwrap_or_default()
}

fn parse_results(body: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderFailure> {
    let result = selector(".result")?;
    let title = selector(".result__title")?;
    let snippet = selector(".result__snippet")?;
    let url = selector(".result__url")?;

    let document = Html::parse_document(body);
    let hits = document
        .select(&result)
        .map(|element| SearchHit {
            title: text_of(element, &title),
            snippet: text_of(element, &snippet),
            url: text_of(element, &url),
        })
        .collect();
    Ok(normalize::search_hits(hits, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::StaticHttpClient;
    use crate::provider::{invoke, ProviderOutcome};

    const PAGE: &str = r#"<html><body>
        <div class="result"><h2 class="result__title"><a>Rust Programming Language</a></h2>
          <a class="result__snippet">A language empowering everyone.</a>
          <a class="result__url"> www.rust-lang.org </a></div>
        <div class="result"><h2 class="result__title"></h2><a class="result__url">no-title.example</a></div>
        <div class="result"><h2 class="result__title">The Rust Book</h2>
          <a class="result__url">doc.rust-lang.org/book</a></div>
        <div class="result"><h2 class="result__title">Third</h2><a class="result__url">third.example</a></div>
        </body></html>"#;

    #[test]
    fn parses_and_caps_results() {
        let hits = parse_results(PAGE, 2).expect("parses");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Rust Programming Language");
        assert_eq!(hits[0].url, "www.rust-lang.org");
        assert_eq!(hits[0].snippet, "A language empowering everyone.");
        assert_eq!(hits[1].title, "The Rust Book");
        assert_eq!(hits[1].snippet, "");
    }

    #[tokio::test]
    async fn news_queries_target_the_news_tab() {
        let client = Arc::new(StaticHttpClient::new().json("duckduckgo.com", "<html></html>"));
        let adapter = DuckDuckGoAdapter::new(client.clone(), "Mozilla/5.0", Duration::from_secs(1));
        let query = SearchQuery::parse("rust 2024", None, SearchKind::News).expect("valid");

        let outcome = invoke::<SearchQuery, Vec<SearchHit>, _>(&adapter, &query).await;
        assert!(matches!(outcome, ProviderOutcome::Success { ref data, .. } if data.is_empty()));

        let requests = client.recorded_requests();
        assert!(requests[0].url.ends_with("?q=rust%202024%20news&ia=news"));
        assert_eq!(requests[0].headers.get("user-agent").map(String::as_str), Some("Mozilla/5.0"));
    }
}
