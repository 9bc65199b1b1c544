use crate::core::rules::dedup_preserving_order;
use crate::utils::error::{Result, WordlistError};
use crate::utils::validation::validate_url;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub min_length: usize,
    pub max_length: usize,
    pub lowercase: bool,
    pub include_meta: bool,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 32,
            lowercase: false,
            include_meta: true,
            timeout_secs: 15,
            user_agent: concat!("wlaio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\p{L}\p{N}_'-]+").expect("token pattern is valid"))
}

/// Split text into candidate words filtered by `options`, in first-seen order.
pub fn tokenize(text: &str, options: &ScrapeOptions) -> Vec<String> {
    let tokens = token_pattern()
        .find_iter(text)
        .map(|m| m.as_str().trim_matches(|c| c == '\'' || c == '-'))
        .filter(|t| {
            let len = t.chars().count();
            len >= options.min_length && len <= options.max_length
        })
        .map(|t| {
            if options.lowercase {
                t.to_lowercase()
            } else {
                t.to_string()
            }
        })
        .collect();
    dedup_preserving_order(tokens)
}

/// Visible text of an HTML document, plus meta descriptions/keywords and
/// image alt text when `include_meta` is set.
pub fn extract_text(html: &str, include_meta: bool) -> Result<String> {
    let document = Html::parse_document(html);
    let mut chunks: Vec<String> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| SKIPPED_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            chunks.push(text.to_string());
        }
    }

    if include_meta {
        let selector = Selector::parse(
            r#"meta[name="description"], meta[name="keywords"], meta[property="og:title"], img[alt]"#,
        )
        .map_err(|e| WordlistError::ProcessingError {
            message: format!("Invalid selector: {}", e),
        })?;
        for element in document.select(&selector) {
            let value = element.value();
            if let Some(content) = value.attr("content").or_else(|| value.attr("alt")) {
                chunks.push(content.to_string());
            }
        }
    }

    Ok(chunks.join(" "))
}

pub struct Scraper {
    client: Client,
    options: ScrapeOptions,
}

impl Scraper {
    pub fn new(options: ScrapeOptions) -> Result<Self> {
        if options.min_length == 0 || options.min_length > options.max_length {
            return Err(WordlistError::validation(format!(
                "Invalid token length range {}..={}",
                options.min_length, options.max_length
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .user_agent(options.user_agent.clone())
            .build()?;
        Ok(Self { client, options })
    }

    /// Fetch a single page and tokenize it. Links are not followed.
    pub async fn scrape(&self, url: &str) -> Result<Vec<String>> {
        let url = validate_url("scrape.url", url)?;
        tracing::info!("🌐 Fetching {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Scrape response status: {}", status);
        if !status.is_success() {
            return Err(WordlistError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("html"))
            .unwrap_or(true);
        let body = response.text().await?;

        let text = if is_html {
            extract_text(&body, self.options.include_meta)?
        } else {
            body
        };
        let words = tokenize(&text, &self.options);
        tracing::info!("Extracted {} words from {}", words.len(), url);
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_tokenize_filters_by_length_and_dedups() {
        let options = ScrapeOptions {
            min_length: 3,
            max_length: 8,
            ..ScrapeOptions::default()
        };
        let words = tokenize("The cat's toy -- a 'quoted' superlongword, toy! 2024", &options);
        assert_eq!(words, vec!["The", "cat's", "toy", "quoted", "2024"]);
    }

    #[test]
    fn test_tokenize_lowercase_merges_case_variants() {
        let options = ScrapeOptions {
            lowercase: true,
            ..ScrapeOptions::default()
        };
        assert_eq!(tokenize("Hello hello HELLO", &options), vec!["hello"]);
    }

    #[test]
    fn test_extract_text_skips_scripts_and_reads_meta() {
        let html = r#"<html><head><title>Acme Corp</title>
            <meta name="keywords" content="rockets anvils">
            <style>.x { color: red }</style></head>
            <body><p>Welcome to Acme</p><script>var secret = 1;</script>
            <img src="a.png" alt="roadrunner"></body></html>"#;

        let text = extract_text(html, true).unwrap();
        assert!(text.contains("Acme Corp"));
        assert!(text.contains("Welcome"));
        assert!(text.contains("anvils"));
        assert!(text.contains("roadrunner"));
        assert!(!text.contains("secret"));
        assert!(!text.contains("color"));

        let plain = extract_text(html, false).unwrap();
        assert!(!plain.contains("roadrunner"));
    }

    #[tokio::test]
    async fn test_scrape_single_page() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/about");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body("<html><body><h1>Globex Corporation</h1><p>Founded 1989 in Springfield</p></body></html>");
        });

        let scraper = Scraper::new(ScrapeOptions::default()).unwrap();
        let words = scraper.scrape(&server.url("/about")).await.unwrap();

        page.assert();
        assert_eq!(
            words,
            vec!["Globex", "Corporation", "Founded", "1989", "Springfield"]
        );
    }

    #[tokio::test]
    async fn test_scrape_reports_http_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let scraper = Scraper::new(ScrapeOptions::default()).unwrap();
        let err = scraper.scrape(&server.url("/missing")).await.unwrap_err();
        assert!(matches!(err, WordlistError::HttpStatusError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_scrape_rejects_non_http_urls() {
        let scraper = Scraper::new(ScrapeOptions::default()).unwrap();
        assert!(scraper.scrape("file:///etc/passwd").await.is_err());
    }
}
