use anyhow::{Context, Result};
use archivist_common::{OutputFormat, SearchResult};
use archivist_config::{EngineDetails, EngineSpec};
use archivist_engine::{NoRequest, SearchEngine, SearchRequest, TubeArchivist, TubeArchivistConfig};
use archivist_http::{HttpClient, RequestOpts, header_map};
use std::fmt::Write as _;
use std::time::Duration;

/// One configured engine plus the HTTP knobs used to reach it.
pub struct Instance {
    engine: Box<dyn SearchEngine>,
    http: HttpClient,
    timeout: Option<Duration>,
    retries: Option<usize>,
}

pub fn build_from_spec(spec: &EngineSpec) -> Result<Instance> {
    let engine: Box<dyn SearchEngine> = match &spec.details {
        EngineDetails::TubeArchivist { config } => Box::new(TubeArchivist::with_name(
            spec.name.clone(),
            TubeArchivistConfig::new(config.base_url.clone(), config.token.clone()),
        )),
    };
    let http = HttpClient::new().context("failed to build http client")?;
    Ok(Instance {
        engine,
        http,
        timeout: spec.timeout_secs.map(Duration::from_secs),
        retries: spec.retries,
    })
}

impl Instance {
    pub fn name(&self) -> &str {
        self.engine.name()
    }

    /// request -> fetch -> response for a single query.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let req = match self.engine.request(query, SearchRequest::default()) {
            Ok(req) => req,
            Err(NoRequest) => {
                tracing::info!(engine = %self.name(), "search.skipped");
                return Ok(Vec::new());
            }
        };

        let headers = header_map(req.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        let started = std::time::Instant::now();
        let body = self
            .http
            .get_bytes(
                &req.url,
                RequestOpts {
                    timeout: self.timeout,
                    retries: self.retries,
                    headers: Some(headers),
                },
            )
            .await
            .with_context(|| format!("{} request failed", self.name()))?;

        let results = self
            .engine
            .response(&body)
            .with_context(|| format!("{} returned an unusable response", self.name()))?;

        tracing::info!(
            engine = %self.name(),
            result_count = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search.done"
        );
        Ok(results)
    }
}

pub fn render(results: &[SearchResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for r in results {
                writeln!(out, "{}\n  {}", r.title, r.url)?;
                let mut facts = vec![format!("views: {}", r.views)];
                if let Some(length) = &r.length {
                    facts.push(format!("length: {length}"));
                }
                if let Some(date) = &r.published_date {
                    facts.push(format!("published: {}", date.format("%Y-%m-%d")));
                }
                if !r.metadata.is_empty() {
                    facts.push(r.metadata.clone());
                }
                writeln!(out, "  {}", facts.join(" · "))?;
                if !r.content.is_empty() {
                    writeln!(out, "  {}", r.content)?;
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivist_config::ArchivistConfigLoader;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn instance_for(base_url: &str) -> Instance {
        let cfg = ArchivistConfigLoader::new()
            .with_yaml_str(&format!(
                "engines:\n  - name: home\n    kind: tubearchivist\n    retries: 0\n    config:\n      base_url: \"{base_url}\"\n      token: \"abc\"\n"
            ))
            .load()
            .unwrap();
        build_from_spec(cfg.select_engine(None).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn empty_query_skips_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let instance = instance_for(&server.uri());
        assert_eq!(instance.name(), "home");
        assert!(instance.search("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn runs_the_full_pipeline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(header("Authorization", "Token abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": { "channel_results": [], "video_results": [{
                    "title": "T",
                    "description": "",
                    "media_url": "/media/a.mp4",
                    "channel": { "channel_name": "C" },
                    "player": { "duration_str": "3:00" },
                    "stats": { "view_count": 2500 },
                    "published": "2022-01-02",
                    "vid_thumb_url": "/cache/a.jpg",
                    "tags": []
                }] }
            })))
            .mount(&server)
            .await;

        let results = instance_for(&server.uri()).search("t").await.unwrap();
        assert_eq!(results.len(), 1);

        let text = render(&results, OutputFormat::Text).unwrap();
        assert!(text.contains("views: 2.5K"));
        assert!(text.contains("published: 2022-01-02"));

        let json: serde_json::Value =
            serde_json::from_str(&render(&results, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json[0]["template"], "videos.html");
        assert_eq!(json[0]["metadata"], "C");
    }

    #[tokio::test]
    async fn malformed_bodies_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = instance_for(&server.uri()).search("t").await.unwrap_err();
        assert!(format!("{err:#}").contains("malformed response"));
    }
}
