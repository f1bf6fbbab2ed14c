use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use ideaspace_core::{ExpansionError, ExpansionService, PrewarmSink};

use crate::config::ServiceConfig;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct SentenceBody<'a> {
    sentence: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExpandResponse {
    nodes: Vec<String>,
}

/// Blocking HTTP implementation of the expansion contract.
#[derive(Debug, Clone)]
pub struct HttpExpansionService {
    client: Client,
    expand_url: String,
    embed_url: String,
}

impl HttpExpansionService {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            expand_url: config.expand_url(),
            embed_url: config.embed_url(),
        })
    }

    #[must_use]
    pub fn expand_url(&self) -> &str {
        &self.expand_url
    }

    #[must_use]
    pub fn embed_url(&self) -> &str {
        &self.embed_url
    }

    fn post_sentence(&self, url: &str, sentence: &str) -> std::result::Result<String, ExpansionError> {
        let response = self
            .client
            .post(url)
            .json(&SentenceBody { sentence })
            .send()
            .map_err(|error| transport_error(url, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExpansionError::unavailable(format!(
                "{url} answered HTTP {status}"
            )));
        }
        response.text().map_err(|error| transport_error(url, &error))
    }
}

impl ExpansionService for HttpExpansionService {
    fn expand(&self, sentence: &str) -> std::result::Result<Vec<String>, ExpansionError> {
        let _span = debug_span!("client.expand", url = %self.expand_url).entered();
        let body = self.post_sentence(&self.expand_url, sentence)?;
        let nodes = parse_nodes(&body)?;
        debug!(target: "ideaspace.client", nodes = nodes.len(), "expansion response parsed");
        Ok(nodes)
    }
}

impl PrewarmSink for HttpExpansionService {
    fn prewarm(&self, sentences: &[String]) -> std::result::Result<(), ExpansionError> {
        let _span = debug_span!("client.prewarm", url = %self.embed_url, count = sentences.len())
            .entered();
        for sentence in sentences {
            self.post_sentence(&self.embed_url, sentence)?;
        }
        Ok(())
    }
}

/// Extract the `nodes` list from an expansion response body.
pub fn parse_nodes(body: &str) -> std::result::Result<Vec<String>, ExpansionError> {
    if body.trim().is_empty() {
        return Err(ExpansionError::malformed("empty response body"));
    }
    serde_json::from_str::<ExpandResponse>(body)
        .map(|response| response.nodes)
        .map_err(|error| ExpansionError::malformed(error.to_string()))
}

fn transport_error(url: &str, error: &reqwest::Error) -> ExpansionError {
    let detail = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("could not connect: {error}")
    } else {
        error.to_string()
    };
    ExpansionError::unavailable(format!("{url}: {detail}"))
}
