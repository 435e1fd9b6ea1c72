//! Process-wide HTTP agent
//!
//! One agent per process: pooled connections and a default user agent
//! identifying the analyser. Individual calls override the timeout to
//! their own budget.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use ureq::Agent;

use rampart_core::VERSION;

lazy_static::lazy_static! {
    static ref AGENT: Agent = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(10)))
        .user_agent(format!("rampart/{VERSION} (dependency-risk-analyser)"))
        .build()
        .into();
}

pub fn http_agent() -> &'static Agent {
    &AGENT
}

/// GET a JSON document, swallowing every failure.
pub(crate) fn get_json<T: DeserializeOwned>(
    agent: &Agent,
    url: &str,
    timeout_secs: u64,
) -> Option<T> {
    let result = agent
        .get(url)
        .config()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build()
        .call();
    match result {
        Ok(mut response) => response.body_mut().read_json().ok(),
        Err(err) => {
            debug!(url, %err, "registry request failed");
            None
        }
    }
}

/// GET a plain-text document, swallowing every failure.
pub(crate) fn get_text(agent: &Agent, url: &str, timeout_secs: u64) -> Option<String> {
    let result = agent
        .get(url)
        .config()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build()
        .call();
    match result {
        Ok(mut response) => response.body_mut().read_to_string().ok(),
        Err(err) => {
            debug!(url, %err, "registry request failed");
            None
        }
    }
}
