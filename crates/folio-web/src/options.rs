#![forbid(unsafe_code)]

//! JS options object → [`SiteConfig`].
//!
//! The host passes an optional plain object to the constructor; the binding
//! stringifies it and hands the JSON here. Parsing never fails the page: a
//! malformed object falls back to the defaults and every problem is returned
//! for logging.

use folio_core::{ConfigError, SiteConfig};

/// Parse host options, returning the effective config and any diagnostics.
#[must_use]
pub fn parse_options(json: Option<&str>) -> (SiteConfig, Vec<ConfigError>) {
    let json = json.map(str::trim).filter(|s| !s.is_empty() && *s != "null");
    let Some(json) = json else {
        return (SiteConfig::default(), Vec::new());
    };
    match SiteConfig::from_json(json) {
        Ok(config) => {
            let errors = config.validate().err().unwrap_or_default();
            (config, errors)
        }
        Err(err) => (SiteConfig::default(), vec![err]),
    }
}
