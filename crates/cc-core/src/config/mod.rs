//! # Configuration DTOs
//!
//! Selector lists, the registration marker and adapter settings. Every field
//! has a built-in default matching the host chat application's markup, so an
//! empty TOML document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::selectors;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// Boolean attribute recording that a container already has an affordance.
    pub marker_attribute: String,
    pub selectors: SelectorConfig,
    pub fetch: FetchConfig,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            marker_attribute: selectors::COPY_BUTTON_MARK.to_string(),
            selectors: SelectorConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl CopyConfig {
    /// Maps a parsed TOML document onto the config; missing keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns error if a present key has the wrong type.
    ///
    /// ```
    /// let value: toml::Value = toml::from_str(r#"marker_attribute = "data-x""#).unwrap();
    /// let config = cc_core::CopyConfig::from_toml(&value).unwrap();
    /// assert_eq!(config.marker_attribute, "data-x");
    /// assert!(!config.selectors.action_containers.is_empty());
    /// ```
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(toml_value.clone().try_into()?)
    }

    /// Container selectors scoped to containers without the marker.
    pub fn eligible_container_selectors(&self) -> Vec<String> {
        selectors::unmarked(&self.selectors.action_containers, &self.marker_attribute)
    }
}

/// CSS selector lists for the host markup. Each list defaults to the
/// built-in selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Message action bars that receive the copy affordance.
    pub action_containers: Vec<String>,
    /// Message content nodes, most specific first.
    pub message_text: Vec<String>,
    /// Ancestor chain used to find the message root, highest priority first.
    pub message_roots: Vec<String>,
    /// Host UI chrome stripped from copied HTML.
    pub chrome: Vec<String>,
    /// Anchors linking to full-size image files.
    pub image_anchors: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            action_containers: to_strings(selectors::ACTION_CONTAINER_SELECTORS),
            message_text: to_strings(selectors::MESSAGE_TEXT_SELECTORS),
            message_roots: to_strings(selectors::MESSAGE_ROOT_SELECTORS),
            chrome: to_strings(selectors::CHROME_SELECTORS),
            image_anchors: to_strings(selectors::IMAGE_ANCHOR_SELECTORS),
        }
    }
}

/// Settings for adapters that fetch image files outside a browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base used to resolve relative image links.
    pub base_url: Option<String>,
    /// Sent as the `Cookie` header, standing in for browser credentials.
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
