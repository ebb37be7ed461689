//! Declarative element trees for populating an in-memory document.

use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Element description, materialized by [`super::InMemoryDocument::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct El {
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Child {
    Element(El),
    Text(String),
}

pub fn el(tag: &str) -> El {
    El {
        tag: tag.to_ascii_lowercase(),
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

impl El {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        self.attrs.retain(|(k, _)| *k != name);
        self.attrs.push((name, value.to_string()));
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn qa(self, value: &str) -> Self {
        self.attr("data-qa", value)
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(Child::Text(text.to_string()));
        self
    }

    pub fn child(mut self, child: El) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children
            .extend(children.into_iter().map(Child::Element));
        self
    }
}

/// JSON form of an element tree.
///
/// ```json
/// {"tag": "div", "attrs": {"data-qa": "message_container"},
///  "children": [{"text": "hello"}]}
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FixtureNode {
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<FixtureNode>,
    },
}

impl FixtureNode {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("malformed document fixture")
    }

    /// Converts the fixture into an element tree; a bare text root is wrapped
    /// in a `div`.
    pub fn into_element(self) -> El {
        match self {
            FixtureNode::Text { text } => el("div").text(&text),
            FixtureNode::Element {
                tag,
                attrs,
                children,
            } => {
                let mut element = attrs
                    .iter()
                    .fold(el(&tag), |element, (name, value)| element.attr(name, value));
                for child in children {
                    element.children.push(match child {
                        FixtureNode::Text { text } => Child::Text(text),
                        node => Child::Element(node.into_element()),
                    });
                }
                element
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_attribute_replaces_earlier() {
        let element = el("DIV").class("a").class("b");
        assert_eq!(element.tag, "div");
        assert_eq!(element.attrs, vec![("class".to_string(), "b".to_string())]);
    }

    #[test]
    fn fixture_json_maps_to_elements() {
        let fixture = FixtureNode::from_json(
            r#"{"tag":"div","attrs":{"role":"listitem"},
                "children":[{"text":"hi"},{"tag":"span"}]}"#,
        )
        .unwrap();

        let element = fixture.into_element();
        assert_eq!(element.tag, "div");
        assert_eq!(
            element.attrs,
            vec![("role".to_string(), "listitem".to_string())]
        );
        assert_eq!(
            element.children,
            vec![Child::Text("hi".into()), Child::Element(el("span"))]
        );
    }

    #[test]
    fn malformed_fixture_is_an_error() {
        let err = FixtureNode::from_json(r#"{"attrs":{}}"#).unwrap_err();
        assert!(err.to_string().contains("fixture"));
    }
}
