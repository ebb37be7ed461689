//! Minimal CSS selector engine for the in-memory document.
//!
//! Supports type, universal, id, class and attribute selectors
//! (`=`, `~=`, `|=`, `^=`, `$=`, `*=`), `:not(<compound>)`, selector lists and
//! the descendant and child combinators. That covers every selector the host
//! markup is addressed with.

use cc_core::ports::DomError;

/// Read access to an element, as the matcher needs it.
pub trait ElementView: Sized {
    fn local_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn parent_element(&self) -> Option<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<ComplexSelector>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    /// Rightmost compound first.
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` to `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeSelector>,
    negations: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeSelector {
    name: String,
    test: Option<(AttributeOp, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeOp {
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let invalid = || DomError::InvalidSelector(input.to_string());
        let mut parser = Parser {
            chars: input.chars().collect(),
            pos: 0,
        };

        let mut list = Vec::new();
        loop {
            parser.skip_whitespace();
            list.push(parser.complex().ok_or_else(invalid)?);
            parser.skip_whitespace();
            match parser.peek() {
                None => break,
                Some(',') => parser.pos += 1,
                Some(_) => return Err(invalid()),
            }
        }

        Ok(SelectorList(list))
    }

    pub fn matches<E: ElementView + Clone>(&self, element: &E) -> bool {
        self.0.iter().any(|complex| complex.matches(element))
    }
}

impl ComplexSelector {
    fn matches<E: ElementView + Clone>(&self, element: &E) -> bool {
        self.matches_from(0, element)
    }

    fn matches_from<E: ElementView + Clone>(&self, index: usize, element: &E) -> bool {
        if !self.compounds[index].matches(element) {
            return false;
        }
        if index + 1 == self.compounds.len() {
            return true;
        }

        match self.combinators[index] {
            Combinator::Child => element
                .parent_element()
                .is_some_and(|parent| self.matches_from(index + 1, &parent)),
            Combinator::Descendant => {
                let mut ancestor = element.parent_element();
                while let Some(current) = ancestor {
                    if self.matches_from(index + 1, &current) {
                        return true;
                    }
                    ancestor = current.parent_element();
                }
                false
            }
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.ids.is_empty()
            && self.classes.is_empty()
            && self.attributes.is_empty()
            && self.negations.is_empty()
    }

    fn matches<E: ElementView>(&self, element: &E) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && !tag.eq_ignore_ascii_case(element.local_name()) {
                return false;
            }
        }

        if !self.ids.iter().all(|id| element.attribute("id") == Some(id.as_str())) {
            return false;
        }

        if !self.classes.is_empty() {
            let class_attr = element.attribute("class").unwrap_or_default();
            let has_all = self
                .classes
                .iter()
                .all(|class| class_attr.split_ascii_whitespace().any(|c| c == class));
            if !has_all {
                return false;
            }
        }

        if !self.attributes.iter().all(|attr| attr.matches(element)) {
            return false;
        }

        self.negations.iter().all(|negated| !negated.matches(element))
    }
}

impl AttributeSelector {
    fn matches<E: ElementView>(&self, element: &E) -> bool {
        let Some(actual) = element.attribute(&self.name) else {
            return false;
        };
        let Some((op, expected)) = &self.test else {
            return true;
        };
        let expected = expected.as_str();

        match op {
            AttributeOp::Equals => actual == expected,
            AttributeOp::Includes => actual.split_ascii_whitespace().any(|w| w == expected),
            AttributeOp::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttributeOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttributeOp::Substring => !expected.is_empty() && actual.contains(expected),
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn complex(&mut self) -> Option<ComplexSelector> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') | Some(')') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return None,
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        compounds.reverse();
        combinators.reverse();
        Some(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Option<Compound> {
        let mut compound = Compound::default();

        if self.peek() == Some('*') {
            self.pos += 1;
            compound.tag = Some("*".into());
        } else if self.peek().is_some_and(is_ident_start) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('#') => {
                    self.pos += 1;
                    compound.ids.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attributes.push(self.attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    let name = self.ident()?;
                    if !name.eq_ignore_ascii_case("not") || self.peek() != Some('(') {
                        return None;
                    }
                    self.pos += 1;
                    self.skip_whitespace();
                    let negated = self.compound()?;
                    self.skip_whitespace();
                    if self.peek() != Some(')') {
                        return None;
                    }
                    self.pos += 1;
                    compound.negations.push(negated);
                }
                _ => break,
            }
        }

        (!compound.is_empty()).then_some(compound)
    }

    fn attribute(&mut self) -> Option<AttributeSelector> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let op = match self.peek()? {
            ']' => {
                self.pos += 1;
                return Some(AttributeSelector { name, test: None });
            }
            '=' => {
                self.pos += 1;
                AttributeOp::Equals
            }
            c => {
                let op = match c {
                    '~' => AttributeOp::Includes,
                    '|' => AttributeOp::DashMatch,
                    '^' => AttributeOp::Prefix,
                    '$' => AttributeOp::Suffix,
                    '*' => AttributeOp::Substring,
                    _ => return None,
                };
                self.pos += 1;
                if self.peek() != Some('=') {
                    return None;
                }
                self.pos += 1;
                op
            }
        };

        self.skip_whitespace();
        let value = match self.peek()? {
            quote @ ('"' | '\'') => {
                self.pos += 1;
                let start = self.pos;
                while self.peek()? != quote {
                    self.pos += 1;
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                value
            }
            _ => self.ident()?,
        };
        self.skip_whitespace();
        if self.peek() != Some(']') {
            return None;
        }
        self.pos += 1;

        Some(AttributeSelector {
            name,
            test: Some((op, value)),
        })
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.chars[start..self.pos].iter().collect())
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Fake<'a> {
        nodes: &'a [(&'a str, &'a [(&'a str, &'a str)], Option<usize>)],
        index: usize,
    }

    impl<'a> ElementView for Fake<'a> {
        fn local_name(&self) -> &str {
            self.nodes[self.index].0
        }

        fn attribute(&self, name: &str) -> Option<&str> {
            self.nodes[self.index]
                .1
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
        }

        fn parent_element(&self) -> Option<Self> {
            self.nodes[self.index].2.map(|index| Fake {
                nodes: self.nodes,
                index,
            })
        }
    }

    const TREE: &[(&str, &[(&str, &str)], Option<usize>)] = &[
        ("div", &[("data-qa", "message_container")], None),
        ("div", &[("class", "c-message_actions  extra")], Some(0)),
        ("button", &[("data-chat-copy-button", "true"), ("id", "b")], Some(1)),
        ("a", &[("data-qa", "message_file_image_thumbnail"), ("href", "https://x/a.png")], Some(0)),
    ];

    fn node(index: usize) -> Fake<'static> {
        Fake { nodes: TREE, index }
    }

    fn matches(selector: &str, index: usize) -> bool {
        SelectorList::parse(selector).unwrap().matches(&node(index))
    }

    #[test]
    fn matches_quoted_and_unquoted_attribute_values() {
        assert!(matches(r#"[data-qa="message_container"]"#, 0));
        assert!(matches("[data-qa=message_file_image_thumbnail]", 3));
        assert!(matches("[href^='https://']", 3));
        assert!(matches("[href$=\".png\"]", 3));
        assert!(!matches(r#"[data-qa="message"]"#, 0));
    }

    #[test]
    fn matches_classes_tags_and_ids() {
        assert!(matches(".c-message_actions", 1));
        assert!(matches("div.c-message_actions.extra", 1));
        assert!(!matches("span.c-message_actions", 1));
        assert!(matches("button#b", 2));
        assert!(matches("*", 2));
    }

    #[test]
    fn negation_excludes_marked_elements() {
        assert!(!matches("button:not([data-chat-copy-button])", 2));
        assert!(matches(".c-message_actions:not([data-chat-copy-button])", 1));
    }

    #[test]
    fn combinators_walk_ancestors() {
        assert!(matches(r#"[data-qa="message_container"] button"#, 2));
        assert!(matches(".c-message_actions > button", 2));
        assert!(!matches(r#"[data-qa="message_container"] > button"#, 2));
    }

    #[test]
    fn selector_lists_match_any_member() {
        assert!(matches("span, a", 3));
        assert!(!matches("span, p", 3));
    }

    #[test]
    fn rejects_malformed_selectors() {
        for input in ["", "[data-qa", ".", "div:hover", "a,", "[x~y]", ":not(.a"] {
            assert!(
                matches!(SelectorList::parse(input), Err(DomError::InvalidSelector(_))),
                "{input} should be rejected"
            );
        }
    }
}
