//! NatSpec doc-comment parser: a line-by-line tag state machine.
//!
//! Understands `@title`, `@author`, `@notice`, `@dev`, `@param`, `@return`,
//! `@inheritdoc` and `@custom:<tag>`. Untagged text before the first tag is
//! the notice. Unknown or malformed tags are dropped together with their
//! continuation lines.

use crate::model::{Node, NodeKind, Param};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static RE_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:/\*\*+|///|\*+)?\s?").unwrap());

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([A-Za-z]+)(?::([A-Za-z0-9_-]*))?(?:\s+(.*))?$").unwrap()
});

/// Structured doc comment of one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NatSpec {
    pub title: Option<String>,
    pub author: Option<String>,
    /// `@notice`, or untagged leading text
    pub summary: Option<String>,
    /// `@dev`
    pub detail: Option<String>,
    /// `@param` descriptions by parameter name
    pub params: BTreeMap<String, String>,
    /// `@return` descriptions by return slot (parameter name or position)
    pub returns: BTreeMap<String, String>,
    /// `@custom:<tag>` text by tag
    pub custom: BTreeMap<String, String>,
    /// `@inheritdoc` target, unresolved
    pub inheritdoc: Option<String>,
}

impl NatSpec {
    /// Parse the doc comment attached to `node`.
    pub fn of(node: &Node<'_>) -> Self {
        let returns: &[Param<'_>] = match &node.kind {
            NodeKind::Function(f) => &f.return_parameters,
            _ => &[],
        };
        Self::parse(node.documentation(), returns)
    }

    /// Parse raw comment text. `return_params` are used to key `@return`
    /// entries by name where the text starts with the parameter name.
    pub fn parse(text: Option<&str>, return_params: &[Param<'_>]) -> Self {
        let Some(text) = text else {
            return NatSpec::default();
        };

        let mut state = ParserState::default();
        for line in text.lines() {
            state.process_line(strip_decoration(line));
        }
        state.finish(return_params)
    }

    pub fn is_empty(&self) -> bool {
        *self == NatSpec::default()
    }
}

/// Remove comment markers (`///`, `/**`, ` * `, `*/`) from one line.
fn strip_decoration(line: &str) -> &str {
    let line = line.trim_end();
    let line = line.strip_suffix("*/").unwrap_or(line).trim_end();
    match RE_DECORATION.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Where continuation lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Title,
    Author,
    Notice,
    Dev,
    Param(usize),
    Return(usize),
    Custom(usize),
    Inheritdoc,
    Ignored,
}

struct ParserState {
    title: Option<String>,
    author: Option<String>,
    notice: Option<String>,
    dev: Option<String>,
    params: Vec<(String, String)>,
    returns: Vec<String>,
    custom: Vec<(String, String)>,
    inheritdoc: Option<String>,
    current: Slot,
}

impl Default for ParserState {
    fn default() -> Self {
        ParserState {
            title: None,
            author: None,
            notice: None,
            dev: None,
            params: Vec::new(),
            returns: Vec::new(),
            custom: Vec::new(),
            inheritdoc: None,
            current: Slot::Notice,
        }
    }
}

impl ParserState {
    fn process_line(&mut self, line: &str) {
        let Some(caps) = RE_TAG.captures(line) else {
            if looks_like_tag(line) {
                self.current = Slot::Ignored;
            } else {
                self.append(line);
            }
            return;
        };
        let tag = &caps[1];
        let sub = caps.get(2).map(|m| m.as_str());
        let rest = caps.get(3).map_or("", |m| m.as_str()).trim();

        self.current = match (tag, sub) {
            ("title", None) => Slot::Title,
            ("author", None) => Slot::Author,
            ("notice", None) => Slot::Notice,
            ("dev", None) => Slot::Dev,
            ("param", None) => match split_word(rest) {
                Some((name, desc)) => {
                    self.params.push((name.to_string(), desc.to_string()));
                    self.current = Slot::Param(self.params.len() - 1);
                    return;
                }
                None => Slot::Ignored,
            },
            ("return", None) => {
                self.returns.push(rest.to_string());
                self.current = Slot::Return(self.returns.len() - 1);
                return;
            }
            ("inheritdoc", None) => {
                self.inheritdoc = split_word(rest).map(|(name, _)| name.to_string());
                Slot::Inheritdoc
            }
            ("custom", Some(name)) if !name.is_empty() => {
                self.custom.push((name.to_string(), rest.to_string()));
                self.current = Slot::Custom(self.custom.len() - 1);
                return;
            }
            _ => Slot::Ignored,
        };
        if self.current != Slot::Inheritdoc {
            self.append(rest);
        }
    }

    fn append(&mut self, line: &str) {
        match self.current {
            Slot::Title => push_line(&mut self.title, line),
            Slot::Author => push_line(&mut self.author, line),
            Slot::Notice => push_line(&mut self.notice, line),
            Slot::Dev => push_line(&mut self.dev, line),
            Slot::Param(i) => push_text(&mut self.params[i].1, line),
            Slot::Return(i) => push_text(&mut self.returns[i], line),
            Slot::Custom(i) => push_text(&mut self.custom[i].1, line),
            Slot::Inheritdoc | Slot::Ignored => {}
        }
    }

    fn finish(self, return_params: &[Param<'_>]) -> NatSpec {
        let mut params = BTreeMap::new();
        for (name, desc) in self.params {
            params.entry(name).or_insert_with(|| desc.trim().to_string());
        }

        let mut returns = BTreeMap::new();
        for (i, text) in self.returns.into_iter().enumerate() {
            let text = text.trim();
            let (key, desc) = match return_params.get(i) {
                Some(p) if !p.name.is_empty() => match split_word(text) {
                    Some((first, rest)) if first == p.name => (p.name.to_string(), rest),
                    _ => (i.to_string(), text),
                },
                _ => (i.to_string(), text),
            };
            returns.entry(key).or_insert_with(|| desc.trim().to_string());
        }

        let mut custom: BTreeMap<String, String> = BTreeMap::new();
        for (name, text) in self.custom {
            push_text(custom.entry(name).or_default(), text.trim());
        }

        NatSpec {
            title: finish_text(self.title),
            author: finish_text(self.author),
            summary: finish_text(self.notice),
            detail: finish_text(self.dev),
            params,
            returns,
            custom,
            inheritdoc: self.inheritdoc,
        }
    }
}

/// `@` followed by a letter: a tag, even when it does not parse.
fn looks_like_tag(line: &str) -> bool {
    line.strip_prefix('@')
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_alphabetic()))
}

/// Split off the first whitespace-delimited word.
fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim_start())),
        None => Some((text, "")),
    }
}

fn push_line(slot: &mut Option<String>, line: &str) {
    match slot {
        Some(text) => push_text(text, line),
        None => *slot = Some(line.to_string()),
    }
}

fn push_text(text: &mut String, line: &str) {
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(line);
}

fn finish_text(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> NatSpec {
        NatSpec::parse(Some(text), &[])
    }

    #[test]
    fn absent_comment_is_empty() {
        let spec = NatSpec::parse(None, &[]);
        assert!(spec.is_empty());
        assert_eq!(spec.summary, None);
    }

    #[test]
    fn untagged_text_is_the_summary() {
        let spec = parse("Moves tokens.\n@dev Emits Transfer.");
        assert_eq!(spec.summary.as_deref(), Some("Moves tokens."));
        assert_eq!(spec.detail.as_deref(), Some("Emits Transfer."));
    }

    #[test]
    fn block_comment_decoration_is_stripped() {
        let spec = parse("/**\n * @title Token\n * @author Alice\n */");
        assert_eq!(spec.title.as_deref(), Some("Token"));
        assert_eq!(spec.author.as_deref(), Some("Alice"));
    }

    #[test]
    fn params_by_name_and_continuation_lines() {
        let spec = parse("@param to The recipient\n   of the tokens\n@param amount How many");
        assert_eq!(
            spec.params.get("to").map(String::as_str),
            Some("The recipient\nof the tokens")
        );
        assert_eq!(spec.params.get("amount").map(String::as_str), Some("How many"));
    }

    #[test]
    fn duplicate_param_keeps_first() {
        let spec = parse("@param x first\n@param x second");
        assert_eq!(spec.params.get("x").map(String::as_str), Some("first"));
    }

    #[test]
    fn returns_keyed_by_name_or_position() {
        let returns = [
            Param {
                name: "ok",
                type_string: Some("bool"),
            },
            Param {
                name: "",
                type_string: Some("uint256"),
            },
        ];
        let text = "@return ok Whether it worked\n@return The balance";
        let spec = NatSpec::parse(Some(text), &returns);
        assert_eq!(spec.returns.get("ok").map(String::as_str), Some("Whether it worked"));
        assert_eq!(spec.returns.get("1").map(String::as_str), Some("The balance"));
    }

    #[test]
    fn named_return_without_name_prefix_uses_position() {
        let returns = [Param {
            name: "balance",
            type_string: Some("uint256"),
        }];
        let spec = NatSpec::parse(Some("@return The current balance"), &returns);
        assert_eq!(spec.returns.get("0").map(String::as_str), Some("The current balance"));
    }

    #[test]
    fn custom_tags_and_inheritdoc() {
        let spec = parse("@custom:security-contact sec@example.com\n@inheritdoc IERC20");
        assert_eq!(
            spec.custom.get("security-contact").map(String::as_str),
            Some("sec@example.com")
        );
        assert_eq!(spec.inheritdoc.as_deref(), Some("IERC20"));
    }

    #[test]
    fn malformed_tags_are_ignored_with_their_continuations() {
        let spec = parse(
            "Summary\n@param\nstray line\n@bogus text\nmore stray\n@custom: nothing\n@dev Kept",
        );
        assert_eq!(spec.summary.as_deref(), Some("Summary"));
        assert!(spec.params.is_empty());
        assert!(spec.custom.is_empty());
        assert_eq!(spec.detail.as_deref(), Some("Kept"));
    }

    #[test]
    fn unparseable_tag_lines_do_not_extend_the_previous_tag() {
        let spec =
            parse("@param to Recipient\n@dev-note internal only\n@custom:a.b x\nstill ignored");
        assert_eq!(spec.params.get("to").map(String::as_str), Some("Recipient"));
        assert_eq!(spec.detail, None);
        assert!(spec.custom.is_empty());
    }

    #[test]
    fn email_like_text_continues_the_tag() {
        let spec = parse("@author Alice\n@ home");
        assert_eq!(spec.author.as_deref(), Some("Alice\n@ home"));
    }

    #[test]
    fn triple_slash_lines() {
        let spec = parse("/// @notice Hello\n/// world");
        assert_eq!(spec.summary.as_deref(), Some("Hello\nworld"));
    }
}
