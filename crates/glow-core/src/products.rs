//! Product mention extraction from assistant reply text.
//!
//! Replies are free-form markdown; recommendations show up in a handful of
//! recurring shapes. Each pattern is tried in order over the whole text and
//! mentions are deduplicated by name, first occurrence winning. No mentions
//! is a valid outcome, not an error.

use std::sync::OnceLock;

use regex::Regex;

/// A product mention mined from reply text; not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMention {
  pub name:        String,
  pub description: Option<String>,
  pub link:        Option<String>,
}

fn compile(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
  cell.get_or_init(|| Regex::new(pattern).expect("valid product pattern"))
}

/// `**Name** - [label](https://...)` or `**Name** - https://...`
fn bold_with_link() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  compile(
    &RE,
    r"\*\*([^*]+)\*\*\s*[-:]\s*(?:\[[^\]]+\]\((https?://[^)\s]+)\)|(https?://[^\s)]+))",
  )
}

/// `**Name** - description` / `**Name**: description`, optional `(link)`.
fn bold_with_description() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  compile(
    &RE,
    r"\*\*([^*]+)\*\*\s*[-:]\s*([^(\n]+?)\s*(?:\((https?://[^)\s]+)\))?\s*(?:\n|$)",
  )
}

/// `1. Name: description (link)` — numbered list items.
fn numbered_item() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  compile(
    &RE,
    r"(?m)^\s*\d+\.\s+([^:\n(]+?)(?::\s*([^(\n]+?))?\s*(?:\((https?://[^)\s]+)\))?\s*$",
  )
}

/// `- Name: description (link)` — dashed list items.
fn dashed_item() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  compile(
    &RE,
    r"(?m)^\s*-\s+([^:\n(]+?):\s*([^(\n]+?)\s*(?:\((https?://[^)\s]+)\))?\s*$",
  )
}

/// Scan `text` for product mentions.
pub fn extract_products(text: &str) -> Vec<ProductMention> {
  let mut mentions: Vec<ProductMention> = Vec::new();

  let mut push = |name: &str, description: Option<&str>, link: Option<&str>| {
    let name = name.trim();
    if name.is_empty() {
      return;
    }
    if mentions.iter().any(|m| m.name == name) {
      return;
    }
    let description = description
      .map(str::trim)
      .filter(|d| !d.is_empty())
      .map(str::to_owned);
    mentions.push(ProductMention {
      name: name.to_owned(),
      description,
      link: link.map(str::to_owned),
    });
  };

  for caps in bold_with_link().captures_iter(text) {
    let link = caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str());
    push(&caps[1], None, link);
  }

  for caps in bold_with_description().captures_iter(text) {
    push(
      &caps[1],
      caps.get(2).map(|m| m.as_str()),
      caps.get(3).map(|m| m.as_str()),
    );
  }

  for caps in numbered_item().captures_iter(text) {
    push(
      &caps[1],
      caps.get(2).map(|m| m.as_str()),
      caps.get(3).map(|m| m.as_str()),
    );
  }

  for caps in dashed_item().captures_iter(text) {
    push(
      &caps[1],
      caps.get(2).map(|m| m.as_str()),
      caps.get(3).map(|m| m.as_str()),
    );
  }

  mentions
}
