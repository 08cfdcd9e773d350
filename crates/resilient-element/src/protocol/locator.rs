// Locator - Immutable description of how to find one element
//
// A Locator carries no reference to a page or element. It is handed to a
// SearchContext, which performs the lookup, and may be reused for any number
// of repeated lookups. Resilient handles rely on that to re-find an element
// after its previous reference went stale.
//
// Text form: `strategy=value` (e.g. `id=main`, `xpath=//div[@role='menu']`).
// A string without a known strategy prefix is treated as a CSS selector.
// Whitespace around the strategy and the value is ignored.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Describes how to find an element within a search context.
///
/// # Example
///
/// ```ignore
/// use resilient_element::Locator;
///
/// let by_id = Locator::id("main");
/// let parsed: Locator = "id=main".parse()?;
/// assert_eq!(by_id, parsed);
///
/// // No prefix means CSS
/// let css: Locator = "nav > a.active".parse()?;
/// assert_eq!(css, Locator::css("nav > a.active"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Match the `id` attribute
    Id(String),
    /// Match the `name` attribute
    Name(String),
    /// Match one class name
    ClassName(String),
    /// Match the element tag name
    TagName(String),
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
    /// Exact visible text of a link
    LinkText(String),
    /// Substring of the visible text of a link
    PartialLinkText(String),
}

impl Locator {
    /// Locate by `id` attribute
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    /// Locate by `name` attribute
    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    /// Locate by class name
    pub fn class_name(value: impl Into<String>) -> Self {
        Locator::ClassName(value.into())
    }

    /// Locate by tag name
    pub fn tag_name(value: impl Into<String>) -> Self {
        Locator::TagName(value.into())
    }

    /// Locate by CSS selector
    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    /// Locate by XPath expression
    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    /// Locate a link by its exact text
    pub fn link_text(value: impl Into<String>) -> Self {
        Locator::LinkText(value.into())
    }

    /// Locate a link by part of its text
    pub fn partial_link_text(value: impl Into<String>) -> Self {
        Locator::PartialLinkText(value.into())
    }

    /// Returns the strategy name used in the text form
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Id(_) => "id",
            Locator::Name(_) => "name",
            Locator::ClassName(_) => "class",
            Locator::TagName(_) => "tag",
            Locator::Css(_) => "css",
            Locator::XPath(_) => "xpath",
            Locator::LinkText(_) => "link",
            Locator::PartialLinkText(_) => "partial-link",
        }
    }

    /// Returns the raw value without the strategy prefix
    pub fn value(&self) -> &str {
        match self {
            Locator::Id(v)
            | Locator::Name(v)
            | Locator::ClassName(v)
            | Locator::TagName(v)
            | Locator::Css(v)
            | Locator::XPath(v)
            | Locator::LinkText(v)
            | Locator::PartialLinkText(v) => v,
        }
    }

    /// Checks that the locator can describe an element at all.
    ///
    /// An empty or whitespace-only value never matches anything and is
    /// rejected up front with [`Error::InvalidArgument`].
    pub fn validate(&self) -> Result<()> {
        if self.value().trim().is_empty() {
            return Err(Error::InvalidArgument(format!(
                "locator '{}' has an empty value",
                self.strategy()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parts = s
            .split_once('=')
            .map(|(strategy, value)| (strategy.trim(), value.trim()));
        let locator = match parts {
            Some((strategy, value)) => match strategy {
                "id" => Locator::id(value),
                "name" => Locator::name(value),
                "class" => Locator::class_name(value),
                "tag" => Locator::tag_name(value),
                "css" => Locator::css(value),
                "xpath" => Locator::xpath(value),
                "link" => Locator::link_text(value),
                "partial-link" => Locator::partial_link_text(value),
                // `input[type=text]` and friends
                _ => Locator::css(s),
            },
            None => Locator::css(s),
        };
        locator.validate()?;
        Ok(locator)
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
