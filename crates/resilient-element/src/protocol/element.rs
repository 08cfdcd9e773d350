// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Element capability set
//
// These traits are the only boundary between resilient handles and the
// automation layer:
// - SearchContext: anything that can find elements (a session root, an element)
// - WebElement: an element reference and everything that can be done with it
//
// Automation clients implement both for their own session and element types.
// ResilientElement implements both as well, which is what allows handles to be
// chained: a handle can be the search context of another handle.

use crate::error::Result;
use crate::protocol::Locator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Type-erased, cheaply clonable reference to an element.
///
/// The reference may become stale at any time; the automation layer reports
/// that with [`Error::StaleElementReference`](crate::Error::StaleElementReference)
/// on the next operation attempted against it.
pub type ElementRef = Arc<dyn WebElement>;

/// On-screen position of an element's top-left corner, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

/// Rendered size of an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// Something that can find elements by [`Locator`].
///
/// Implemented by the root of an automation session and by elements, which
/// search their own subtree.
#[async_trait]
pub trait SearchContext: Send + Sync {
    /// Finds the first element matching the locator.
    ///
    /// Fails with [`Error::ElementNotFound`](crate::Error::ElementNotFound)
    /// when nothing matches.
    async fn find_element(&self, locator: &Locator) -> Result<ElementRef>;

    /// Finds every element matching the locator, in document order.
    ///
    /// Returns an empty vector when nothing matches.
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>>;
}

/// Operations available on an element reference.
///
/// Every method is a round-trip to the automation layer and may fail with a
/// stale reference error if the page replaced the underlying node.
#[async_trait]
pub trait WebElement: SearchContext {
    /// Lowercase tag name of the element
    async fn tag_name(&self) -> Result<String>;

    /// Visible text of the element and its descendants
    async fn text(&self) -> Result<String>;

    /// Whether the element is enabled
    async fn is_enabled(&self) -> Result<bool>;

    /// Whether the element (option, checkbox, radio) is selected
    async fn is_selected(&self) -> Result<bool>;

    /// Position of the element on the page
    async fn location(&self) -> Result<Point>;

    /// Rendered size of the element
    async fn size(&self) -> Result<Size>;

    /// Whether the element is displayed
    async fn is_displayed(&self) -> Result<bool>;

    /// Clears the content of an editable element
    async fn clear(&self) -> Result<()>;

    /// Clicks the element
    async fn click(&self) -> Result<()>;

    /// Value of an HTML attribute, or `None` if the attribute is absent
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Computed value of a CSS property
    async fn css_value(&self, name: &str) -> Result<String>;

    /// Value of a DOM property, or `None` if the property is not set
    async fn property(&self, name: &str) -> Result<Option<String>>;

    /// Types text into the element
    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Submits the form that encloses the element
    async fn submit(&self) -> Result<()>;
}
