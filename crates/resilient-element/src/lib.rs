//! resilient-element: Lazy, self-healing element handles for browser automation
//!
//! Element references held by automation clients go stale whenever the page
//! replaces the DOM node they point to, even if an equivalent element is still
//! there. This crate wraps the automation layer's element capability set in a
//! [`ResilientElement`] that:
//!
//! - looks the element up only when it is first used,
//! - reuses the found reference for later operations,
//! - on a stale reference, looks the element up again and retries the
//!   operation once,
//! - can be nested: a handle can be the search context of another handle, and
//!   each level recovers on its own.
//!
//! The automation layer is plugged in by implementing [`SearchContext`] for the
//! session root and [`SearchContext`] + [`WebElement`] for its element type.
//!
//! # Examples
//!
//! ## Chained handles
//!
//! ```ignore
//! use resilient_element::{Locator, ResilientElement, SearchContext, WebElement};
//! use std::sync::Arc;
//!
//! async fn submit_login(session: Arc<dyn SearchContext>) -> resilient_element::Result<()> {
//!     // Built before the page is loaded: no lookups yet
//!     let form = Arc::new(ResilientElement::new(session, Locator::id("login"))?);
//!     let user = form.child(Locator::name("user"))?;
//!     let password = form.child(Locator::name("password"))?;
//!
//!     user.send_keys("admin").await?;
//!     password.send_keys("secret").await?;
//!
//!     // If the form re-rendered in between, the stale levels are found again
//!     form.submit().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Custom resolution
//!
//! ```ignore
//! use resilient_element::{Error, Locator, ResilientElement, SearchContext};
//! use std::sync::Arc;
//!
//! fn last_row(table: Arc<dyn SearchContext>) -> ResilientElement {
//!     ResilientElement::with_resolver(table, |context| async move {
//!         let rows = context.find_elements(&Locator::tag_name("tr")).await?;
//!         rows.last()
//!             .cloned()
//!             .ok_or_else(|| Error::ElementNotFound("tag=tr (last)".to_string()))
//!     })
//! }
//! ```
//!
//! ## Eager staleness probing
//!
//! ```ignore
//! use resilient_element::{Locator, ResilientElement, StalenessPolicy};
//!
//! let banner = ResilientElement::builder()
//!     .context(session)
//!     .locator(Locator::css(".banner"))
//!     .policy(StalenessPolicy::EagerProbe)
//!     .build()?;
//! ```

pub mod api;
mod error;
pub mod protocol;

// Re-export error types
pub use error::{Error, Result};

// Re-export the capability traits and value types
pub use protocol::{ElementRef, Locator, Point, SearchContext, Size, WebElement};

// Re-export the resilient handle
pub use protocol::{Resolution, ResilientElement, ResilientElementBuilder, ResolverFn};

// Re-export configuration
pub use api::{STALENESS_POLICY_ENV, StalenessPolicy};
