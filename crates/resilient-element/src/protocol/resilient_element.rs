// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// ResilientElement - Lazy, self-healing element handle
//
// Key characteristics:
// - Lazy: nothing is looked up until the first operation
// - Cached: the resolved reference is reused until it is found stale
// - Self-healing: a stale reference is dropped, re-resolved and the operation
//   retried exactly once
// - Chainable: a handle is itself a SearchContext, so it can be the parent of
//   another handle
//
// Architecture:
// - Every public operation goes through `call` (value) or `act` (no value)
// - Resolution goes through the locator or the resolver function, never both
// - Each handle owns its cache; a child only reaches its parent through the
//   parent's public find_element, which runs the parent's own recovery
// - A level retries only when its own cached reference failed; staleness
//   coming back from the context is passed up as is, so a chain of depth D
//   makes at most 2D lookups
//
// Concurrency contract: the cache lock only protects the pointer swap and is
// never held across an await. Operations on one handle must still be
// serialized by the caller, like the automation session underneath.

use crate::api::StalenessPolicy;
use crate::error::{Error, Result};
use crate::protocol::{ElementRef, Locator, Point, SearchContext, Size, WebElement};
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Caller-supplied function that finds the element within a search context.
///
/// Used instead of a [`Locator`] when the lookup needs custom logic. Failures
/// it returns are treated exactly like failures of a locator lookup.
pub type ResolverFn =
    Arc<dyn Fn(Arc<dyn SearchContext>) -> BoxFuture<'static, Result<ElementRef>> + Send + Sync>;

/// How a handle finds its element. Fixed at construction.
#[derive(Clone)]
pub enum Resolution {
    /// Ask the context to find this locator
    Locator(Locator),
    /// Run a caller-supplied function against the context
    Resolver(ResolverFn),
}

fn resolver_fn<F, Fut>(resolve: F) -> ResolverFn
where
    F: Fn(Arc<dyn SearchContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ElementRef>> + Send + 'static,
{
    Arc::new(move |context| resolve(context).boxed())
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Locator(locator) => write!(f, "{}", locator),
            Resolution::Resolver(_) => f.write_str("resolver"),
        }
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Locator(locator) => f.debug_tuple("Locator").field(locator).finish(),
            Resolution::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// Element handle that resolves lazily and recovers from stale references.
///
/// A `ResilientElement` stores a search context and a way to find one element
/// in it. The element is looked up on first use and cached. When an operation
/// fails because the cached reference went stale, the handle looks the element
/// up again and retries the operation once. A second staleness failure, a
/// failure while looking the element up, or any other error, is returned to
/// the caller unchanged.
///
/// Handles chain: the context of a handle can be another handle. Each level
/// keeps its own cache and recovers on its own, so a stale leaf is re-found
/// through its still-valid parent without touching the root.
///
/// # Example
///
/// ```ignore
/// use resilient_element::{Locator, ResilientElement, WebElement};
/// use std::sync::Arc;
///
/// # async fn example(session: Arc<dyn resilient_element::SearchContext>) -> resilient_element::Result<()> {
/// // Nothing is looked up yet, so this works before the page is loaded
/// let main = Arc::new(ResilientElement::new(session, Locator::id("main-element"))?);
/// let sub = Arc::new(main.child(Locator::id("sub-element"))?);
/// let button = sub.child(Locator::id("final-element"))?;
///
/// // Resolves main, then sub, then button, then clicks
/// button.click().await?;
///
/// // After a partial re-render only the stale levels are looked up again
/// button.click().await?;
/// # Ok(())
/// # }
/// ```
pub struct ResilientElement {
    context: Arc<dyn SearchContext>,
    resolution: Resolution,
    policy: StalenessPolicy,
    cached: Mutex<Option<ElementRef>>,
}

impl ResilientElement {
    /// Creates a handle that finds its element in `context` with `locator`.
    ///
    /// No lookup happens here. Fails with [`Error::InvalidArgument`] when the
    /// locator has an empty value.
    pub fn new(context: Arc<dyn SearchContext>, locator: Locator) -> Result<Self> {
        locator.validate()?;
        Ok(Self::from_parts(
            context,
            Resolution::Locator(locator),
            StalenessPolicy::default(),
        ))
    }

    /// Creates a handle that finds its element by running `resolve` against
    /// `context`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let last_row = ResilientElement::with_resolver(table, |context| async move {
    ///     let rows = context.find_elements(&Locator::tag_name("tr")).await?;
    ///     rows.last()
    ///         .cloned()
    ///         .ok_or_else(|| Error::ElementNotFound("last tr".to_string()))
    /// });
    /// ```
    pub fn with_resolver<F, Fut>(context: Arc<dyn SearchContext>, resolve: F) -> Self
    where
        F: Fn(Arc<dyn SearchContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ElementRef>> + Send + 'static,
    {
        Self::from_parts(
            context,
            Resolution::Resolver(resolver_fn(resolve)),
            StalenessPolicy::default(),
        )
    }

    /// Create a new builder for ResilientElement
    pub fn builder() -> ResilientElementBuilder {
        ResilientElementBuilder::default()
    }

    /// Creates a handle for an element inside this one.
    ///
    /// The child uses this handle as its search context and inherits its
    /// staleness policy.
    pub fn child(self: &Arc<Self>, locator: Locator) -> Result<ResilientElement> {
        locator.validate()?;
        Ok(Self::from_parts(
            Arc::clone(self) as Arc<dyn SearchContext>,
            Resolution::Locator(locator),
            self.policy,
        ))
    }

    /// Returns this handle with a different staleness policy.
    pub fn with_policy(mut self, policy: StalenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn from_parts(
        context: Arc<dyn SearchContext>,
        resolution: Resolution,
        policy: StalenessPolicy,
    ) -> Self {
        Self {
            context,
            resolution,
            policy,
            cached: Mutex::new(None),
        }
    }

    /// Returns the staleness policy of this handle
    pub fn policy(&self) -> StalenessPolicy {
        self.policy
    }

    /// Returns how this handle finds its element
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Returns whether an element reference is currently cached.
    ///
    /// Does not contact the automation layer, so a cached reference may
    /// already be stale.
    pub fn is_resolved(&self) -> bool {
        self.cached.lock().is_some()
    }

    /// Returns the underlying element reference, resolving it if needed.
    ///
    /// Under [`StalenessPolicy::EagerProbe`] the cached reference is probed
    /// first. The returned reference is not protected: operations on it can
    /// fail as stale.
    pub async fn wrapped_element(&self) -> Result<ElementRef> {
        self.element().await
    }

    fn invalidate(&self) {
        self.cached.lock().take();
    }

    async fn resolve(&self) -> Result<ElementRef> {
        tracing::debug!(element = %self.resolution, "Resolving element");
        match &self.resolution {
            Resolution::Locator(locator) => self.context.find_element(locator).await,
            Resolution::Resolver(resolve) => resolve(Arc::clone(&self.context)).await,
        }
    }

    async fn element(&self) -> Result<ElementRef> {
        // Bound first so the guard is released before any await
        let cached = self.cached.lock().clone();

        if let Some(element) = cached {
            match self.policy {
                StalenessPolicy::LazyInvalidate => {
                    tracing::trace!(element = %self.resolution, "Using cached element");
                    return Ok(element);
                }
                StalenessPolicy::EagerProbe => {
                    let probe = element.is_displayed().await;
                    match probe {
                        Ok(_) => return Ok(element),
                        Err(err) if err.is_stale_reference() => {
                            tracing::debug!(
                                element = %self.resolution,
                                "Probe found stale element, discarding cached reference"
                            );
                            self.invalidate();
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }

        let element = self.resolve().await?;
        *self.cached.lock() = Some(Arc::clone(&element));
        Ok(element)
    }

    /// Runs `op` against the element, retrying once on a stale reference.
    ///
    /// Only staleness of this handle's own reference is recovered here. A
    /// failure while resolving, stale or not, is returned unchanged: a stale
    /// lookup means the context already spent its own retry.
    async fn call<T, F, Fut>(&self, operation: &'static str, op: F) -> Result<T>
    where
        F: Fn(ElementRef) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let element = self.element().await?;
        let result = op(element).await;
        match result {
            Err(err) if err.is_stale_reference() => {
                tracing::debug!(
                    element = %self.resolution,
                    operation,
                    "Stale element reference, resolving again and retrying once"
                );
                self.invalidate();

                let element = self.element().await?;
                let retried = op(element).await;
                if matches!(&retried, Err(err) if err.is_stale_reference()) {
                    self.invalidate();
                }
                retried
            }
            result => result,
        }
    }

    /// Like [`call`](Self::call) for operations that return nothing.
    async fn act<F, Fut>(&self, operation: &'static str, op: F) -> Result<()>
    where
        F: Fn(ElementRef) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        self.call(operation, op).await
    }
}

#[async_trait]
impl SearchContext for ResilientElement {
    async fn find_element(&self, locator: &Locator) -> Result<ElementRef> {
        self.call("find_element", |element| async move {
            element.find_element(locator).await
        })
        .await
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
        self.call("find_elements", |element| async move {
            element.find_elements(locator).await
        })
        .await
    }
}

#[async_trait]
impl WebElement for ResilientElement {
    async fn tag_name(&self) -> Result<String> {
        self.call("tag_name", |element| async move { element.tag_name().await })
            .await
    }

    async fn text(&self) -> Result<String> {
        self.call("text", |element| async move { element.text().await })
            .await
    }

    async fn is_enabled(&self) -> Result<bool> {
        self.call("is_enabled", |element| async move {
            element.is_enabled().await
        })
        .await
    }

    async fn is_selected(&self) -> Result<bool> {
        self.call("is_selected", |element| async move {
            element.is_selected().await
        })
        .await
    }

    async fn location(&self) -> Result<Point> {
        self.call("location", |element| async move { element.location().await })
            .await
    }

    async fn size(&self) -> Result<Size> {
        self.call("size", |element| async move { element.size().await })
            .await
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.call("is_displayed", |element| async move {
            element.is_displayed().await
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.act("clear", |element| async move { element.clear().await })
            .await
    }

    async fn click(&self) -> Result<()> {
        self.act("click", |element| async move { element.click().await })
            .await
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.call("attribute", |element| async move {
            element.attribute(name).await
        })
        .await
    }

    async fn css_value(&self, name: &str) -> Result<String> {
        self.call("css_value", |element| async move {
            element.css_value(name).await
        })
        .await
    }

    async fn property(&self, name: &str) -> Result<Option<String>> {
        self.call("property", |element| async move {
            element.property(name).await
        })
        .await
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.act("send_keys", |element| async move {
            element.send_keys(text).await
        })
        .await
    }

    async fn submit(&self) -> Result<()> {
        self.act("submit", |element| async move { element.submit().await })
            .await
    }
}

impl fmt::Debug for ResilientElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientElement")
            .field("resolution", &self.resolution)
            .field("policy", &self.policy)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Builder for ResilientElement
///
/// Exactly one of [`locator`](Self::locator) and [`resolver`](Self::resolver)
/// must be set, and a context is required.
///
/// # Example
///
/// ```ignore
/// use resilient_element::{Locator, ResilientElement, StalenessPolicy};
///
/// let search = ResilientElement::builder()
///     .context(session)
///     .locator(Locator::name("q"))
///     .policy(StalenessPolicy::from_env()?)
///     .build()?;
/// ```
#[derive(Default)]
pub struct ResilientElementBuilder {
    context: Option<Arc<dyn SearchContext>>,
    locator: Option<Locator>,
    resolver: Option<ResolverFn>,
    policy: Option<StalenessPolicy>,
}

impl ResilientElementBuilder {
    /// Set the search context the element is found in
    pub fn context(mut self, context: Arc<dyn SearchContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Find the element with a locator
    pub fn locator(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Find the element with a caller-supplied function
    pub fn resolver<F, Fut>(mut self, resolve: F) -> Self
    where
        F: Fn(Arc<dyn SearchContext>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ElementRef>> + Send + 'static,
    {
        self.resolver = Some(resolver_fn(resolve));
        self
    }

    /// Set the staleness policy (default: lazy-invalidate)
    pub fn policy(mut self, policy: StalenessPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Build the handle. No lookup happens here.
    ///
    /// Fails with [`Error::InvalidArgument`] when the context is missing,
    /// when neither or both of locator and resolver are set, or when the
    /// locator has an empty value.
    pub fn build(self) -> Result<ResilientElement> {
        let context = self
            .context
            .ok_or_else(|| Error::InvalidArgument("a search context is required".to_string()))?;

        let resolution = match (self.locator, self.resolver) {
            (Some(locator), None) => {
                locator.validate()?;
                Resolution::Locator(locator)
            }
            (None, Some(resolver)) => Resolution::Resolver(resolver),
            (None, None) => {
                return Err(Error::InvalidArgument(
                    "either a locator or a resolver is required".to_string(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(Error::InvalidArgument(
                    "locator and resolver are mutually exclusive".to_string(),
                ));
            }
        };

        Ok(ResilientElement::from_parts(
            context,
            resolution,
            self.policy.unwrap_or_default(),
        ))
    }
}
