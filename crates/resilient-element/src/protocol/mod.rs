// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Element protocol - capability traits, locators and the resilient handle
//
// Architecture:
// - element: SearchContext / WebElement traits implemented by automation clients
// - locator: immutable, reusable lookup descriptors
// - resilient_element: lazy, self-healing handle built on top of both

pub mod element;
pub mod locator;
pub mod resilient_element;

pub use element::{ElementRef, Point, SearchContext, Size, WebElement};
pub use locator::Locator;
pub use resilient_element::{Resolution, ResilientElement, ResilientElementBuilder, ResolverFn};
