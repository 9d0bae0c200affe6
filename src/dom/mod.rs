//! The rendering surface, abstracted.
//!
//! An [`ElementProvider`] hands out the current element collection and the
//! container size; a [`sink::StyleSink`] receives what was computed. Pages
//! are read with `scraper`; tests use [`StaticElements`].

pub mod css;
pub mod page;
pub mod sink;

use crate::render::layout::{Container, Element, ElementKind};

/// Source of the element collection, queried fresh on every pass.
pub trait ElementProvider {
    fn elements(&self) -> Vec<Element>;
    fn container(&self) -> Container;
}

/// A fixed, in-memory collection
#[derive(Debug, Clone, PartialEq)]
pub struct StaticElements {
    pub elements: Vec<Element>,
    pub container: Container,
}

impl StaticElements {
    pub fn new(elements: Vec<Element>, container: Container) -> Self {
        Self {
            elements,
            container,
        }
    }

    /// A portfolio-style collection: one centred photo ringed by projects.
    pub fn demo(container: Container) -> Self {
        const PROJECTS: &[(&str, f64, f64, f64)] = &[
            ("atlas", 18.0, 22.0, 180.0),
            ("brine", 72.0, 18.0, 160.0),
            ("cinder", 82.0, 55.0, 200.0),
            ("dune", 64.0, 80.0, 150.0),
            ("ember", 28.0, 76.0, 170.0),
            ("fjord", 10.0, 50.0, 140.0),
            ("gale", 44.0, 12.0, 130.0),
        ];

        let mut elements = vec![Element {
            index: 0,
            base_x: 50.0,
            base_y: 50.0,
            size: 220.0,
            kind: ElementKind::Photo,
            id: Some("photo".to_string()),
        }];
        elements.extend(PROJECTS.iter().enumerate().map(|(i, &(id, x, y, size))| Element {
            index: i + 1,
            base_x: x,
            base_y: y,
            size,
            kind: ElementKind::Project,
            id: Some(id.to_string()),
        }));

        Self::new(elements, container)
    }
}

impl ElementProvider for StaticElements {
    fn elements(&self) -> Vec<Element> {
        self.elements.clone()
    }

    fn container(&self) -> Container {
        self.container
    }
}
