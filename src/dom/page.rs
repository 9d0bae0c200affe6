//! Element discovery from an HTML page.

use std::path::Path;

use scraper::{ElementRef, Html, Selector};

use super::css::{parse_box_size, parse_number};
use super::ElementProvider;
use crate::error::PageError;
use crate::render::layout::{Container, Element, ElementKind};

/// Items that get scattered
pub const ITEM_SELECTOR: &str = ".project-item, .photo-item";
/// Box the percentages are relative to
pub const CONTAINER_SELECTOR: &str = ".chaos-container";

/// A parsed page acting as the element provider.
pub struct HtmlPage {
    document: Html,
    items: Selector,
    container: Container,
}

impl HtmlPage {
    /// Parse a page. `fallback` is used when the container declares no size.
    pub fn parse(html: &str, fallback: Container) -> Result<Self, PageError> {
        let document = Html::parse_document(html);
        let items = selector(ITEM_SELECTOR)?;
        let container = document
            .select(&selector(CONTAINER_SELECTOR)?)
            .next()
            .map(|el| container_size(el, fallback))
            .unwrap_or(fallback);

        Ok(Self {
            document,
            items,
            container,
        })
    }

    pub fn load(path: &Path, fallback: Container) -> Result<Self, PageError> {
        let html = std::fs::read_to_string(path).map_err(|source| PageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&html, fallback)
    }
}

impl ElementProvider for HtmlPage {
    fn elements(&self) -> Vec<Element> {
        self.document
            .select(&self.items)
            .enumerate()
            .filter_map(|(index, el)| read_element(index, el))
            .collect()
    }

    fn container(&self) -> Container {
        self.container
    }
}

fn selector(s: &str) -> Result<Selector, PageError> {
    Selector::parse(s).map_err(|e| PageError::Selector(format!("{s}: {e}")))
}

fn container_size(el: ElementRef<'_>, fallback: Container) -> Container {
    let inline = el
        .value()
        .attr("style")
        .map(parse_box_size)
        .unwrap_or_default();
    let data = |name| el.value().attr(name).and_then(parse_number);

    let width = inline.width.or_else(|| data("data-width"));
    let height = inline.height.or_else(|| data("data-height"));

    Container {
        width: width.filter(|w| *w > 0.0).unwrap_or(fallback.width),
        height: height.filter(|h| *h > 0.0).unwrap_or(fallback.height),
    }
}

/// Read one item. Malformed items are skipped but keep their index slot.
fn read_element(index: usize, el: ElementRef<'_>) -> Option<Element> {
    let node = el.value();
    let number = |name: &str| {
        let parsed = node.attr(name).and_then(parse_number);
        if parsed.is_none() {
            log::warn!(
                "skipping item #{} ({}): missing or malformed {}",
                index,
                node.id().unwrap_or("no id"),
                name
            );
        }
        parsed
    };

    let base_x = number("data-base-x")?;
    let base_y = number("data-base-y")?;
    let size = number("data-size")?;

    let kind = if node.classes().any(|c| c == "photo-item") {
        ElementKind::Photo
    } else {
        ElementKind::Project
    };

    Some(Element {
        index,
        base_x,
        base_y,
        size,
        kind,
        id: node.id().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: Container = Container {
        width: 1200.0,
        height: 800.0,
    };

    const PAGE: &str = r#"
    <html><body>
      <div class="chaos-container" style="position: relative; width: 1000px; height: 600px">
        <div class="photo-item" id="me"
             data-base-x="50" data-base-y="50" data-size="220"><img src="me.jpg"></div>
        <div class="project-item" id="alpha"
             data-base-x="20" data-base-y="30%" data-size="180px"></div>
        <div class="project-item" data-base-x="oops" data-base-y="30" data-size="180"></div>
        <div class="project-item" data-base-x="75" data-base-y="70" data-size="160"></div>
        <div class="caption">not an item</div>
      </div>
    </body></html>
    "#;

    #[test]
    fn discovers_items_in_document_order() {
        let page = HtmlPage::parse(PAGE, FALLBACK).unwrap();
        let els = page.elements();
        assert_eq!(els.len(), 3);

        assert_eq!(els[0].kind, ElementKind::Photo);
        assert_eq!(els[0].id.as_deref(), Some("me"));
        assert_eq!(els[1].base_y, 30.0);
        assert_eq!(els[1].size, 180.0);
        assert_eq!(els[1].kind, ElementKind::Project);
    }

    #[test]
    fn malformed_items_keep_their_slot() {
        let page = HtmlPage::parse(PAGE, FALLBACK).unwrap();
        let indices: Vec<_> = page.elements().iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[test]
    fn container_size_from_inline_style() {
        let page = HtmlPage::parse(PAGE, FALLBACK).unwrap();
        assert_eq!(
            page.container(),
            Container {
                width: 1000.0,
                height: 600.0
            }
        );
    }

    #[test]
    fn container_size_from_data_attributes_or_fallback() {
        let html = r#"<div class="chaos-container" data-width="640"></div>"#;
        let page = HtmlPage::parse(html, FALLBACK).unwrap();
        assert_eq!(page.container().width, 640.0);
        assert_eq!(page.container().height, 800.0);

        let bare = HtmlPage::parse("<p>nothing</p>", FALLBACK).unwrap();
        assert_eq!(bare.container(), FALLBACK);
        assert!(bare.elements().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = HtmlPage::load(Path::new("/definitely/not/here.html"), FALLBACK);
        assert!(matches!(err, Err(PageError::Io { .. })));
    }
}
