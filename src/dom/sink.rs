//! Style sinks: where computed geometry and page style are written.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::css::css_string;
use crate::render::layout::{Element, LayoutResult};
use crate::render::status::StatusDisplay;
use crate::render::style::PageStyle;

/// Receives the output of one recomputation.
pub trait StyleSink {
    fn set_element(&mut self, element: &Element, layout: &LayoutResult);
    fn set_page(&mut self, style: &PageStyle);
    fn set_status(&mut self, status: &StatusDisplay);
}

/// In-memory sink; keeps the latest value written for everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySink {
    pub elements: BTreeMap<usize, LayoutResult>,
    pub page: Option<PageStyle>,
    pub status: Option<StatusDisplay>,
}

impl StyleSink for MemorySink {
    fn set_element(&mut self, element: &Element, layout: &LayoutResult) {
        self.elements.insert(element.index, *layout);
    }

    fn set_page(&mut self, style: &PageStyle) {
        self.page = Some(style.clone());
    }

    fn set_status(&mut self, status: &StatusDisplay) {
        self.status = Some(status.clone());
    }
}

/// Renders a stylesheet that reproduces the computed state.
#[derive(Debug, Default)]
pub struct CssSink {
    out: String,
}

impl CssSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn item_selector(element: &Element) -> String {
        match &element.id {
            Some(id) => format!("#{id}"),
            None => format!(
                ".chaos-container > :nth-child({} of .project-item, .photo-item)",
                element.index + 1
            ),
        }
    }
}

impl StyleSink for CssSink {
    fn set_element(&mut self, element: &Element, layout: &LayoutResult) {
        let _ = writeln!(
            self.out,
            "{} {{ left: {}%; top: {}%; width: {}px; transform: rotate({}deg); z-index: {}; }}",
            Self::item_selector(element),
            layout.left,
            layout.top,
            layout.width,
            layout.rotation,
            layout.z_index
        );
    }

    fn set_page(&mut self, style: &PageStyle) {
        if !style.body_classes.is_empty() {
            let _ = writeln!(self.out, "/* body class: {} */", style.body_classes.join(" "));
        }

        let mut body = Vec::new();
        if let Some(f) = style.filter {
            body.push(format!(
                "filter: hue-rotate({}deg) saturate({})",
                f.hue_rotate_deg, f.saturation
            ));
        }
        if let Some(level) = style.background {
            body.push(format!("background-color: rgb({level}, {level}, {level})"));
        }
        if !body.is_empty() {
            let _ = writeln!(self.out, "body {{ {}; }}", body.join("; "));
        }

        if let Some(img) = style.image_filter {
            let _ = writeln!(
                self.out,
                ".project-item img, .photo-item img {{ filter: contrast({}%) brightness({}%); }}",
                img.contrast_pct, img.brightness_pct
            );
        }
        if let Some(tilt) = style.name_tilt {
            let _ = writeln!(
                self.out,
                "#floatingName {{ transform: translate(-50%, -50%) rotate({tilt}deg); }}"
            );
        }
        if let Some(value) = style.readout {
            let _ = writeln!(
                self.out,
                "#uncertaintyValue::after {{ content: \"{value}\"; }}"
            );
        }
    }

    fn set_status(&mut self, status: &StatusDisplay) {
        let _ = writeln!(
            self.out,
            "#weatherIcon::after {{ content: {}; }}",
            css_string(status.icon.glyph())
        );
        let _ = writeln!(
            self.out,
            "#weatherDesc::after {{ content: {}; }}",
            css_string(&status.text)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::ElementKind;
    use crate::render::status::Icon;
    use crate::render::style::{HueFilter, ImageFilter};

    fn element(index: usize, id: Option<&str>) -> Element {
        Element {
            index,
            base_x: 10.0,
            base_y: 10.0,
            size: 100.0,
            kind: ElementKind::Project,
            id: id.map(str::to_string),
        }
    }

    fn result(index: usize) -> LayoutResult {
        LayoutResult {
            index,
            left: 12.5,
            top: 40.0,
            width: 100.0,
            rotation: -3.5,
            z_index: 57,
        }
    }

    #[test]
    fn memory_sink_keeps_latest() {
        let mut sink = MemorySink::default();
        let el = element(2, None);
        sink.set_element(&el, &result(2));
        let mut moved = result(2);
        moved.top = 45.0;
        sink.set_element(&el, &moved);
        assert_eq!(sink.elements.len(), 1);
        assert_eq!(sink.elements[&2].top, 45.0);
    }

    #[test]
    fn css_rules_per_element() {
        let mut sink = CssSink::new();
        sink.set_element(&element(0, Some("alpha")), &result(0));
        sink.set_element(&element(3, None), &result(3));
        let css = sink.finish();
        assert!(css.contains(
            "#alpha { left: 12.5%; top: 40%; width: 100px; \
             transform: rotate(-3.5deg); z-index: 57; }"
        ));
        assert!(css.contains(":nth-child(4 of .project-item, .photo-item)"));
    }

    #[test]
    fn css_page_and_status() {
        let mut sink = CssSink::new();
        sink.set_page(&PageStyle {
            body_classes: vec!["temp-warm", "temp-hot"],
            filter: Some(HueFilter {
                hue_rotate_deg: 90.0,
                saturation: 1.25,
            }),
            background: Some(200.0),
            image_filter: Some(ImageFilter {
                contrast_pct: 85.0,
                brightness_pct: 90.0,
            }),
            name_tilt: None,
            readout: Some(42),
        });
        sink.set_status(&StatusDisplay::new(Icon::Rain, "10°C · Rainy"));
        let css = sink.finish();
        assert!(css.contains("/* body class: temp-warm temp-hot */"));
        assert!(css.contains(
            "body { filter: hue-rotate(90deg) saturate(1.25); \
             background-color: rgb(200, 200, 200); }"
        ));
        assert!(css.contains("contrast(85%) brightness(90%)"));
        assert!(css.contains("content: \"42\""));
        assert!(css.contains("#weatherDesc::after { content: \"10°C · Rainy\"; }"));
        assert!(!css.contains("#floatingName"));
    }
}
