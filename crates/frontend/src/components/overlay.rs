use dioxus::prelude::*;
use maidan_shared::overlay::{ShapeKind, LINE_WIDTH};
use maidan_shared::stage::Stage;
use maidan_shared::timeline::{FILL_OPACITY, HOVER_RADIUS};
use std::fmt::Write;

const GLOW_FILTER: &str = r#"<defs><filter id="glow" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="1.5" result="blur"/><feMerge><feMergeNode in="blur"/><feMergeNode in="SourceGraphic"/></feMerge></filter></defs>"#;

const MARKER_STROKE: f64 = 1.5;

/// Render the vector overlay (shapes, then markers) as one SVG document.
pub fn build_overlay_svg(stage: &Stage, hovered: Option<usize>) -> String {
    let now = stage.now();
    let viewport = stage.map.viewport();
    let mut svg = String::with_capacity(8192);

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = viewport.width,
        h = viewport.height,
    );
    svg.push_str(GLOW_FILTER);
    build_shapes(&mut svg, stage, now);
    build_markers(&mut svg, stage, hovered, now);
    svg.push_str("</svg>");
    svg
}

fn build_shapes(svg: &mut String, stage: &Stage, now: f64) {
    for shape in stage.overlay.shapes() {
        if shape.path.is_empty() {
            continue;
        }
        let opacity = shape.opacity.value_at(now);
        match shape.kind {
            ShapeKind::Area => {
                let stroke = shape.stroke.as_deref().unwrap_or("none");
                let _ = write!(
                    svg,
                    r#"<path class="area {class}" d="{d}" fill="{fill}" stroke="{stroke}" opacity="{opacity:.3}"/>"#,
                    class = shape.class,
                    d = shape.path,
                    fill = shape.fill,
                );
            }
            ShapeKind::AttackLine => {
                let stroke = shape.stroke.as_deref().unwrap_or(&shape.fill);
                let _ = write!(
                    svg,
                    r#"<path class="fight-path" d="{d}" fill="none" stroke="{stroke}" stroke-width="{LINE_WIDTH}" stroke-linecap="round" opacity="{opacity:.3}" filter="url(#glow)"/>"#,
                    d = shape.path,
                );
            }
        }
    }
}

fn build_markers(svg: &mut String, stage: &Stage, hovered: Option<usize>, now: f64) {
    for (i, marker) in stage.timeline.markers().iter().enumerate() {
        let (true, Some(at)) = (marker.revealed, marker.screen) else {
            continue;
        };
        // Hover overrides the pulse radius.
        let r = if hovered == Some(i) {
            HOVER_RADIUS
        } else {
            stage.timeline.radius_at(i, now)
        };
        let _ = write!(
            svg,
            r#"<circle class="marker" cx="{x:.1}" cy="{y:.1}" r="{r:.2}" fill="{fill}" fill-opacity="{FILL_OPACITY}" stroke="{stroke}" stroke-width="{MARKER_STROKE}" opacity="{opacity}" filter="url(#glow)"/>"#,
            x = at.x,
            y = at.y,
            fill = marker.fill,
            stroke = marker.stroke,
            opacity = stage.timeline.opacity(i),
        );
    }
}

/// Vector overlay stacked over the map canvas. Pointer events pass through
/// to the map frame, which owns hover handling.
#[component]
pub fn Overlay(stage: Signal<Stage>, hovered: Signal<Option<usize>>) -> Element {
    let svg_html = build_overlay_svg(&stage.read(), *hovered.read());

    rsx! {
        div {
            class: "overlay",
            dangerous_inner_html: "{svg_html}",
            style: "position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;",
        }
    }
}

/// Hover tooltip for the marker under the cursor.
#[component]
pub fn MarkerTooltip(stage: Signal<Stage>, hovered: Signal<Option<usize>>) -> Element {
    let Some(index) = *hovered.read() else {
        return rsx! {};
    };
    let stage = stage.read();
    let (Some(text), Some(at)) = (
        stage.timeline.tooltip(index),
        stage.timeline.markers().get(index).and_then(|m| m.screen),
    ) else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "tooltip",
            style: "left:{at.x}px;top:{at.y}px;",
            "{text}"
        }
    }
}
