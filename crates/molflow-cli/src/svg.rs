use crate::config::RenderSettings;
use molflow::core::models::element::element_info_or_default;
use molflow::engine::projection::{AtomMarker, BondSegment, Camera};
use molflow::workflows::render::RenderPort;
use std::fmt::Write;

const BOND_COLOR: &str = "#4d4d4d";
const OUTLINE_COLOR: &str = "#333333";

/// Render port that writes each frame as a standalone SVG document.
///
/// Atoms are filled with their CPK colour; primitives are written in the order they
/// arrive, so later (nearer) shapes paint over earlier ones.
pub struct SvgRenderer {
    width: u32,
    height: u32,
    background: String,
    document: String,
}

impl SvgRenderer {
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            background: settings.background.clone(),
            document: String::new(),
        }
    }

    /// The last completed document.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn into_document(self) -> String {
        self.document
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl RenderPort for SvgRenderer {
    fn begin_frame(&mut self, camera: &Camera, _primitive_count: usize) {
        self.document.clear();
        let _ = writeln!(
            self.document,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(
            self.document,
            r#"  <!-- pitch {:.1} yaw {:.1} -->"#,
            camera.pitch, camera.yaw
        );
        let _ = writeln!(
            self.document,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            escape_attribute(&self.background)
        );
    }

    fn draw_bond(&mut self, segment: &BondSegment) {
        let _ = writeln!(
            self.document,
            r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}" stroke-linecap="round"/>"#,
            segment.x1,
            segment.y1,
            segment.x2,
            segment.y2,
            BOND_COLOR,
            segment.stroke_width
        );
    }

    fn draw_atom(&mut self, marker: &AtomMarker) {
        let info = element_info_or_default(&marker.element);
        let _ = writeln!(
            self.document,
            r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="{:.3}" stroke="{}" stroke-width="1"><title>{}</title></circle>"#,
            marker.view_x,
            marker.view_y,
            marker.radius,
            info.color,
            marker.opacity,
            OUTLINE_COLOR,
            escape_attribute(&marker.element)
        );
    }

    fn end_frame(&mut self) {
        self.document.push_str("</svg>\n");
    }
}
