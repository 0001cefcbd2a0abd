//! The finished illustration and its SVG and JSON writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ink_core::{InkError, Result};
use ink_geometry::command::to_svg_path_data;
use serde::{Deserialize, Serialize};

use crate::generator::{Clip, ClipPath, StrokeSet};

/// Id of the silhouette `<clipPath>` element.
pub const CLIP_PATH_ID: &str = "silhouette-clip";

/// Vector output of one illustration run: one layer per generator, in
/// drawing order, plus the silhouette polygon the layers are clipped by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: usize,
    pub height: usize,
    /// SVG fill of every stroke.
    pub stroke_colour: String,
    pub layers: Vec<StrokeSet>,
    pub clip_path: Option<ClipPath>,
}

impl Document {
    pub fn stroke_count(&self) -> usize {
        self.layers.iter().map(StrokeSet::len).sum()
    }

    /// Write the document as an SVG image.
    ///
    /// Strokes are filled outlines. Clipping is only emitted when the
    /// document has a clip path.
    pub fn write_svg<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;

        let clip = self.clip_path.as_ref();
        if let Some(clip_path) = clip {
            writeln!(out, "  <defs>")?;
            writeln!(out, r#"    <clipPath id="{CLIP_PATH_ID}">"#)?;
            writeln!(out, r#"      <path d="{}"/>"#, to_svg_path_data(&clip_path.commands()))?;
            writeln!(out, "    </clipPath>")?;
            writeln!(out, "  </defs>")?;
        }

        let clip_attr = format!(r#" clip-path="url(#{CLIP_PATH_ID})""#);
        let fill = escape_attribute(&self.stroke_colour);
        for layer in &self.layers {
            let group_clip = clip.is_some() && layer.clip == Clip::Group;
            writeln!(
                out,
                r#"  <g id="{}" fill="{}" stroke="none"{}>"#,
                layer.class.name(),
                fill,
                if group_clip { clip_attr.as_str() } else { "" }
            )?;
            for (i, stroke) in layer.strokes.iter().enumerate() {
                let stroke_clip = clip.is_some() && matches!(layer.clip, Clip::PerStroke(_)) && layer.is_clipped(i);
                writeln!(
                    out,
                    r#"    <path d="{}"{}/>"#,
                    stroke.svg_path_data(),
                    if stroke_clip { clip_attr.as_str() } else { "" }
                )?;
            }
            writeln!(out, "  </g>")?;
        }
        writeln!(out, "</svg>")
    }

    pub fn to_svg(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_svg(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| InkError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    pub fn export_svg(&self, path: &Path) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_svg(&mut file)?;
        file.flush()?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn export_json(&self, path: &Path) -> Result<()> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Escape `value` for use inside a double-quoted XML attribute.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
