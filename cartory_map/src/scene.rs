// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained description of a drawn map, and its SVG export.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use cartory_projection::svg_path_data;
use cartory_zoom::ZoomTransform;
use kurbo::{BezPath, Size};
use peniko::Color;

/// Fill of every country shape.
pub const COUNTRY_FILL: Color = Color::from_rgb8(0x99, 0x80, 0xfa);

/// Outline of every country shape.
pub const COUNTRY_STROKE: Color = Color::WHITE;

/// Fill of the sphere background.
pub const SPHERE_FILL: Color = Color::from_rgb8(0xf2, 0xf2, 0xf7);

/// Id of the clip path countries are clipped to.
pub const SPHERE_CLIP_ID: &str = "Map__sphere";

/// A snapshot of everything a backend needs to draw the map.
///
/// Paths are in projected (pre-transform) coordinates. Draw order: the sphere
/// background, then the countries clipped to [`clip`](Self::clip), all under
/// [`transform`](Self::transform).
#[derive(Clone, Debug)]
pub struct MapScene<'a> {
    /// Size of the drawing surface.
    pub size: Size,
    /// Current pan/zoom transform applied to the whole group.
    pub transform: ZoomTransform,
    /// Outline of the globe, drawn as background.
    pub sphere: &'a BezPath,
    /// Background fill.
    pub sphere_fill: Color,
    /// Clip path for the countries; the same outline as the sphere.
    pub clip: &'a BezPath,
    /// One shape per country, in atlas order.
    pub countries: Vec<CountryShape<'a>>,
}

/// One drawn country.
#[derive(Clone, Copy, Debug)]
pub struct CountryShape<'a> {
    /// Index in the atlas.
    pub index: usize,
    /// Stable subunit code.
    pub subunit: &'a str,
    /// Hover title; the country's display name.
    pub title: &'a str,
    /// Projected outline.
    pub path: &'a BezPath,
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
}

impl MapScene<'_> {
    /// Serializes the scene as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let width = self.size.width;
        let height = self.size.height;
        let clip = svg_path_data(self.clip);
        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        let _ = write!(
            svg,
            "<defs><clipPath id=\"{SPHERE_CLIP_ID}\"><path d=\"{clip}\"/></clipPath></defs>"
        );
        let _ = write!(svg, "<g transform=\"{}\">", self.transform);
        let _ = write!(
            svg,
            "<path d=\"{}\" fill=\"{}\"/>",
            svg_path_data(self.sphere),
            color_to_svg(self.sphere_fill)
        );
        let _ = write!(svg, "<g clip-path=\"url(#{SPHERE_CLIP_ID})\">");
        for country in &self.countries {
            let _ = write!(
                svg,
                "<path d=\"{}\" fill=\"{}\" stroke=\"{}\"><title>",
                svg_path_data(country.path),
                color_to_svg(country.fill),
                color_to_svg(country.stroke)
            );
            escape_into(&mut svg, country.title);
            svg.push_str("</title></path>");
        }
        svg.push_str("</g></g></svg>");
        svg
    }
}

fn color_to_svg(color: Color) -> String {
    let rgba = color.to_rgba8();
    let mut out = String::with_capacity(7);
    let _ = write!(out, "#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{COUNTRY_FILL, SPHERE_FILL, color_to_svg, escape_into};

    #[test]
    fn colors_are_hex() {
        assert_eq!(color_to_svg(COUNTRY_FILL), "#9980fa");
        assert_eq!(color_to_svg(SPHERE_FILL), "#f2f2f7");
    }

    #[test]
    fn titles_are_escaped() {
        let mut out = String::new();
        escape_into(&mut out, "Bosnia & <Herz>");
        assert_eq!(out, "Bosnia &amp; &lt;Herz&gt;");
    }
}
