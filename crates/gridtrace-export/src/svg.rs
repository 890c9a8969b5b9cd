//! SVG export.
//!
//! [`SvgRenderer`] implements the pipeline's [`Renderer`] trait and builds
//! the document with the [`svg`] crate, which handles XML escaping and
//! path data formatting.
//!
//! Each polygon becomes one `<path>` element: `M` to the first point, `L`
//! to the rest, `z` to close. Paths are filled white (color 0) or black
//! (color 1) and never stroked, so touching polygons leave no hairline
//! seams. Paths appear in emission order; later paths paint over earlier
//! ones, which is what makes holes visible.
//!
//! Polygon points arrive in y-up document space. The paths are wrapped in
//! a `<g>` whose transform flips them back into SVG's y-down space.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Element, Group, Path, Title};
use svg::node::{Node, Text, Value};

use gridtrace_pipeline::{Color, DocumentSize, Grid, Point, Renderer, TraceConfig, TraceError};

/// Metadata to embed in the SVG document.
///
/// All fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    ///
    /// Typically the input filename without extension.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized [`TraceConfig`], emitted inside a `<metadata>` element
    /// wrapped in a namespaced `<gridtrace:config>` element so exported
    /// files carry machine-parseable settings.
    pub config_json: Option<&'a str>,
}

/// Fill color for a cell color.
#[must_use]
pub const fn fill(color: Color) -> &'static str {
    match color {
        Color::Light => "white",
        Color::Dark => "black",
    }
}

/// Build an SVG path `d` attribute string for a closed polygon.
///
/// Returns an empty string for fewer than 3 points (nothing to fill).
///
/// # Examples
///
/// ```
/// use gridtrace_pipeline::Point;
/// use gridtrace_export::build_path_data;
///
/// let square = [
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
/// ];
/// assert_eq!(build_path_data(&square), "M0,0 L10,0 L10,10 z");
/// ```
#[must_use]
pub fn build_path_data(points: &[Point]) -> String {
    let [first, rest @ ..] = points else {
        return String::new();
    };
    if rest.len() < 2 {
        return String::new();
    }

    let mut data = Data::new().move_to((first.x, first.y));
    for p in rest {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data.close()))
}

/// A [`Renderer`] that accumulates `<path>` elements.
#[derive(Debug)]
pub struct SvgRenderer<'a> {
    metadata: SvgMetadata<'a>,
    document: DocumentSize,
    paths: Vec<Path>,
}

impl<'a> SvgRenderer<'a> {
    /// Create an empty renderer.
    #[must_use]
    pub const fn new(metadata: SvgMetadata<'a>) -> Self {
        Self {
            metadata,
            document: DocumentSize {
                width: 0.0,
                height: 0.0,
            },
            paths: Vec::new(),
        }
    }

    /// Number of paths drawn so far.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Serialize the document.
    #[must_use]
    pub fn finish(self) -> String {
        let DocumentSize { width, height } = self.document;
        let mut doc = Document::new()
            .set("width", format!("{width}pt"))
            .set("height", format!("{height}pt"))
            .set("viewBox", format!("0 0 {width} {height}"));

        // Optional <title> element
        if let Some(title) = self.metadata.title {
            doc = doc.add(Title::new(title));
        }

        // Optional <desc> element
        if let Some(description) = self.metadata.description {
            doc = doc.add(Description::new().add(Text::new(description)));
        }

        // Optional <metadata> element with the trace configuration
        if let Some(config_json) = self.metadata.config_json {
            let mut config_el = Element::new("gridtrace:config");
            config_el.assign("xmlns:gridtrace", "https://gridtrace.github.io/ns/1");
            config_el.append(Text::new(config_json));
            let mut metadata_el = Element::new("metadata");
            metadata_el.append(config_el);
            doc = doc.add(metadata_el);
        }

        let mut group =
            Group::new().set("transform", format!("matrix(1 0 0 -1 0 {height})"));
        for path in self.paths {
            group = group.add(path);
        }
        doc = doc.add(group);

        // The svg crate omits the XML declaration, so we prepend it.
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
    }
}

impl Renderer for SvgRenderer<'_> {
    fn begin(&mut self, document: DocumentSize) {
        self.document = document;
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let d = build_path_data(points);
        if d.is_empty() {
            return;
        }
        self.paths.push(
            Path::new()
                .set("d", d)
                .set("fill", fill(color))
                .set("stroke", "none"),
        );
    }
}

/// Trace `grid` and serialize the result as an SVG document string.
///
/// # Examples
///
/// ```
/// use gridtrace_pipeline::{Grid, TraceConfig};
/// use gridtrace_export::{SvgMetadata, to_svg};
///
/// let grid: Grid = "10\n01\n".parse().unwrap();
/// let metadata = SvgMetadata {
///     title: Some("diagonal"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&grid, &TraceConfig::default(), &metadata).unwrap();
/// assert!(svg.contains("<title>diagonal</title>"));
/// assert_eq!(svg.matches("<path").count(), 4);
/// ```
///
/// # Errors
///
/// Propagates [`TraceError`] from the trace.
pub fn to_svg(
    grid: &Grid,
    config: &TraceConfig,
    metadata: &SvgMetadata<'_>,
) -> Result<String, TraceError> {
    let mut renderer = SvgRenderer::new(metadata.clone());
    gridtrace_pipeline::trace_into(grid, config, &mut renderer)?;
    Ok(renderer.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn path_data_closes_polygon() {
        let points = [
            Point::new(0.0, 144.0),
            Point::new(144.0, 144.0),
            Point::new(144.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert_eq!(
            build_path_data(&points),
            "M0,144 L144,144 L144,0 L0,0 z"
        );
    }

    #[test]
    fn path_data_empty_for_degenerate_input() {
        assert_eq!(build_path_data(&[]), "");
        assert_eq!(
            build_path_data(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            ""
        );
    }

    #[test]
    fn fill_colors() {
        assert_eq!(fill(Color::Light), "white");
        assert_eq!(fill(Color::Dark), "black");
    }

    #[test]
    fn svg_has_xml_declaration_and_size() {
        let svg = to_svg(&grid("00\n00\n"), &TraceConfig::default(), &SvgMetadata::default())
            .unwrap();
        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains(r#"width="144pt""#));
        assert!(svg.contains(r#"height="144pt""#));
        assert!(svg.contains(r#"viewBox="0 0 144 144""#));
        assert!(svg.contains(r#"transform="matrix(1 0 0 -1 0 144)""#));
    }

    #[test]
    fn uniform_grid_is_one_white_path() {
        let svg = to_svg(&grid("00\n00\n"), &TraceConfig::default(), &SvgMetadata::default())
            .unwrap();
        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains(r#"d="M0,144 L144,144 L144,0 L0,0 z""#));
        assert!(svg.contains(r#"fill="white""#));
        assert!(svg.contains(r#"stroke="none""#));
    }

    #[test]
    fn paths_follow_emission_order() {
        let svg = to_svg(
            &grid("000\n010\n000\n"),
            &TraceConfig::default(),
            &SvgMetadata::default(),
        )
        .unwrap();
        let white = svg.find(r#"fill="white""#).unwrap();
        let black = svg.find(r#"fill="black""#).unwrap();
        assert!(white < black, "hole must be painted after its surround");
    }

    #[test]
    fn wide_grid_keeps_aspect_ratio() {
        let svg = to_svg(&grid("0101\n"), &TraceConfig::default(), &SvgMetadata::default())
            .unwrap();
        assert!(svg.contains(r#"viewBox="0 0 144 36""#));
        assert_eq!(svg.matches("<path").count(), 4);
    }

    #[test]
    fn metadata_is_embedded_and_escaped() {
        let metadata = SvgMetadata {
            title: Some("qr <code>"),
            description: Some("traced & filled"),
            config_json: Some(r#"{"document_size":144.0}"#),
        };
        let svg = to_svg(&grid("1\n"), &TraceConfig::default(), &metadata).unwrap();
        assert!(svg.contains("<title>qr &lt;code&gt;</title>"));
        assert!(svg.contains("<desc>traced &amp; filled</desc>"));
        assert!(svg.contains("<metadata>"));
        assert!(svg.contains("gridtrace:config"));
        assert!(svg.contains("document_size"));
    }

    #[test]
    fn no_metadata_elements_by_default() {
        let svg = to_svg(&grid("1\n"), &TraceConfig::default(), &SvgMetadata::default()).unwrap();
        assert!(!svg.contains("<title>"));
        assert!(!svg.contains("<desc>"));
        assert!(!svg.contains("<metadata>"));
    }

    #[test]
    fn invalid_config_is_an_error() {
        let config = TraceConfig {
            document_size: 0.0,
            ..TraceConfig::default()
        };
        let result = to_svg(&grid("1\n"), &config, &SvgMetadata::default());
        assert!(matches!(result, Err(TraceError::InvalidConfig(_))));
    }

    #[test]
    fn renderer_skips_degenerate_polygons() {
        let mut renderer = SvgRenderer::new(SvgMetadata::default());
        renderer.fill_polygon(&[Point::new(0.0, 0.0)], Color::Dark);
        assert_eq!(renderer.path_count(), 0);
    }
}
