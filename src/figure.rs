//! The composed output figure.
//!
//! A [`Figure`] owns one [`PadCanvas`] per drawn pad. Every pad holds its drawn
//! [`Primitive`]s in drawing order, its finalized axes and the style state that
//! was in effect while it was drawn. The figure is handed to an output stage for
//! rasterisation or persistence.

use crate::attributes::{Color, FillStyle, LineStyle};
use crate::control::DrawStyle;
use crate::defaults::Appearance;
use crate::error::PlotError;
use crate::layout::{FrameTransform, NdcRect, PadGeometry, Shape, TextStyle};
use crate::objects::{FUNCTION_SAMPLES, Plottable, PlottableKind};
use crate::render::StyleState;
use crate::spec::{AxisLetter, AxisRange, BoxStyle};

/// Index of a primitive in its pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub usize);

/// A drawn datum.
#[derive(Debug, Clone)]
pub struct Series {
    /// Identity of the drawn object (`name_IN_input`).
    pub identity: String,
    /// Owned copy of the object, after ratio and scaling.
    pub plottable: Plottable,
    /// Kind the object was bound as.
    pub kind: PlottableKind,
    /// Draw style.
    pub draw_style: DrawStyle,
    /// Complete backend draw option.
    pub draw_option: String,
    /// Resolved appearance.
    pub appearance: Appearance,
    /// Legend label after placeholder substitution.
    pub label: Option<String>,
    /// This series carries the pad's axes.
    pub owns_axes: bool,
}

/// Horizontal line across the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLine {
    /// Height in user coordinates.
    pub y: f64,
    /// Line colour.
    pub color: Color,
    /// Line style.
    pub line_style: LineStyle,
    /// Line width.
    pub line_width: f64,
}

/// Row of a drawn legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    /// Text.
    pub label: String,
    /// Symbol letters (`"EP"`, `"L"`, `"F"`), empty for text-only rows.
    pub letters: String,
    /// Series whose attributes the symbol shows.
    pub series: Option<PrimitiveId>,
}

/// A drawn legend.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    /// Position in pad NDC.
    pub rect: NdcRect,
    /// Header line.
    pub title: Option<String>,
    /// Number of columns.
    pub columns: usize,
    /// Rows in order.
    pub rows: Vec<LegendRow>,
    /// Border, fill and text settings.
    pub style: BoxStyle,
    /// Effective text font and size.
    pub text: TextStyle,
}

/// A drawn text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Position in pad NDC.
    pub rect: NdcRect,
    /// Lines from top to bottom.
    pub lines: Vec<String>,
    /// Border, fill and text settings.
    pub style: BoxStyle,
    /// Effective text font and size.
    pub text: TextStyle,
}

/// Colour scale of a 2D pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Position in pad NDC.
    pub rect: NdcRect,
    /// Value range shown.
    pub range: AxisRange,
    /// Palette code.
    pub palette: i32,
    /// Number of contours.
    pub contours: u32,
}

/// Anything drawn in a pad.
#[derive(Debug, Clone)]
pub enum Primitive {
    /// Data series.
    Series(Box<Series>),
    /// Horizontal reference line.
    ReferenceLine(ReferenceLine),
    /// Legend.
    Legend(Legend),
    /// Text box.
    Text(TextBlock),
    /// Colour scale.
    Palette(Palette),
    /// Temporary placement obstacle; never left in a finished figure.
    Exclusion(NdcRect),
}

impl Primitive {
    /// The series, if this is one.
    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Primitive::Series(series) => Some(series),
            _ => None,
        }
    }
}

/// Finalized settings of one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisFrame {
    /// Axis letter.
    pub letter: AxisLetter,
    /// Visible range.
    pub range: AxisRange,
    /// Title.
    pub title: Option<String>,
    /// Title offset factor.
    pub title_offset: f64,
    /// Title size in pixels.
    pub title_size: f64,
    /// Label size in pixels.
    pub label_size: f64,
    /// Tick length in pad NDC.
    pub tick_length: f64,
    /// Division code.
    pub num_divisions: Option<i32>,
    /// Centred title.
    pub center_title: bool,
    /// Logarithmic scale.
    pub log: bool,
    /// Grid lines.
    pub grid: bool,
}

/// Axes of a pad, carried by its first drawn series.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSet {
    /// Series carrying the axes.
    pub owner: PrimitiveId,
    /// Horizontal axis.
    pub x: AxisFrame,
    /// Vertical axis.
    pub y: AxisFrame,
    /// Colour axis of 2D pads.
    pub z: Option<AxisFrame>,
}

impl AxisSet {
    /// Axis by letter.
    pub fn get(&self, letter: AxisLetter) -> Option<&AxisFrame> {
        match letter {
            AxisLetter::X => Some(&self.x),
            AxisLetter::Y => Some(&self.y),
            AxisLetter::Z => self.z.as_ref(),
        }
    }

    /// Mutable axis by letter.
    pub fn get_mut(&mut self, letter: AxisLetter) -> Option<&mut AxisFrame> {
        match letter {
            AxisLetter::X => Some(&mut self.x),
            AxisLetter::Y => Some(&mut self.y),
            AxisLetter::Z => self.z.as_mut(),
        }
    }
}

/// Log and grid switches of a pad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PadScales {
    /// Logarithmic x.
    pub log_x: bool,
    /// Logarithmic y.
    pub log_y: bool,
    /// Logarithmic z.
    pub log_z: bool,
    /// Vertical grid lines.
    pub grid_x: bool,
    /// Horizontal grid lines.
    pub grid_y: bool,
}

/// Colour scale settings a pad creates its palette from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteRequest {
    /// Palette width in pad NDC.
    pub width: f64,
    /// Palette code.
    pub palette: i32,
    /// Number of contours.
    pub contours: u32,
}

/// One drawn pad.
#[derive(Debug, Clone)]
pub struct PadCanvas {
    /// Pad ID.
    pub id: u8,
    /// Final geometry.
    pub geometry: PadGeometry,
    /// Title.
    pub title: Option<String>,
    /// Pad background.
    pub fill_color: Option<Color>,
    /// Frame background.
    pub frame_fill_color: Option<Color>,
    /// Style state the pad was drawn with.
    pub style: StyleState,
    /// Axes, unset if nothing drawn carries axes.
    pub axes: Option<AxisSet>,
    /// Log and grid switches.
    pub scales: PadScales,
    /// Primitives in drawing order.
    pub primitives: Vec<Primitive>,
    palette_request: Option<PaletteRequest>,
}

impl PadCanvas {
    /// Empty pad.
    pub fn new(id: u8, geometry: PadGeometry, style: StyleState) -> Self {
        Self {
            id,
            geometry,
            title: None,
            fill_color: None,
            frame_fill_color: None,
            style,
            axes: None,
            scales: PadScales::default(),
            primitives: Vec::new(),
            palette_request: None,
        }
    }

    /// Append a primitive.
    pub fn push(&mut self, primitive: Primitive) -> PrimitiveId {
        self.primitives.push(primitive);
        PrimitiveId(self.primitives.len() - 1)
    }

    /// Primitive by ID.
    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0)
    }

    /// Drawn series with their IDs.
    pub fn series(&self) -> impl Iterator<Item = (PrimitiveId, &Series)> {
        self.primitives
            .iter()
            .enumerate()
            .filter_map(|(index, primitive)| primitive.as_series().map(|s| (PrimitiveId(index), s)))
    }

    /// Ask for a colour scale, created on the next [`PadCanvas::update`].
    pub fn request_palette(&mut self, request: PaletteRequest) {
        self.palette_request = Some(request);
    }

    /// Colour scale, if one was created.
    pub fn palette(&self) -> Option<&Palette> {
        self.primitives.iter().find_map(|primitive| match primitive {
            Primitive::Palette(palette) => Some(palette),
            _ => None,
        })
    }

    /// Mutable colour scale.
    pub fn palette_mut(&mut self) -> Option<&mut Palette> {
        self.primitives.iter_mut().find_map(|primitive| match primitive {
            Primitive::Palette(palette) => Some(palette),
            _ => None,
        })
    }

    /// Bring derived primitives in line with the current geometry and axes.
    ///
    /// Creates the requested colour scale right of the frame once a z axis
    /// exists, and keeps its vertical extent equal to the frame's.
    pub fn update(&mut self) {
        let frame = self.geometry.frame();
        let z_range = self.axes.as_ref().and_then(|axes| axes.z.as_ref()).map(|z| z.range);
        if let Some(palette) = self.palette_mut() {
            palette.rect.y_low = frame.y_low;
            palette.rect.y_up = frame.y_up;
            if let Some(range) = z_range {
                palette.range = range;
            }
            return;
        }
        if let (Some(request), Some(range)) = (self.palette_request, z_range) {
            self.push(Primitive::Palette(Palette {
                rect: NdcRect::new(frame.x_up, frame.y_low, frame.x_up + request.width, frame.y_up),
                range,
                palette: request.palette,
                contours: request.contours,
            }));
        }
    }

    /// Mapping from user coordinates to pad NDC, once axes exist.
    pub fn transform(&self) -> Option<FrameTransform> {
        self.axes.as_ref().map(|axes| FrameTransform {
            frame: self.geometry.frame(),
            x: axes.x.range,
            y: axes.y.range,
            log_x: axes.x.log,
            log_y: axes.y.log,
        })
    }

    /// Occupied areas of all visible primitives, in drawing order.
    pub fn shapes(&self) -> Vec<Shape> {
        let transform = self.transform();
        self.primitives
            .iter()
            .filter_map(|primitive| match primitive {
                Primitive::Series(series) if series.draw_style.is_visible() => {
                    transform.map(|t| series_shape(&series.plottable, &t))
                }
                Primitive::ReferenceLine(line) => transform.map(|t| {
                    Shape::Polyline(vec![
                        (t.frame.x_low, t.y_to_ndc(line.y)),
                        (t.frame.x_up, t.y_to_ndc(line.y)),
                    ])
                }),
                Primitive::Legend(legend) => Some(Shape::Rects(vec![legend.rect])),
                Primitive::Text(text) => Some(Shape::Rects(vec![text.rect])),
                Primitive::Palette(palette) => Some(Shape::Rects(vec![palette.rect])),
                Primitive::Exclusion(rect) => Some(Shape::Rects(vec![*rect])),
                Primitive::Series(_) => None,
            })
            .collect()
    }
}

/// Area covered by a drawn object.
fn series_shape(plottable: &Plottable, t: &FrameTransform) -> Shape {
    match plottable {
        Plottable::Hist1d(hist) => {
            let base = t.y_to_ndc(t.y.min);
            Shape::Rects(
                (0..hist.bins())
                    .map(|bin| {
                        let edges = hist.edges();
                        let top = t.y_to_ndc(hist.contents[bin]);
                        NdcRect::new(
                            t.x_to_ndc(edges[bin]),
                            base.min(top),
                            t.x_to_ndc(edges[bin + 1]),
                            base.max(top),
                        )
                    })
                    .collect(),
            )
        }
        Plottable::Hist2d(hist) => {
            let (xe, ye) = (hist.x_edges(), hist.y_edges());
            Shape::Rects(
                hist.contents
                    .indexed_iter()
                    .filter(|(_, content)| **content != 0.0)
                    .map(|((ix, iy), _)| {
                        NdcRect::new(
                            t.x_to_ndc(xe[ix]),
                            t.y_to_ndc(ye[iy]),
                            t.x_to_ndc(xe[ix + 1]),
                            t.y_to_ndc(ye[iy + 1]),
                        )
                    })
                    .collect(),
            )
        }
        Plottable::Graph1d(graph) => {
            Shape::Polyline(graph.points().iter().map(|p| t.to_ndc(p.x, p.y)).collect())
        }
        Plottable::Graph2d(graph) => Shape::Rects(
            graph
                .points
                .iter()
                .map(|p| {
                    let (x, y) = t.to_ndc(p.x, p.y);
                    NdcRect::new(x - 0.005, y - 0.005, x + 0.005, y + 0.005)
                })
                .collect(),
        ),
        Plottable::Function1d(function) => Shape::Polyline(
            function
                .sample(FUNCTION_SAMPLES)
                .into_iter()
                .filter(|(_, y)| y.is_finite())
                .map(|(x, y)| t.to_ndc(x, y))
                .collect(),
        ),
        Plottable::Function2d(_) => Shape::Rects(vec![t.frame]),
    }
}

/// Time annotation of a figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    /// Formatted time.
    pub text: String,
    /// Horizontal position in canvas NDC.
    pub x: f64,
    /// Vertical position in canvas NDC.
    pub y: f64,
}

/// Output of plot generation.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Plot name.
    pub name: String,
    /// `name_IN_group[:category]`.
    pub unique_name: String,
    /// Figure group.
    pub figure_group: String,
    /// Figure category.
    pub figure_category: Option<String>,
    /// Style the figure was drawn with.
    pub style_name: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Keep the aspect ratio when resized.
    pub fixed_aspect_ratio: bool,
    /// Canvas fill colour.
    pub fill_color: Color,
    /// Canvas fill style.
    pub fill_style: FillStyle,
    /// Pads in ascending ID order.
    pub pads: Vec<PadCanvas>,
    /// Time annotation.
    pub timestamp: Option<Timestamp>,
    issues: Vec<PlotError>,
}

impl Figure {
    /// Empty figure.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        unique_name: String,
        figure_group: String,
        figure_category: Option<String>,
        style_name: String,
        (width, height): (u32, u32),
        fixed_aspect_ratio: bool,
        (fill_color, fill_style): (Color, FillStyle),
    ) -> Self {
        Self {
            name,
            unique_name,
            figure_group,
            figure_category,
            style_name,
            width,
            height,
            fixed_aspect_ratio,
            fill_color,
            fill_style,
            pads: Vec::new(),
            timestamp: None,
            issues: Vec::new(),
        }
    }

    /// Pad with the given ID.
    pub fn pad(&self, id: u8) -> Option<&PadCanvas> {
        self.pads.iter().find(|pad| pad.id == id)
    }

    /// Non-fatal problems met while generating the figure.
    pub fn issues(&self) -> &[PlotError] {
        &self.issues
    }

    pub(crate) fn extend_issues(&mut self, issues: impl IntoIterator<Item = PlotError>) {
        self.issues.extend(issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Marker;
    use crate::layout::Margins;
    use crate::objects::Hist1d;
    use crate::style::Style;
    use approx_eq::assert_approx_eq;

    fn canvas() -> PadCanvas {
        let geometry = PadGeometry {
            rect: NdcRect::UNIT,
            margins: Margins::new(0.1, 0.1, 0.1, 0.1),
            canvas_width: 500,
            canvas_height: 500,
        };
        PadCanvas::new(1, geometry, StyleState::from_style(&Style::default_2d()))
    }

    fn axis(letter: AxisLetter, max: f64) -> AxisFrame {
        AxisFrame {
            letter,
            range: AxisRange::new(0.0, max),
            title: None,
            title_offset: 1.0,
            title_size: 24.0,
            label_size: 20.0,
            tick_length: 0.03,
            num_divisions: None,
            center_title: false,
            log: false,
            grid: false,
        }
    }

    fn axes(z: Option<f64>) -> AxisSet {
        AxisSet {
            owner: PrimitiveId(0),
            x: axis(AxisLetter::X, 1.0),
            y: axis(AxisLetter::Y, 2.0),
            z: z.map(|max| axis(AxisLetter::Z, max)),
        }
    }

    #[test]
    fn test_palette_waits_for_z_axis_and_follows_frame() {
        let mut pad = canvas();
        pad.request_palette(PaletteRequest {
            width: 0.04,
            palette: 112,
            contours: 255,
        });
        pad.update();
        assert!(pad.palette().is_none());

        pad.axes = Some(axes(Some(9.0)));
        pad.update();
        let palette = *pad.palette().expect("palette");
        assert_approx_eq!(palette.rect.x_low, 0.9, 1e-12);
        assert_approx_eq!(palette.rect.x_up, 0.94, 1e-12);
        assert_approx_eq!(palette.range.max, 9.0, 1e-12);

        pad.geometry.margins.top = 0.2;
        pad.update();
        assert_eq!(pad.primitives.len(), 1);
        assert_approx_eq!(pad.palette().expect("palette").rect.y_up, 0.8, 1e-12);
    }

    #[test]
    fn test_shapes_skip_invisible_series() {
        let mut pad = canvas();
        pad.axes = Some(axes(None));
        let hist = Hist1d::new("h", vec![0.0, 0.5, 1.0], vec![1.0, 2.0], vec![0.0, 0.0])
            .expect("valid histogram");
        let appearance = Appearance {
            color: Color::BLACK,
            marker: Marker::FULL_CIRCLE,
            marker_size: 1.0,
            line_style: LineStyle::SOLID,
            line_width: 1.0,
            fill_style: FillStyle::HOLLOW,
            fill_opacity: 1.0,
        };
        pad.push(Primitive::Series(Box::new(Series {
            identity: "h_IN_f".to_string(),
            plottable: Plottable::Hist1d(hist),
            kind: PlottableKind::Hist1d,
            draw_style: DrawStyle::None,
            draw_option: "AXIS".to_string(),
            appearance,
            label: None,
            owns_axes: true,
        })));
        pad.push(Primitive::ReferenceLine(ReferenceLine {
            y: 1.0,
            color: Color::BLACK,
            line_style: LineStyle::DASHED,
            line_width: 1.0,
        }));
        pad.push(Primitive::Exclusion(NdcRect::new(0.1, 0.1, 0.9, 0.13)));

        let shapes = pad.shapes();
        assert_eq!(shapes.len(), 2);
        let Shape::Polyline(line) = &shapes[0] else {
            panic!("expected the reference line");
        };
        assert_approx_eq!(line[0].1, 0.5, 1e-12);
        assert_eq!(shapes[1], Shape::Rects(vec![NdcRect::new(0.1, 0.1, 0.9, 0.13)]));
        assert_eq!(pad.series().count(), 1);
    }
}
