// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Line charts with vertical markers and point annotations, rendered to PDF,
//! SVG or PNG depending on the output file extension.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};

use std::error::Error;
use std::ops::Range;
use std::path::Path;

mod dash;
mod pdf;

pub use dash::*;

/// Font family every chart element is drawn with.
pub const FONT: &str = "sans-serif";

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

pub const COLOURS: &[RGBColor] = &[
    hexcolour!(0x1F77B4),
    hexcolour!(0xFF7F0E),
    hexcolour!(0xD62728),
    hexcolour!(0x2CA02C),
    hexcolour!(0x9467BD),
    hexcolour!(0x8C564B),
];

/// Output format, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Pdf,
    Svg,
    Png,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Format> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(Format::Pdf),
            "svg" => Some(Format::Svg),
            "png" => Some(Format::Png),
            _ => None,
        }
    }
}

fn load_font() -> Result<(), Box<dyn Error>> {
    let data: &'static [u8] = dejavu::sans_mono::regular();
    register_font(FONT, FontStyle::Normal, data).map_err(|_| "failed to load embedded font")?;
    Ok(())
}

struct Series {
    label: String,
    points: Vec<(f64, f64)>,
    colour: RGBColor,
    style: LineStyle,
    markers: bool,
}

struct Marker {
    x: f64,
    style: LineStyle,
}

struct Annotation {
    at: (f64, f64),
    text: String,
}

pub struct PlotConfig {
    x_desc: String,
    y_desc: String,
    caption: String,
    size: (u32, u32),
    y_range: Option<Range<f64>>,

    series: Vec<Series>,
    markers: Vec<Marker>,
    annotations: Vec<Annotation>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self {
            x_desc: String::new(),
            y_desc: String::new(),
            caption: String::new(),
            size: (1080, 720),
            y_range: None,

            series: Vec::new(),
            markers: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = caption.as_ref().to_owned();
        self
    }

    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    /// Fix the y-axis range instead of fitting it to the data. Series points
    /// outside the range are clipped.
    pub fn y_range(&mut self, range: Range<f64>) -> &mut Self {
        self.y_range = Some(range);
        self
    }

    /// Add a solid line with a dot at every point.
    pub fn points(
        &mut self,
        label: impl AsRef<str>,
        points: Vec<(f64, f64)>,
        colour: RGBColor,
    ) -> &mut Self {
        self.series.push(Series {
            label: label.as_ref().to_owned(),
            points,
            colour,
            style: LineStyle::Solid,
            markers: true,
        });
        self
    }

    /// Add a line without point markers.
    pub fn line(
        &mut self,
        label: impl AsRef<str>,
        points: Vec<(f64, f64)>,
        colour: RGBColor,
        style: LineStyle,
    ) -> &mut Self {
        self.series.push(Series {
            label: label.as_ref().to_owned(),
            points,
            colour,
            style,
            markers: false,
        });
        self
    }

    /// Add a vertical marker spanning the full y range at `x`.
    pub fn vline(&mut self, x: f64, style: LineStyle) -> &mut Self {
        self.markers.push(Marker { x, style });
        self
    }

    /// Add a text label anchored just below and right of `at`.
    pub fn annotate(&mut self, at: (f64, f64), text: impl AsRef<str>) -> &mut Self {
        self.annotations.push(Annotation {
            at,
            text: text.as_ref().to_owned(),
        });
        self
    }

    pub fn series_len(&self) -> usize {
        self.series.len()
    }

    pub fn marker_positions(&self) -> Vec<f64> {
        self.markers.iter().map(|m| m.x).collect()
    }

    pub fn annotations(&self) -> Vec<(f64, f64, &str)> {
        self.annotations
            .iter()
            .map(|a| (a.at.0, a.at.1, a.text.as_str()))
            .collect()
    }

    pub fn x_range(&self) -> Range<f64> {
        let (min, max) = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.0)
            .chain(self.markers.iter().map(|m| m.x))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        if !min.is_finite() || !max.is_finite() {
            return 0.0..1.0;
        }
        let pad = ((max - min) * 0.05).max(0.5);
        (min - pad)..(max + pad)
    }

    pub fn effective_y_range(&self) -> Range<f64> {
        if let Some(range) = &self.y_range {
            return range.clone();
        }
        let max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.1)
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() || max <= 0.0 {
            return 0.0..1.0;
        }
        0.0..(max * 1.05)
    }

    /// Render the chart to `filename`, overwriting it.
    pub fn save(&self, filename: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let path = filename.as_ref();
        match Format::from_path(path) {
            Some(Format::Pdf) => {
                let mut svg = String::new();
                self.draw(SVGBackend::with_string(&mut svg, self.size).into_drawing_area())?;
                std::fs::write(path, pdf::from_svg(&svg)?)?;
                Ok(())
            }
            Some(Format::Svg) => self.draw(SVGBackend::new(path, self.size).into_drawing_area()),
            Some(Format::Png) => {
                self.draw(BitMapBackend::new(path, self.size).into_drawing_area())
            }
            None => Err(format!("unsupported chart format: {}", path.display()).into()),
        }
    }

    fn draw<DB>(&self, root: DrawingArea<DB, Shift>) -> Result<(), Box<dyn Error>>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        load_font()?;
        root.fill(&WHITE)?;

        let x_range = self.x_range();
        let y_range = self.effective_y_range();

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.caption, (FONT, 28))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 90)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(x_range, y_range.clone())?;

        chart
            .configure_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc.as_str())
            .label_style((FONT, 15))
            .axis_desc_style((FONT, 18))
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()?;

        for marker in &self.markers {
            let line = [(marker.x, y_range.start), (marker.x, y_range.end)];
            chart.draw_series(
                segments(&line, marker.style)
                    .into_iter()
                    .map(|piece| PathElement::new(piece, BLACK.stroke_width(1))),
            )?;
        }

        for series in &self.series {
            let colour = series.colour;
            chart
                .draw_series(
                    segments(&series.points, series.style)
                        .into_iter()
                        .map(move |piece| PathElement::new(piece, colour.stroke_width(2))),
                )?
                .label(series.label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
                });

            if series.markers {
                chart.draw_series(
                    series
                        .points
                        .iter()
                        .map(|&point| Circle::new(point, 3, colour.filled())),
                )?;
            }
        }

        let text = TextStyle::from((FONT, 15.0).into_font());
        chart.draw_series(self.annotations.iter().map(|a| {
            EmptyElement::at(a.at) + Text::new(a.text.clone(), (6, 6), text.clone())
        }))?;

        chart
            .configure_series_labels()
            .label_font((FONT, 15))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;

        root.present()?;
        Ok(())
    }
}
