//! Draws an [`AggregationReport`] as a paginated document.

use super::aggregator::{AggregationReport, Category};
use super::buckets::BucketMap;
use super::canvas::{Canvas, Color, Font};
use super::pdf::{PdfCanvas, A4};
use super::period::ReportPeriod;
use super::pie;
use crate::errors::AppError;

const MARGIN: f32 = 50.0;
const LINE: f32 = 16.0;
const HEADING_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 11.0;
const PIE_RADIUS: f32 = 80.0;
const SWATCH: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    #[default]
    Charts,
    Text,
}

impl ReportStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "charts" | "chart" | "pie" => Some(ReportStyle::Charts),
            "text" | "list" => Some(ReportStyle::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Organisation name printed under the title and used in the file name.
    pub context: String,
    pub style: ReportStyle,
    pub include_locations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            context: "community".to_string(),
            style: ReportStyle::Charts,
            include_locations: true,
        }
    }
}

/// `<context>-report-<year>-<month>.pdf`, with the context slugified.
pub fn report_filename(context: &str, year: i32, month: u32) -> String {
    let mut slug = String::with_capacity(context.len());
    for c in context.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    let slug = if slug.is_empty() { "community" } else { slug };
    format!("{slug}-report-{year}-{month:02}.pdf")
}

/// Render the report to PDF bytes.
pub fn render_report(report: &AggregationReport, options: &RenderOptions) -> Result<Vec<u8>, AppError> {
    let mut canvas = PdfCanvas::new(A4);
    draw_report(&mut canvas, report, options)?;
    Ok(canvas.finish())
}

/// Draw every non-empty category onto `canvas`, starting new pages as needed.
pub fn draw_report<C: Canvas>(
    canvas: &mut C,
    report: &AggregationReport,
    options: &RenderOptions,
) -> Result<(), AppError> {
    let period = ReportPeriod::new(report.month, report.year)
        .map_err(|e| AppError::Render(e.to_string()))?;

    let mut cursor = Cursor::new(canvas);
    cursor.title(&period, &options.context, report.attendee_count());

    for category in Category::ALL {
        if category == Category::Location && !options.include_locations {
            continue;
        }
        let buckets = report.stats.get(category);
        if buckets.is_empty() {
            continue;
        }
        match options.style {
            ReportStyle::Charts => cursor.chart_section(category.title(), buckets),
            ReportStyle::Text => cursor.text_section(category.title(), buckets),
        }
    }
    Ok(())
}

/// Tracks the vertical write position and breaks pages.
struct Cursor<'a, C: Canvas> {
    canvas: &'a mut C,
    y: f32,
}

impl<'a, C: Canvas> Cursor<'a, C> {
    fn new(canvas: &'a mut C) -> Self {
        let top = canvas.page_size().1 - MARGIN;
        Self { canvas, y: top }
    }

    fn top(&self) -> f32 {
        self.canvas.page_size().1 - MARGIN
    }

    fn usable_height(&self) -> f32 {
        self.top() - MARGIN
    }

    /// Start a new page unless `needed` points still fit (or the page is untouched).
    fn reserve(&mut self, needed: f32) {
        let needed = needed.min(self.usable_height());
        if self.y - needed < MARGIN && self.y < self.top() {
            self.canvas.new_page();
            self.y = self.top();
        }
    }

    fn line(&mut self, size: f32, font: Font, color: Color, text: &str) {
        self.reserve(size.max(LINE));
        self.y -= size;
        self.canvas.text(MARGIN, self.y, size, font, color, text);
        self.y -= LINE - size * 0.5;
    }

    fn title(&mut self, period: &ReportPeriod, context: &str, attendees: u64) {
        self.line(22.0, Font::Bold, Color::BLACK, "Monthly Attendance Report");
        self.line(13.0, Font::Regular, Color::GREY, &format!("{} - {}", period.label(), context));
        self.line(
            BODY_SIZE,
            Font::Regular,
            Color::GREY,
            &format!("Total attendees: {attendees}"),
        );
        self.y -= LINE;
    }

    fn heading(&mut self, title: &str) {
        self.line(HEADING_SIZE, Font::Bold, Color::BLACK, title);
        self.y -= 4.0;
    }

    fn text_section(&mut self, title: &str, buckets: &BucketMap) {
        self.reserve(HEADING_SIZE + LINE * 2.0);
        self.heading(title);
        for (label, count) in buckets.iter() {
            self.line(BODY_SIZE, Font::Regular, Color::BLACK, &format!("{label}: {count}"));
        }
        self.y -= LINE;
    }

    fn chart_section(&mut self, title: &str, buckets: &BucketMap) {
        let slices = pie::layout(buckets);
        let chart_height = if slices.is_empty() { LINE * 2.0 } else { PIE_RADIUS * 2.0 + LINE };
        self.reserve(HEADING_SIZE + LINE + chart_height + LINE * buckets.len().min(4) as f32);
        self.heading(title);

        if slices.is_empty() {
            self.line(BODY_SIZE, Font::Regular, Color::GREY, "No data");
            self.y -= LINE;
            return;
        }

        let center = (MARGIN + PIE_RADIUS, self.y - PIE_RADIUS);
        for slice in &slices {
            let outline = pie::wedge_outline(center, PIE_RADIUS, slice);
            self.canvas.fill_polygon(&outline, slice.color);
        }
        for slice in &slices {
            let label = format!("{:.0}%", slice.percent());
            let (x, y) = pie::label_anchor(center, PIE_RADIUS, slice);
            let width = self.canvas.text_width(&label, 9.0);
            self.canvas
                .text(x - width / 2.0, y - 3.0, 9.0, Font::Bold, Color::WHITE, &label);
        }
        self.y -= PIE_RADIUS * 2.0 + LINE;

        for slice in &slices {
            self.reserve(LINE);
            self.canvas
                .fill_rect(MARGIN, self.y - SWATCH, SWATCH, SWATCH, slice.color);
            self.canvas.text(
                MARGIN + SWATCH + 6.0,
                self.y - SWATCH,
                BODY_SIZE,
                Font::Regular,
                Color::BLACK,
                &format!("{}: {}", slice.label, slice.value),
            );
            self.y -= LINE;
        }
        self.y -= LINE;
    }
}
