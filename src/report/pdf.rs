use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use super::canvas::{Canvas, Color, Font};

/// A4 portrait, in points.
pub const A4: (f32, f32) = (595.0, 842.0);

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

/// Canvas that collects drawing operations per page and serialises them to PDF.
pub struct PdfCanvas {
    size: (f32, f32),
    pages: Vec<Content>,
}

impl PdfCanvas {
    pub fn new(size: (f32, f32)) -> Self {
        Self {
            size,
            pages: vec![Content::new()],
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current(&mut self) -> &mut Content {
        if self.pages.is_empty() {
            self.pages.push(Content::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Write the document and return its bytes.
    pub fn finish(self) -> Vec<u8> {
        let mut pdf = Pdf::new();
        let catalog_id = Ref::new(1);
        let tree_id = Ref::new(2);
        let regular_id = Ref::new(3);
        let bold_id = Ref::new(4);

        let mut next_id = 5;
        let mut ids = Vec::with_capacity(self.pages.len());
        for _ in &self.pages {
            ids.push((Ref::new(next_id), Ref::new(next_id + 1)));
            next_id += 2;
        }

        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(ids.iter().map(|(page_id, _)| *page_id))
            .count(ids.len() as i32);

        let (width, height) = self.size;
        for ((page_id, content_id), content) in ids.into_iter().zip(self.pages) {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, width, height));
            page.parent(tree_id);
            page.contents(content_id);
            page.resources()
                .fonts()
                .pair(REGULAR, regular_id)
                .pair(BOLD, bold_id);
            page.finish();

            pdf.stream(content_id, &content.finish());
        }

        pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
        pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));

        pdf.finish()
    }
}

/// The standard Type 1 fonts only cover Latin text; anything else becomes `?`.
fn pdf_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => b'-',
            '\u{2018}' | '\u{2019}' => b'\'',
            c if c.is_ascii() && !c.is_ascii_control() => c as u8,
            _ => b'?',
        })
        .collect()
}

impl Canvas for PdfCanvas {
    fn page_size(&self) -> (f32, f32) {
        self.size
    }

    fn new_page(&mut self) {
        self.pages.push(Content::new());
    }

    fn text(&mut self, x: f32, y: f32, size: f32, font: Font, color: Color, text: &str) {
        let name = match font {
            Font::Regular => REGULAR,
            Font::Bold => BOLD,
        };
        let bytes = pdf_text(text);
        let content = self.current();
        content.set_fill_rgb(color.r, color.g, color.b);
        content.begin_text();
        content.set_font(name, size);
        content.next_line(x, y);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return;
        };
        let content = self.current();
        content.set_fill_rgb(color.r, color.g, color.b);
        content.move_to(x0, y0);
        for &(x, y) in rest {
            content.line_to(x, y);
        }
        content.close_path();
        content.fill_nonzero();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let content = self.current();
        content.set_fill_rgb(color.r, color.g, color.b);
        content.rect(x, y, width, height);
        content.fill_nonzero();
    }

    fn text_width(&self, text: &str, size: f32) -> f32 {
        // Helvetica averages a little over half an em per glyph.
        text.chars().count() as f32 * size * 0.52
    }
}
