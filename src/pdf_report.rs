//! The artists and albums report as a PDF document.

use std::path::Path;

use log::{debug, warn};
use printpdf::image_crate;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use queries::{ArtistReport, ReportAlbum};

use crate::error::AppError;

pub const FILE_NAME: &str = "artists_albums.pdf";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_X: f32 = 14.0;
const MARGIN_Y: f32 = 18.0;
const THUMB_MM: f32 = 30.0;
const THUMB_PX: u32 = 120;
const COVER_GAP: f32 = 4.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
/// Generous average glyph width of Helvetica, in ems.
const CHAR_WIDTH_EM: f32 = 0.6;
const PT_TO_MM: f32 = 0.3528;

/// Renders the report with cover thumbnails, falling back to a text-only
/// layout when that fails.
pub fn render_report(report: &ArtistReport, media_root: &Path) -> Result<Vec<u8>, AppError> {
    match render(report, Some(media_root)) {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            warn!("Full report failed, retrying without images: {}", err);
            render(report, None)
        }
    }
}

/// `media_root` is `None` for the text-only layout.
pub fn render(report: &ArtistReport, media_root: Option<&Path>) -> Result<Vec<u8>, AppError> {
    let mut writer = PageWriter::new("Artists and albums")?;
    writer.heading("Artists and albums", 18.0);
    writer.gap(4.0);

    for entry in &report.artists {
        writer.ensure_room(14.0);
        writer.heading(&entry.artist.name, 14.0);
        if entry.albums.is_empty() {
            writer.line("No albums", 9.0, FontStyle::Italic);
        }
        for album in &entry.albums {
            let cover = media_root.and_then(|root| load_cover(root, album));
            writer.album(album, cover);
        }
        writer.gap(3.0);
    }

    writer.ensure_room(20.0);
    writer.gap(4.0);
    writer.heading("Summary", 12.0);
    writer.line(
        &format!("Total artists: {}", report.total_artists),
        10.0,
        FontStyle::Regular,
    );
    writer.line(
        &format!("Total albums (excluding Classica): {}", report.total_albums),
        10.0,
        FontStyle::Regular,
    );
    writer.finish()
}

fn load_cover(media_root: &Path, album: &ReportAlbum) -> Option<Image> {
    let cover = album.album.cover.as_deref().filter(|c| !c.is_empty())?;
    let path = media_root.join(cover);
    match image_crate::open(&path) {
        Ok(picture) => {
            let thumbnail = picture.thumbnail(THUMB_PX, THUMB_PX);
            let rgb = image_crate::DynamicImage::ImageRgb8(thumbnail.to_rgb8());
            Some(Image::from_dynamic_image(&rgb))
        }
        Err(err) => {
            debug!("Skipping cover {}: {}", path.display(), err);
            None
        }
    }
}

fn album_title(album: &ReportAlbum) -> String {
    match album.album.release_year() {
        Some(year) => format!("{} ({})", album.album.title, year),
        None => album.album.title.clone(),
    }
}

fn album_metadata(album: &ReportAlbum) -> String {
    let mut parts = Vec::new();
    if let Some(genre) = album.album.genre.as_deref() {
        parts.push(format!("Genre: {}", genre));
    }
    if let Some(label) = album.album.label.as_deref() {
        parts.push(format!("Label: {}", label));
    }
    if let Some(catalog) = album.album.catalog_number.as_deref() {
        parts.push(format!("Cat.: {}", catalog));
    }
    if album.track_count > 0 {
        parts.push(format!("Tracks: {}", album.track_count));
    }
    parts.join(" | ")
}

/// The built-in fonts only cover Latin-1: typographic punctuation becomes
/// its ASCII form, a few Central European letters lose their accents and
/// anything else prints as `?`.
fn pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{0152}' => out.push_str("OE"),
            '\u{0153}' => out.push_str("oe"),
            'ą' | 'ă' | 'ā' => out.push('a'),
            'ć' | 'č' => out.push('c'),
            'ď' | 'đ' => out.push('d'),
            'ę' | 'ě' | 'ē' => out.push('e'),
            'ğ' => out.push('g'),
            'ı' | 'ī' => out.push('i'),
            'ł' | 'ľ' => out.push('l'),
            'ń' | 'ň' => out.push('n'),
            'ő' | 'ō' => out.push('o'),
            'ř' => out.push('r'),
            'ś' | 'š' | 'ş' => out.push('s'),
            'ť' | 'ţ' => out.push('t'),
            'ű' | 'ů' | 'ū' => out.push('u'),
            'ź' | 'ż' | 'ž' => out.push('z'),
            'Ą' | 'Ă' | 'Ā' => out.push('A'),
            'Ć' | 'Č' => out.push('C'),
            'Ę' | 'Ě' | 'Ē' => out.push('E'),
            'Ł' | 'Ľ' => out.push('L'),
            'Ń' | 'Ň' => out.push('N'),
            'Ő' => out.push('O'),
            'Ř' => out.push('R'),
            'Ś' | 'Š' | 'Ş' => out.push('S'),
            'Ű' | 'Ů' => out.push('U'),
            'Ź' | 'Ż' | 'Ž' => out.push('Z'),
            c if c.is_control() => out.push(' '),
            c if (c as u32) <= 0xFF => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Splits `text` into lines that fit `width` millimetres at `size` points,
/// breaking between words and cutting words that are wider than a line.
fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let per_line = ((width / (size * PT_TO_MM * CHAR_WIDTH_EM)) as usize).max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > per_line {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..per_line).collect());
        }
        let word: String = word.into_iter().collect();
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > per_line && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !word.is_empty() {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Clone, Copy)]
enum FontStyle {
    Regular,
    Bold,
    Italic,
}

/// Keeps a cursor on the current page and opens a new page when the cursor
/// reaches the bottom margin.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, AppError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(PageWriter {
            doc,
            layer,
            y: PAGE_HEIGHT - MARGIN_Y,
            regular,
            bold,
            italic,
        })
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height < MARGIN_Y {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN_Y;
        }
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.line(text, size, FontStyle::Bold);
        self.gap(1.5);
    }

    fn line(&mut self, text: &str, size: f32, style: FontStyle) {
        self.line_within(text, size, style, TEXT_WIDTH);
    }

    fn line_within(&mut self, text: &str, size: f32, style: FontStyle, width: f32) {
        let height = size * PT_TO_MM + 1.5;
        for part in wrap(&pdf_text(text), width, size) {
            self.ensure_room(height);
            self.y -= height;
            let font = match style {
                FontStyle::Regular => &self.regular,
                FontStyle::Bold => &self.bold,
                FontStyle::Italic => &self.italic,
            };
            self.layer
                .use_text(part, size, Mm(MARGIN_X), Mm(self.y), font);
        }
    }

    fn album(&mut self, album: &ReportAlbum, cover: Option<Image>) {
        let block = if cover.is_some() { THUMB_MM + 2.0 } else { 10.0 };
        self.ensure_room(block);
        let top = self.y;
        let width = if cover.is_some() {
            TEXT_WIDTH - THUMB_MM - COVER_GAP
        } else {
            TEXT_WIDTH
        };
        self.line_within(&album_title(album), 11.0, FontStyle::Bold, width);
        let metadata = album_metadata(album);
        if !metadata.is_empty() {
            self.line_within(&metadata, 9.0, FontStyle::Regular, width);
        }
        if let Some(image) = cover {
            let (width, _) = image_size(&image);
            let dpi = width as f32 * 25.4 / THUMB_MM;
            image.add_to_layer(
                self.layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(PAGE_WIDTH - MARGIN_X - THUMB_MM)),
                    translate_y: Some(Mm(top - THUMB_MM)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );
            self.y = self.y.min(top - block);
        }
        self.gap(2.0);
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        self.doc.save_to_bytes().map_err(pdf_error)
    }
}

fn image_size(image: &Image) -> (usize, usize) {
    (image.image.width.0, image.image.height.0)
}

fn pdf_error(err: printpdf::Error) -> AppError {
    AppError::Pdf(err.to_string())
}
