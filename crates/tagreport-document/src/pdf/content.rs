// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content stream compiler — lays the report out on a single US Letter page
// and emits the page's operator stream.
//
// Layout is fixed: one text line every 14pt from the top, an optional image
// above the text, and no pagination. Lines that would land below the bottom
// limit are dropped.

use tagreport_core::{ReportConfig, ReportRequest};
use tracing::debug;

pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;
pub const LEFT_MARGIN: i64 = 72;
/// Baseline of the first line when nothing is drawn above the text.
pub const TEXT_TOP: i64 = 770;
pub const LINE_HEIGHT: i64 = 14;
/// Lines whose baseline would fall below this are not emitted.
pub const BOTTOM_LIMIT: i64 = 40;
/// Widest an image may be drawn: the page minus symmetric margins.
pub const MAX_CONTENT_WIDTH: i64 = PAGE_WIDTH - 2 * LEFT_MARGIN;
/// Space between the top text line and the top of the image.
pub const IMAGE_GAP: i64 = 20;
pub const FONT_SIZE: i64 = 12;
pub const SEPARATOR_MAX: usize = 60;

/// Resource name of the report font.
pub const FONT_RESOURCE: &str = "F1";
/// Resource name of the report image.
pub const IMAGE_RESOURCE: &str = "Im1";

/// The text-bearing parts of a request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportText<'a> {
    pub title: &'a str,
    pub tags: &'a [String],
    pub selected_item: Option<&'a str>,
    pub category: Option<&'a str>,
    pub folder: Option<&'a str>,
}

impl<'a> ReportText<'a> {
    pub fn from_request(request: &'a ReportRequest) -> Self {
        Self {
            title: &request.title,
            tags: &request.tags,
            selected_item: request.selected_item_name.as_deref(),
            category: request.category.as_deref(),
            folder: request.folder.as_deref(),
        }
    }
}

/// Build the ordered list of lines to print.
///
/// Title, a dash separator as long as the title (at most 60), one `- tag`
/// line per tag or the "no tags" placeholder, then the optional descriptive
/// lines. Embedded line breaks split a line in two.
pub fn layout_lines(text: &ReportText<'_>, config: &ReportConfig) -> Vec<String> {
    let title = match text.title.trim() {
        "" => config.default_title.trim(),
        title => title,
    };

    let mut lines = vec![
        title.to_string(),
        "-".repeat(title.chars().count().min(SEPARATOR_MAX)),
    ];

    if text.tags.is_empty() {
        lines.push(config.no_tags_label.clone());
    } else {
        lines.extend(text.tags.iter().map(|tag| format!("- {tag}")));
    }

    if let Some(name) = non_blank(text.selected_item) {
        lines.push(String::new());
        lines.push(format!("{}: {}", config.selected_item_label, name));
    }
    if let Some(category) = non_blank(text.category) {
        lines.push(format!("{}: {}", config.category_label, category));
    }
    if let Some(folder) = non_blank(text.folder) {
        lines.push(format!("{}: {}", config.folder_label, folder));
    }

    lines
        .iter()
        .flat_map(|line| line.split('\n'))
        .map(|line| line.replace('\r', ""))
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Where and how large the image is drawn, in user units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePlacement {
    pub width: i64,
    pub height: i64,
    /// Lower-left corner.
    pub x: i64,
    pub y: i64,
}

impl ImagePlacement {
    /// Scale an image down (never up) to the content width and anchor it at
    /// the top-left of the page. `None` for an empty image.
    pub fn fit(pixel_width: u32, pixel_height: u32) -> Option<Self> {
        if pixel_width == 0 || pixel_height == 0 {
            return None;
        }
        let (w, h) = (i64::from(pixel_width), i64::from(pixel_height));
        let (width, height) = if w > MAX_CONTENT_WIDTH {
            // h * 468 / w, rounded to nearest.
            let scaled = (h * MAX_CONTENT_WIDTH + w / 2) / w;
            (MAX_CONTENT_WIDTH, scaled.max(1))
        } else {
            (w, h)
        };
        Some(Self {
            width,
            height,
            x: LEFT_MARGIN,
            y: TEXT_TOP - height - IMAGE_GAP,
        })
    }

    /// Baseline of the first text line below the image.
    pub fn text_start(&self) -> i64 {
        self.y - IMAGE_GAP
    }
}

/// A compiled operator stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledContent {
    bytes: Vec<u8>,
    draws_image: bool,
    lines_emitted: usize,
    lines_dropped: usize,
}

impl CompiledContent {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Whether the stream paints the `/Im1` XObject.
    pub fn draws_image(&self) -> bool {
        self.draws_image
    }

    pub fn lines_emitted(&self) -> usize {
        self.lines_emitted
    }

    /// Lines cut off by the bottom limit.
    pub fn lines_dropped(&self) -> usize {
        self.lines_dropped
    }
}

/// Emit the page's operators: the image block (if any) then one text object
/// per line.
pub fn compile(lines: &[String], image: Option<&ImagePlacement>) -> CompiledContent {
    let mut bytes = Vec::new();
    let mut y = TEXT_TOP;

    if let Some(placement) = image {
        bytes.extend_from_slice(
            format!(
                "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
                placement.width, placement.height, placement.x, placement.y, IMAGE_RESOURCE
            )
            .as_bytes(),
        );
        y = placement.text_start();
    }

    let mut lines_emitted = 0;
    for line in lines {
        if y < BOTTOM_LIMIT {
            break;
        }
        bytes.extend_from_slice(
            format!("BT\n/{} {} Tf\n{} {} Td\n(", FONT_RESOURCE, FONT_SIZE, LEFT_MARGIN, y)
                .as_bytes(),
        );
        encode_text(line, &mut bytes);
        bytes.extend_from_slice(b") Tj\nET\n");
        lines_emitted += 1;
        y -= LINE_HEIGHT;
    }

    let lines_dropped = lines.len() - lines_emitted;
    if lines_dropped > 0 {
        debug!(lines_emitted, lines_dropped, "Lines past the page bottom dropped");
    }

    CompiledContent {
        bytes,
        draws_image: image.is_some(),
        lines_emitted,
        lines_dropped,
    }
}

/// Write `text` as the body of a literal string in WinAnsiEncoding. `\`, `(`
/// and `)` are backslash-escaped and control characters become spaces.
/// Characters the encoding cannot show become `?`.
fn encode_text(text: &str, out: &mut Vec<u8>) {
    for ch in text.chars() {
        let code = u32::from(ch);
        match ch {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(code as u8);
            }
            _ if code < 0x20 || (0x7F..0xA0).contains(&code) => out.push(b' '),
            _ if code <= 0xFF => out.push(code as u8),
            _ => out.push(win_ansi_high(ch).unwrap_or(b'?')),
        }
    }
}

/// WinAnsiEncoding codes 0x80..=0x9F, which hold punctuation and letters from
/// outside Latin-1.
fn win_ansi_high(ch: char) -> Option<u8> {
    let code = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(code)
}
