//! Placeholder image rendering for degraded (offline) operation

use async_trait::async_trait;
use image::{DynamicImage, Rgb, RgbImage};

use crate::generator::source::{ImageSource, SourceError};

/// Background fill of the placeholder canvas
const BACKGROUND: Rgb<u8> = Rgb([32, 32, 32]);
/// Color of the static "Offline Mode" label
const LABEL_COLOR: Rgb<u8> = Rgb([200, 200, 200]);
/// Color of the wrapped prompt text
const PROMPT_COLOR: Rgb<u8> = Rgb([180, 180, 180]);

/// Maximum characters per wrapped prompt line
const MAX_LINE_CHARS: usize = 40;

/// Glyph cell size of the embedded bitmap font
const GLYPH_SIZE: u32 = 8;
/// Vertical advance between prompt lines, in pixels
const LINE_HEIGHT: u32 = 14;

/// Renders a fixed-size placeholder image embedding the prompt text.
///
/// Rendering is deterministic: the same prompt and size always produce
/// pixel-identical output.
#[derive(Debug, Clone)]
pub struct PlaceholderRenderer {
    width: u32,
    height: u32,
}

impl Default for PlaceholderRenderer {
    fn default() -> Self {
        Self::new(512, 512)
    }
}

impl PlaceholderRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render the placeholder for a prompt
    pub fn render(&self, prompt: &str) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(self.width, self.height, BACKGROUND);

        draw_text(&mut canvas, "Offline Mode", 20, 20, 2, LABEL_COLOR);

        let wrapped = wrap_text(prompt, MAX_LINE_CHARS);
        let lines: Vec<String> = if wrapped.len() == 1 && wrapped[0].is_empty() {
            vec!["No prompt provided".to_string()]
        } else {
            wrapped
        };

        let mut y = 60;
        for line in &lines {
            if y + GLYPH_SIZE > self.height {
                break;
            }
            draw_text(&mut canvas, line, 20, y, 1, PROMPT_COLOR);
            y += LINE_HEIGHT;
        }

        canvas
    }
}

#[async_trait]
impl ImageSource for PlaceholderRenderer {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn generate(&self, prompt: &str) -> Result<DynamicImage, SourceError> {
        Ok(DynamicImage::ImageRgb8(self.render(prompt)))
    }
}

/// Greedy word wrap.
///
/// Words accumulate into the current line while the joined length (word
/// characters plus one space per word already present) stays within
/// `max_chars`; an overflowing word closes the current line, even an empty
/// one, and starts the next. Degenerate input that yields no lines falls
/// back to the first `max_chars` characters of the raw text.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let line_chars: usize = line.iter().map(|w| w.chars().count()).sum();
        if line_chars + line.len() + word.chars().count() <= max_chars {
            line.push(word);
        } else {
            lines.push(line.join(" "));
            line = vec![word];
        }
    }
    if !line.is_empty() {
        lines.push(line.join(" "));
    }

    if lines.is_empty() {
        vec![text.chars().take(max_chars).collect()]
    } else {
        lines
    }
}

/// Blit a string onto the canvas using the embedded 8x8 font.
///
/// Pixels falling outside the canvas are clipped; non-ASCII characters
/// render as '?'.
fn draw_text(canvas: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    let mut pen_x = x;

    for ch in text.chars() {
        let glyph = glyph_for(ch);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = pen_x + col * scale + dx;
                        let py = y + row as u32 * scale + dy;
                        if px < width && py < height {
                            canvas.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
        pen_x += GLYPH_SIZE * scale;
    }
}

fn glyph_for(ch: char) -> [u8; 8] {
    use font8x8::legacy::BASIC_LEGACY;

    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}
