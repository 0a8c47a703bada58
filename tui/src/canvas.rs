//! Pixel Canvas
//!
//! A framebuffer in the kiosk's logical pixels with a text overlay on top.
//! Rendering samples two pixels into every terminal cell using the upper
//! half block: the foreground is the top sample, the background the bottom.
//!
//! Text lives on the cell grid. Any later fill or opaque blit covering a
//! cell erases the glyph there, so paint order is kept across both.

use image::RgbaImage;
use ratatui::buffer::Buffer;
use ratatui::style::Color as CellColor;
use unicode_width::UnicodeWidthChar;

use kiosk_core::{Color, FontSize, Point, Rect, Size};

/// Upper half block; foreground paints the top half of the cell
const HALF_BLOCK: &str = "\u{2580}";

/// Maps between terminal cells and logical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellGrid {
    /// Terminal columns
    pub cols: u16,
    /// Terminal rows
    pub rows: u16,
    /// Logical screen the grid covers
    pub logical: Size,
}

impl CellGrid {
    /// Create a grid; empty dimensions are clamped to one
    pub fn new(cols: u16, rows: u16, logical: Size) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            logical: Size::new(logical.width.max(1), logical.height.max(1)),
        }
    }

    /// Logical pixel at the center of a cell
    pub fn to_logical(&self, col: u16, row: u16) -> Point {
        let x = (2 * u32::from(col) + 1) * self.logical.width / (2 * u32::from(self.cols));
        let y = (2 * u32::from(row) + 1) * self.logical.height / (2 * u32::from(self.rows));
        Point::new(x as i32, y as i32)
    }

    /// Cell containing a logical pixel, `None` off screen
    pub fn cell_at(&self, point: Point) -> Option<(u16, u16)> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= self.logical.width || y >= self.logical.height {
            return None;
        }
        let col = x * u32::from(self.cols) / self.logical.width;
        let row = y * u32::from(self.rows) / self.logical.height;
        Some((col as u16, row as u16))
    }

    /// Logical width of one cell
    pub fn cell_width(&self) -> u32 {
        (self.logical.width / u32::from(self.cols)).max(1)
    }

    fn sample_x(&self, col: u16) -> u32 {
        (2 * u32::from(col) + 1) * self.logical.width / (2 * u32::from(self.cols))
    }

    /// Top and bottom sample rows of a cell (at one and three quarters)
    fn sample_ys(&self, row: u16) -> (u32, u32) {
        let quarters = 4 * u32::from(self.rows);
        let h = self.logical.height;
        (
            (4 * u32::from(row) + 1) * h / quarters,
            (4 * u32::from(row) + 3) * h / quarters,
        )
    }

    fn cell_count(&self) -> usize {
        usize::from(self.cols) * usize::from(self.rows)
    }
}

/// Framebuffer plus text overlay for one frame
#[derive(Clone, Debug)]
pub struct Canvas {
    grid: CellGrid,
    pixels: Vec<[u8; 3]>,
    glyphs: Vec<Option<(char, Color)>>,
}

impl Canvas {
    /// A black canvas over `grid`
    pub fn new(grid: CellGrid) -> Self {
        let pixels = (grid.logical.width as usize) * (grid.logical.height as usize);
        Self {
            grid,
            pixels: vec![[0; 3]; pixels],
            glyphs: vec![None; grid.cell_count()],
        }
    }

    /// Current cell grid
    pub fn grid(&self) -> CellGrid {
        self.grid
    }

    /// Follow a terminal resize; the logical screen stays the same
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.grid = CellGrid::new(cols, rows, self.grid.logical);
        self.glyphs = vec![None; self.grid.cell_count()];
    }

    /// Reset to black with no text
    pub fn clear(&mut self) {
        self.pixels.fill([0; 3]);
        self.glyphs.fill(None);
    }

    /// Color of a logical pixel
    pub fn pixel(&self, point: Point) -> Option<Color> {
        let index = self.pixel_index(point)?;
        let [r, g, b] = self.pixels[index];
        Some(Color::rgb(r, g, b))
    }

    /// Glyph shown in a cell
    pub fn glyph(&self, col: u16, row: u16) -> Option<char> {
        self.glyphs
            .get(self.cell_index(col, row)?)
            .copied()
            .flatten()
            .map(|(c, _)| c)
    }

    /// Fill an area, or everything when `None`
    pub fn fill(&mut self, color: Color, area: Option<Rect>) {
        let area = area.unwrap_or(Rect::new(
            0,
            0,
            self.grid.logical.width,
            self.grid.logical.height,
        ));
        let rgb = [color.r, color.g, color.b];
        for y in area.y.max(0)..area.bottom().min(self.grid.logical.height as i32) {
            for x in area.x.max(0)..area.right().min(self.grid.logical.width as i32) {
                self.paint(Point::new(x, y), rgb);
            }
        }
    }

    /// Alpha-blend an image with its top-left corner at `at`
    pub fn blit(&mut self, image: &RgbaImage, at: Point) {
        for (x, y, px) in image.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            if a == 0 {
                continue;
            }
            let point = Point::new(at.x + x as i32, at.y + y as i32);
            let Some(index) = self.pixel_index(point) else {
                continue;
            };
            let rgb = if a == u8::MAX {
                [r, g, b]
            } else {
                let dst = self.pixels[index];
                [blend(r, dst[0], a), blend(g, dst[1], a), blend(b, dst[2], a)]
            };
            self.paint(point, rgb);
        }
    }

    /// Lay a line of text over the cells, vertically centered on the line
    pub fn draw_text(&mut self, text: &str, font: FontSize, color: Color, at: Point) {
        let middle = Point::new(at.x.max(0), at.y + font.px() as i32 / 2);
        let Some((mut col, row)) = self.grid.cell_at(middle) else {
            return;
        };
        for c in text.chars() {
            let width = c.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }
            let Some(index) = self.cell_index(col, row) else {
                break;
            };
            self.glyphs[index] = Some((c, color));
            col += width;
        }
    }

    /// Write the frame into a ratatui buffer
    pub fn render(&self, buf: &mut Buffer) {
        let area = buf.area;
        for row in 0..area.height.min(self.grid.rows) {
            for col in 0..area.width.min(self.grid.cols) {
                let (top_y, bottom_y) = self.grid.sample_ys(row);
                let x = self.grid.sample_x(col);
                let top = self.sample(x, top_y);
                let bottom = self.sample(x, bottom_y);

                let cell = &mut buf[(area.x + col, area.y + row)];
                match self.glyphs[usize::from(row) * usize::from(self.grid.cols) + usize::from(col)] {
                    Some((c, color)) => {
                        cell.set_char(c)
                            .set_fg(CellColor::Rgb(color.r, color.g, color.b))
                            .set_bg(bottom);
                    }
                    None => {
                        cell.set_symbol(HALF_BLOCK).set_fg(top).set_bg(bottom);
                    }
                }
            }
        }
    }

    fn sample(&self, x: u32, y: u32) -> CellColor {
        let [r, g, b] = self.pixels[(y * self.grid.logical.width + x) as usize];
        CellColor::Rgb(r, g, b)
    }

    fn paint(&mut self, point: Point, rgb: [u8; 3]) {
        if let Some(index) = self.pixel_index(point) {
            self.pixels[index] = rgb;
        }
        if let Some((col, row)) = self.grid.cell_at(point) {
            if let Some(index) = self.cell_index(col, row) {
                self.glyphs[index] = None;
            }
        }
    }

    fn pixel_index(&self, point: Point) -> Option<usize> {
        let Size { width, height } = self.grid.logical;
        if point.x < 0 || point.y < 0 || point.x as u32 >= width || point.y as u32 >= height {
            return None;
        }
        Some(point.y as usize * width as usize + point.x as usize)
    }

    fn cell_index(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.grid.cols && row < self.grid.rows)
            .then(|| usize::from(row) * usize::from(self.grid.cols) + usize::from(col))
    }
}

fn blend(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    ((u16::from(src) * a + u16::from(dst) * (255 - a)) / 255) as u8
}
