/// RGBA 1 ピクセル
pub type Rgba = [u8; 4];

pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// 透過背景の RGBA 描画バッファ
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![TRANSPARENT; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// 範囲外は None
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// ピクセルをセット（境界チェック付き）
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Bresenham で太さ `width` の線を描画
    ///
    /// 各点に width×width の正方形を打つ。
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: i32, color: Rgba) {
        let width = width.max(1);
        let lo = -(width / 2);
        let hi = lo + width - 1;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            for oy in lo..=hi {
                for ox in lo..=hi {
                    self.set_pixel(x + ox, y + oy, color);
                }
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// 行優先の RGBA バイト列
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// 背景色 (0RGB) の上にアルファ合成した minifb 用バッファ
    pub fn to_0rgb(&self, background: u32) -> Vec<u32> {
        let bg = [(background >> 16) & 0xFF, (background >> 8) & 0xFF, background & 0xFF];
        self.pixels
            .iter()
            .map(|&[r, g, b, a]| {
                let a = a as u32;
                let blend = |c: u8, base: u32| (c as u32 * a + base * (255 - a)) / 255;
                (blend(r, bg[0]) << 16) | (blend(g, bg[1]) << 8) | blend(b, bg[2])
            })
            .collect()
    }
}
