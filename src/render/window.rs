use anyhow::Result;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::render::canvas::Canvas;
use crate::view::DragTracker;

/// 透過部分の下に敷く背景色 (0RGB)
pub const BACKGROUND: u32 = 0x202020;

/// minifbを使用したビューア
pub struct MinifbViewer {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    drag: DragTracker,
}

impl MinifbViewer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(60);

        Ok(Self {
            window,
            buffer: vec![BACKGROUND; width * height],
            width,
            height,
            drag: DragTracker::new(),
        })
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// キャンバスをバッファにコピー
    ///
    /// サイズが異なる場合はクロップ/パディング
    pub fn draw_canvas(&mut self, canvas: &Canvas) {
        self.buffer.fill(BACKGROUND);
        let src = canvas.to_0rgb(BACKGROUND);
        let w = self.width.min(canvas.width());
        for y in 0..self.height.min(canvas.height()) {
            let row = y * canvas.width();
            self.buffer[y * self.width..y * self.width + w].copy_from_slice(&src[row..row + w]);
        }
    }

    /// 左ボタンのドラッグ量（前回呼び出しからのピクセル差分）
    pub fn poll_drag(&mut self) -> Option<(f32, f32)> {
        let pressed = self.window.get_mouse_down(MouseButton::Left);
        let position = self.window.get_mouse_pos(MouseMode::Discard);
        self.drag.update(pressed, position)
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
}
