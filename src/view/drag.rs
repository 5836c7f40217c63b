/// マウスのボタン状態と位置からドラッグ量を取り出す
///
/// 押下中の連続した位置の差分だけを返す。押し始めの 1 回目と、
/// ボタンを離した後は差分なし。
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    last: Option<(f32, f32)>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1 フレーム分の入力で更新し、前回位置からの (dx, dy) を返す
    pub fn update(&mut self, pressed: bool, position: Option<(f32, f32)>) -> Option<(f32, f32)> {
        let current = match (pressed, position) {
            (true, Some(p)) => p,
            _ => {
                self.last = None;
                return None;
            }
        };

        let delta = self.last.map(|(x, y)| (current.0 - x, current.1 - y));
        self.last = Some(current);
        delta.filter(|&(dx, dy)| dx != 0.0 || dy != 0.0)
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}
