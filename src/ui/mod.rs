mod theme;

pub use theme::Theme;

use ratatui::layout::Rect;

/// Rect of the given size centered in `area`, clamped to fit
pub fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_and_clamps() {
        let area = Rect::new(10, 5, 40, 20);
        assert_eq!(center_rect(area, 20, 10), Rect::new(20, 10, 20, 10));
        assert_eq!(center_rect(area, 80, 30), Rect::new(10, 5, 40, 20));
    }
}
