//! Screen-space layout helpers

use glam::Vec2;

/// Axis-aligned rectangle in screen pixels (origin bottom-left)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Scale factor that makes `texture` cover `screen` while keeping its aspect
pub fn cover_scale(texture: Vec2, screen: Vec2) -> Option<f32> {
    if texture.x <= 0.0 || texture.y <= 0.0 || screen.x <= 0.0 || screen.y <= 0.0 {
        return None;
    }
    Some((screen.x / texture.x).max(screen.y / texture.y))
}

/// Rectangle a cover-scaled texture is drawn into, centered on the screen
///
/// The rectangle overflows the screen along one axis; the excess is cropped
/// by the viewport. Returns `None` for degenerate sizes.
pub fn cover_rect(texture: Vec2, screen: Vec2) -> Option<Rect> {
    let scale = cover_scale(texture, screen)?;
    let size = texture * scale;
    let origin = (screen - size) / 2.0;
    Some(Rect::new(origin.x, origin.y, size.x, size.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_texture_on_landscape_screen() {
        let texture = Vec2::new(100.0, 50.0);
        let screen = Vec2::new(400.0, 300.0);

        assert_eq!(cover_scale(texture, screen), Some(6.0));
        let rect = cover_rect(texture, screen).expect("rect");
        assert_eq!(rect, Rect::new(-100.0, 0.0, 600.0, 300.0));
    }

    #[test]
    fn test_tall_texture_crops_vertically() {
        let rect = cover_rect(Vec2::new(50.0, 200.0), Vec2::new(400.0, 300.0)).expect("rect");
        assert_eq!(rect.width, 400.0);
        assert_eq!(rect.height, 1600.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, -650.0);
    }

    #[test]
    fn test_exact_fit() {
        let rect = cover_rect(Vec2::new(800.0, 600.0), Vec2::new(400.0, 300.0)).expect("rect");
        assert_eq!(rect, Rect::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(cover_rect(Vec2::new(0.0, 10.0), Vec2::new(400.0, 300.0)).is_none());
        assert!(cover_rect(Vec2::new(10.0, 10.0), Vec2::new(0.0, 300.0)).is_none());
    }
}
