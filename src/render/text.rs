//! Label text, drawn with the bundled DejaVu Sans Mono.
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use lazy_static::lazy_static;
use rusttype::{point, Font, Scale};

static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

lazy_static! {
    static ref LABEL_FONT: Option<Font<'static>> = Font::try_from_bytes(FONT_DATA);
}

/// Glyph height in pixels for a grid drawn at `scale` pixels
/// per cell.
pub fn label_scale(scale: u32) -> Scale {
    Scale::uniform((3 * scale.max(1) + 4) as f32)
}

/// Size in pixels of the box `text` occupies when drawn with
/// [`draw_text`].
pub fn text_size(text: &str, scale: Scale) -> (u32, u32) {
    let font = match LABEL_FONT.as_ref() {
        Some(font) => font,
        None => return (0, 0),
    };
    let v_metrics = font.v_metrics(scale);
    let width = font
        .layout(text, scale, point(0., v_metrics.ascent))
        .filter_map(|g| g.pixel_bounding_box())
        .map(|bb| bb.max.x)
        .max()
        .unwrap_or(0)
        .max(0) as u32;
    let height = (v_metrics.ascent - v_metrics.descent).ceil() as u32;
    (width, height)
}

/// Draw `text` with its top-left corner at `(x, y)`. Pixels
/// outside the image are dropped.
pub fn draw_text(img: &mut RgbImage, text: &str, x: i64, y: i64, color: Rgb<u8>, scale: Scale) {
    let font = match LABEL_FONT.as_ref() {
        Some(font) => font,
        None => return,
    };
    // imageproc takes unsigned coordinates
    let (x, y) = (x.max(0) as u32, y.max(0) as u32);
    draw_text_mut(img, color, x, y, scale, font, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_font_loads() {
        assert!(LABEL_FONT.is_some());
    }

    #[test]
    fn size_grows_with_text_and_scale() {
        let small = label_scale(2);
        let (w1, h1) = text_size("1.0C", small);
        let (w2, h2) = text_size("-21.0C", small);
        assert!(w1 > 0 && h1 > 0);
        assert!(w2 > w1);
        assert_eq!(h1, h2);

        let (w3, h3) = text_size("1.0C", label_scale(4));
        assert!(w3 > w1 && h3 > h1);
        assert_eq!(text_size("", small).0, 0);
    }

    #[test]
    fn draws_inside_its_box() {
        let scale = label_scale(2);
        let (tw, th) = text_size("88.8C", scale);
        let mut img = RgbImage::from_pixel(100, 40, Rgb([255, 255, 255]));
        draw_text(&mut img, "88.8C", 10, 5, Rgb([0, 0, 0]), scale);

        let mut inked = 0;
        for (x, y, px) in img.enumerate_pixels() {
            if *px != Rgb([255, 255, 255]) {
                inked += 1;
                assert!(x >= 10 && x < 10 + tw, "x={} outside box", x);
                assert!(y >= 5 && y < 5 + th, "y={} outside box", y);
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn clipped_at_image_edge() {
        let mut img = RgbImage::new(8, 8);
        draw_text(&mut img, "123.4C", -20, 4, Rgb([255, 0, 0]), label_scale(4));
        draw_text(&mut img, "123.4C", 6, 6, Rgb([255, 0, 0]), label_scale(4));
    }
}
