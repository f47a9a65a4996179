use crate::presentation::state::PresentationState;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

const BORDER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BORDER_THICKNESS: u32 = 2;

/// Draws the state's rectangles over the source photo scaled to the display box.
///
/// Returns `None` when nothing is displayed. Borders grow inwards and anything outside the
/// display box is clipped.
pub fn render_overlay(source: &RgbImage, state: &PresentationState) -> Option<RgbImage> {
    if state.current_image.is_none() {
        return None;
    }
    let width = state.display_box.width.round() as u32;
    let height = state.display_box.height.round() as u32;
    if width == 0 || height == 0 {
        return None;
    }
    let mut canvas = imageops::resize(source, width, height, FilterType::Triangle);
    for rect in &state.detections {
        let rect_w = rect.width.ceil() as u32;
        let rect_h = rect.height.ceil() as u32;
        for inset in 0..BORDER_THICKNESS {
            if rect_w <= 2 * inset || rect_h <= 2 * inset {
                break;
            }
            let border = Rect::at(rect.left as i32 + inset as i32, rect.top as i32 + inset as i32)
                .of_size(rect_w - 2 * inset, rect_h - 2 * inset);
            draw_hollow_rect_mut(&mut canvas, border, BORDER_COLOR);
        }
    }
    Some(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::image_ref::ImageRef;
    use crate::geometry::layout::DisplayBox;
    use crate::geometry::mapper::DisplayRectangle;

    fn state(detections: Vec<DisplayRectangle>) -> PresentationState {
        PresentationState {
            current_image: Some(ImageRef::new("file:///p.png", 40, 20)),
            display_box: DisplayBox {
                width: 20.0,
                height: 10.0,
            },
            detections,
            latency_seconds: 0.1,
        }
    }

    #[test]
    fn scales_to_display_box_and_draws_border() {
        let source = RgbImage::from_pixel(40, 20, Rgb([0, 0, 255]));
        let scaled = imageops::resize(&source, 20, 10, FilterType::Triangle);
        let overlay = render_overlay(
            &source,
            &state(vec![DisplayRectangle {
                top: 2.0,
                left: 3.0,
                width: 10.0,
                height: 6.0,
            }]),
        )
        .unwrap();
        assert_eq!(overlay.dimensions(), (20, 10));
        assert_eq!(overlay.get_pixel(3, 2), &BORDER_COLOR);
        assert_eq!(overlay.get_pixel(4, 3), &BORDER_COLOR);
        assert_eq!(overlay.get_pixel(12, 7), &BORDER_COLOR);
        assert_eq!(overlay.get_pixel(7, 5), scaled.get_pixel(7, 5));
        assert_eq!(overlay.get_pixel(0, 0), scaled.get_pixel(0, 0));
    }

    #[test]
    fn rectangle_past_the_right_edge_is_clipped() {
        let source = RgbImage::from_pixel(40, 20, Rgb([0, 0, 255]));
        let scaled = imageops::resize(&source, 20, 10, FilterType::Triangle);
        let overlay = render_overlay(
            &source,
            &state(vec![DisplayRectangle {
                top: 2.0,
                left: 15.0,
                width: 10.0,
                height: 6.0,
            }]),
        )
        .unwrap();
        assert_eq!(overlay.dimensions(), (20, 10));
        assert_eq!(overlay.get_pixel(15, 2), &BORDER_COLOR);
        assert_eq!(overlay.get_pixel(19, 2), &BORDER_COLOR);
        assert_eq!(overlay.get_pixel(15, 5), &BORDER_COLOR);
        assert_eq!(overlay.get_pixel(19, 7), &BORDER_COLOR);
        assert_eq!(overlay.get_pixel(19, 5), scaled.get_pixel(19, 5));
        assert_eq!(overlay.get_pixel(14, 5), scaled.get_pixel(14, 5));
    }

    #[test]
    fn zero_sized_rectangles_are_skipped() {
        let source = RgbImage::from_pixel(40, 20, Rgb([0, 0, 255]));
        let overlay = render_overlay(&source, &state(vec![DisplayRectangle::default()])).unwrap();
        assert_eq!(overlay, imageops::resize(&source, 20, 10, FilterType::Triangle));
    }

    #[test]
    fn nothing_to_render_for_cleared_state() {
        let source = RgbImage::new(4, 4);
        assert!(render_overlay(&source, &PresentationState::cleared(0.3)).is_none());
    }
}
