use super::*;
use Color as C;

fn mkimage<const W: usize, const H: usize>(data: [[Color; W]; H]) -> Image {
    let data = data
        .into_iter()
        .flat_map(|row| row.into_iter())
        .flat_map(|col| col.0)
        .collect::<Vec<_>>();
    Image::from_rgba8(Resolution::new(W as u32, H as u32), &data)
}

#[test]
fn clear_overwrites_every_pixel() {
    let mut image = mkimage([[C::RED, C::GREEN], [C::BLUE, C::WHITE]]);
    image.clear(C::BLACK);
    for y in 0..2 {
        for x in 0..2 {
            assert_eq!(image.get(x, y), C::BLACK);
        }
    }
}

#[test]
fn mix_averages_channels() {
    let black = mkimage([[C::BLACK]]);
    let white = mkimage([[C::WHITE]]);

    let mixed = black.mix(&white, 0.5);
    assert_eq!(mixed.get(0, 0), C::from_rgb8(128, 128, 128));

    // t = 0.0 keeps the left image, t = 1.0 the right one.
    assert_eq!(black.mix(&white, 0.0).get(0, 0), C::BLACK);
    assert_eq!(black.mix(&white, 1.0).get(0, 0), C::WHITE);
}

#[test]
fn mix_ignores_alpha() {
    let transparent = mkimage([[C::NULL]]);
    let mixed = transparent.mix(&transparent, 0.5);
    assert_eq!(mixed.get(0, 0).a(), 255);
}

#[test]
fn flip_horizontal() {
    let mut image = mkimage([[C::RED, C::GREEN]]);
    image.flip_horizontal_in_place();
    assert_eq!(image.get(0, 0), C::GREEN);
    assert_eq!(image.get(1, 0), C::RED);
}

#[test]
fn draw_line_horizontal() {
    let mut image = Image::new(4, 3);
    draw::line(&mut image, 0, 1, 3, 1).color(C::GREEN);

    for x in 0..4 {
        assert_eq!(image.get(x, 0), C::NULL);
        assert_eq!(image.get(x, 1), C::GREEN);
        assert_eq!(image.get(x, 2), C::NULL);
    }
}

#[test]
fn draw_line_clips_to_bounds() {
    let mut image = Image::new(2, 2);
    draw::line(&mut image, -5, 0, 5, 0).color(C::RED);
    assert_eq!(image.get(0, 0), C::RED);
    assert_eq!(image.get(1, 0), C::RED);
    assert_eq!(image.get(0, 1), C::NULL);
}

#[test]
fn draw_filled_rect() {
    let mut image = Image::new(4, 4);
    draw::rect(&mut image, 1, 1, 2, 2).color(C::YELLOW).fill();

    assert_eq!(image.get(0, 0), C::NULL);
    assert_eq!(image.get(1, 1), C::YELLOW);
    assert_eq!(image.get(2, 2), C::YELLOW);
    assert_eq!(image.get(3, 3), C::NULL);
}
