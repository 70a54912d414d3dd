//! Frames turned into terminal cells, driven by each pass's damage.

use tile_compositor::core::{EmptyFill, RendererConfig, SharedRenderer, Texture};
use tile_compositor::term::{FrameEncoder, Rgb};
use tile_compositor::types::{Rgba, TilePos, SCOREBOARD_TEXT};

const SIZE: (u16, u16) = (20, 6);

fn renderer(scoreboard: u32) -> SharedRenderer {
    SharedRenderer::new(
        RendererConfig::new(8, 4, 2, 2, EmptyFill::Color(Rgba::rgb(10, 10, 10)))
            .with_scoreboard_width(scoreboard),
    )
    .unwrap()
}

#[test]
fn first_pass_is_a_full_redraw_of_stacked_pixels() {
    let r = renderer(0);
    r.set_texture(Some(Texture::solid(2, 2, Rgba::rgb(200, 0, 0))), 0, 0)
        .unwrap();
    let out = r.render();
    assert_eq!((out.frame.width(), out.frame.height()), (16, 8));

    let mut enc = FrameEncoder::new(Rgb::default());
    let mut buf = Vec::new();
    let stats = enc.encode(&out, SIZE, "", &mut buf).unwrap();
    assert!(stats.full);
    assert_eq!(stats.step, 1);
    assert_eq!(stats.damaged_cells, 20 * 5);

    let cells = enc.cells().unwrap();
    let c = cells.get(1, 0).unwrap();
    assert_eq!(c.top, Rgb::new(200, 0, 0));
    assert_eq!(c.bottom, Rgb::new(200, 0, 0));
    // Unset cells still show background after the first pass.
    assert_eq!(cells.get(4, 0).unwrap().top, Rgb::new(0, 0, 0));
}

#[test]
fn large_frames_are_downsampled_to_fit() {
    let r = renderer(0);
    let mut enc = FrameEncoder::new(Rgb::default());
    // 16 px wide into 4 columns, 8 px high into 2 usable rows.
    let stats = enc.encode(&r.render(), (4, 3), "", &mut Vec::new()).unwrap();
    assert_eq!(stats.step, 4);
}

#[test]
fn only_repainted_cells_are_compared_and_flushed() {
    let r = renderer(0);
    r.set_texture(Some(Texture::solid(2, 2, Rgba::rgb(0, 90, 0))), 3, 1)
        .unwrap();
    let mut enc = FrameEncoder::new(Rgb::default());
    enc.encode(&r.render(), SIZE, "ready", &mut Vec::new()).unwrap();

    let mut buf = Vec::new();
    let idle = enc.encode(&r.render(), SIZE, "ready", &mut buf).unwrap();
    assert!(!idle.full);
    assert_eq!(idle.damaged_cells, 0);
    assert_eq!(idle.runs, 0);
    assert!(buf.is_empty());

    r.set_texture(Some(Texture::solid(2, 2, Rgba::rgb(0, 0, 90))), 7, 3)
        .unwrap();
    let changed = enc.encode(&r.render(), SIZE, "ready", &mut buf).unwrap();
    // Cell (7, 3) covers pixels 14..16 x 6..8: terminal row 3, columns 14 and 15.
    assert_eq!(changed.damaged_cells, 2);
    assert_eq!(changed.runs, 1);
    assert_eq!(
        enc.cells().unwrap().get(14, 3).unwrap().top,
        Rgb::new(0, 0, 90)
    );
}

#[test]
fn scoreboard_columns_are_always_damaged() {
    let r = renderer(8);
    let mut enc = FrameEncoder::new(Rgb::default());
    let draw = |text: &str| {
        r.clear_scoreboard();
        r.draw_scoreboard_text(0, 0, text, SCOREBOARD_TEXT);
        r.render()
    };
    enc.encode(&draw("1"), (30, 6), "", &mut Vec::new()).unwrap();

    let stats = enc.encode(&draw("2"), (30, 6), "", &mut Vec::new()).unwrap();
    // Frame is 24 x 8; the panel spans columns 16..24 over 4 rows.
    assert_eq!(stats.damaged_cells, 8 * 4);
    assert!(stats.runs > 0);
}

#[test]
fn camera_change_redraws_everything() {
    let r = renderer(0);
    let mut enc = FrameEncoder::new(Rgb::default());
    enc.encode(&r.render(), SIZE, "", &mut Vec::new()).unwrap();

    r.set_camera_origin(1.0, 0.0);
    let stats = enc.encode(&r.render(), SIZE, "", &mut Vec::new()).unwrap();
    assert!(stats.full);

    let stats = enc.encode(&r.render(), SIZE, "", &mut Vec::new()).unwrap();
    assert!(!stats.full);
}

#[test]
fn incremental_cells_match_a_fresh_full_redraw() {
    let r = renderer(4);
    let ghost = Texture::solid(2, 2, Rgba::new(255, 255, 255, 128));
    let mut enc = FrameEncoder::new(Rgb::default());
    let mut last = None;

    for i in 0..12u32 {
        let x = (i % 8) as f32 * 0.75;
        r.add_floating(TilePos::new(x, 1.5), ghost.clone());
        if i % 3 == 0 {
            let shade = (i * 20) as u8;
            let tile = Texture::solid(2, 2, Rgba::rgb(shade, 0, 0));
            r.set_texture(Some(tile), (i % 8) as i32, 3).unwrap();
        }
        let out = r.render();
        enc.encode(&out, SIZE, "", &mut Vec::new()).unwrap();
        last = Some(out);
    }

    let mut fresh = FrameEncoder::new(Rgb::default());
    fresh.encode(&last.unwrap(), SIZE, "", &mut Vec::new()).unwrap();
    assert_eq!(enc.cells(), fresh.cells());
}
