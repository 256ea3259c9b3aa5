use std::collections::HashSet;

use mandelzoom_core::{
    Coordinator, HostComplex, IterationPolicy, NudgeDirection, PaletteId, PrecisionTier, Screen,
    Session, ViewEvent, ViewState,
};
use mandelzoom_render::{render_export, render_frame, ExportFormat, ExportRequest, RenderResult};

fn render(view: &ViewState, screen: &Screen, tier: PrecisionTier) -> RenderResult {
    let params = Coordinator::default()
        .frame_params(view, screen, tier)
        .expect("valid frame params");
    render_frame(&params).expect("render should succeed")
}

fn distinct_colors(result: &RenderResult) -> usize {
    result
        .buffer
        .pixels
        .chunks_exact(4)
        .map(|px| [px[0], px[1], px[2]])
        .collect::<HashSet<_>>()
        .len()
}

#[test]
fn end_to_end_default_render() {
    let result = render(
        &ViewState::default(),
        &Screen::new(200, 150, 1.0),
        PrecisionTier::Partial,
    );

    assert_eq!(result.buffer.width, 200);
    assert_eq!(result.buffer.height, 150);
    assert_eq!(result.buffer.pixels.len(), 200 * 150 * 4);

    let black = result
        .buffer
        .pixels
        .chunks_exact(4)
        .filter(|px| px[..3] == [0, 0, 0])
        .count();
    assert!(black > 0, "the set itself should be black");
    assert!(
        black < 200 * 150,
        "rendered image should contain non-black pixels"
    );
    assert_eq!(result.escaped_pixels + black, 200 * 150);
}

#[test]
fn render_determinism() {
    let screen = Screen::new(128, 96, 1.0);
    for tier in [PrecisionTier::Partial, PrecisionTier::Rigorous] {
        let a = render(&ViewState::default(), &screen, tier);
        let b = render(&ViewState::default(), &screen, tier);
        assert_eq!(a.buffer, b.buffer, "renders must be deterministic");
    }
}

#[test]
fn palette_switch_keeps_the_set() {
    let screen = Screen::new(96, 64, 1.0);
    let view = ViewState::default();
    let a = render(&view, &screen, PrecisionTier::Partial);
    let b = render(
        &view.apply(ViewEvent::SetPalette(PaletteId::Rainbow), &screen),
        &screen,
        PrecisionTier::Partial,
    );

    assert_ne!(a.buffer.pixels, b.buffer.pixels);
    let inside = |r: &RenderResult| -> Vec<bool> {
        r.buffer
            .pixels
            .chunks_exact(4)
            .map(|px| px[..3] == [0, 0, 0])
            .collect()
    };
    assert_eq!(inside(&a), inside(&b));
}

#[test]
fn deep_zoom_keeps_pixel_detail() {
    // Pixel spacing here is far below the resolution of a single f32.
    let view = ViewState::new(
        HostComplex::from_f64(-0.743643887037151, 0.131825904205330),
        1e9,
        PaletteId::ElectricBlue,
    )
    .unwrap();
    let screen = Screen::new(64, 64, 1.0);
    for tier in [PrecisionTier::Partial, PrecisionTier::Rigorous] {
        let result = render(&view, &screen, tier);
        assert!(result.escaped_pixels > 0, "{tier:?}");
        assert!(distinct_colors(&result) >= 8, "{tier:?} collapsed to blocks");
    }
}

#[test]
fn session_frames_follow_input() {
    let screen = Screen::new(80, 60, 1.0);
    let mut session = Session::new(ViewState::default(), screen);
    let first = session.take_frame().expect("initial frame requested");
    let before = render(&first.view, &first.screen, PrecisionTier::Partial);

    session.handle(ViewEvent::Nudge(NudgeDirection::Left));
    let second = session.take_frame().expect("nudge requests a frame");
    let after = render(&second.view, &second.screen, PrecisionTier::Partial);

    assert_ne!(before.buffer, after.buffer);
    assert!(session.take_frame().is_none());
}

#[test]
fn export_is_a_larger_render_of_the_same_view() {
    let view = ViewState::default();
    let screen = Screen::new(40, 30, 1.0);
    let request = ExportRequest {
        view,
        screen,
        tier: PrecisionTier::Rigorous,
        scale: 1,
        format: ExportFormat::Png,
    };
    let exported = render_export(&request).unwrap();
    let params = Coordinator::frame_params_with(
        &view,
        &screen,
        PrecisionTier::Rigorous,
        IterationPolicy::EXPORT,
    )
    .unwrap();
    assert_eq!(exported.buffer, render_frame(&params).unwrap().buffer);

    let doubled = render_export(&ExportRequest { scale: 2, ..request }).unwrap();
    assert_eq!((doubled.buffer.width, doubled.buffer.height), (80, 60));
}
