use mandelzoom_core::{
    share, Coordinator, HostComplex, HostReal, IterationResult, NudgeDirection, PaletteId,
    PrecisionTier, Screen, Session, ViewEvent, ViewState,
};

/// Probe every pixel centre of a screen and collect results into a flat Vec.
fn probe_grid(view: &ViewState, screen: &Screen) -> Vec<IterationResult> {
    let coordinator = Coordinator::default();
    let mut results = Vec::with_capacity((screen.width * screen.height) as usize);
    for row in 0..screen.height {
        for col in 0..screen.width {
            results.push(coordinator.probe(view, screen, col as f64 + 0.5, row as f64 + 0.5));
        }
    }
    results
}

#[test]
fn headless_default_view_probe() {
    let screen = Screen::new(60, 40, 1.0);
    let results = probe_grid(&ViewState::default(), &screen);

    assert_eq!(results.len(), 60 * 40);

    // The default view contains both escaped and bounded points.
    let escaped = results.iter().filter(|r| r.escaped()).count();
    let bounded = results.len() - escaped;
    assert!(escaped > 0, "should have some escaped points");
    assert!(bounded > 0, "should have some bounded points");

    // Bounded points report the full budget.
    let budget = mandelzoom_core::IterationPolicy::HOST_PROBE.max_iterations(1.0);
    assert!(results
        .iter()
        .filter(|r| !r.escaped())
        .all(|r| r.count() == budget));
}

#[test]
fn headless_probe_is_deterministic() {
    let screen = Screen::new(40, 30, 1.0);
    let view = ViewState::default();
    assert_eq!(probe_grid(&view, &screen), probe_grid(&view, &screen));
}

#[test]
fn pan_on_800_high_screen() {
    let mut session = Session::new(ViewState::default(), Screen::new(1200, 800, 1.0));
    session.handle(ViewEvent::Pan { dx: 100.0, dy: 0.0 });
    let delta = session.view().center.re - HostReal::from_native(-0.75);
    assert!((delta.to_f64() - (-0.5)).abs() < 1e-12);
}

#[test]
fn keyboard_round_trip_returns_home() {
    let mut session = Session::new(ViewState::default(), Screen::default());
    for dir in [
        NudgeDirection::Left,
        NudgeDirection::Up,
        NudgeDirection::Right,
        NudgeDirection::Down,
    ] {
        session.handle(ViewEvent::Nudge(dir));
    }
    let (re, im) = session.view().center.to_f64();
    assert!((re + 0.75).abs() < 1e-15);
    assert!(im.abs() < 1e-15);
}

#[test]
fn deep_session_survives_share_round_trip() {
    let screen = Screen::new(1920, 1080, 2.0);
    let mut session = Session::new(ViewState::default(), screen);

    // Zoom deep into the seahorse valley with the wheel.
    session.handle(ViewEvent::SetPalette(PaletteId::ElectricBlue));
    for _ in 0..350 {
        session.wheel(1000.0, 530.0, 1.0);
    }
    session.contact_down(7, 900.0, 500.0);
    session.contact_moved(7, 880.0, 510.0);
    session.contact_up(7);

    let view = *session.view();
    assert!(view.zoom > 1e14);

    let text = share::encode(&view);
    let restored = share::decode(&text, ViewState::default());
    assert_eq!(restored, view);

    // Probes on the restored view agree with the live one.
    let c = Coordinator::default();
    assert_eq!(
        c.probe(&view, &screen, 960.0, 540.0),
        c.probe(&restored, &screen, 960.0, 540.0)
    );
}

#[test]
fn tiers_produce_consistent_frame_params() {
    let view = ViewState::new(
        HostComplex::from_f64(-0.1011, 0.9563),
        250.0,
        PaletteId::Radioactive,
    )
    .unwrap();
    let screen = Screen::new(320, 200, 1.0);
    let c = Coordinator::default();
    let partial = c.frame_params(&view, &screen, PrecisionTier::Partial).unwrap();
    let rigorous = c.frame_params(&view, &screen, PrecisionTier::Rigorous).unwrap();

    assert_eq!(partial.center_re, rigorous.center_re);
    assert_eq!(partial.center_im, rigorous.center_im);
    assert_eq!(partial.max_iterations, rigorous.max_iterations);
    assert_eq!(partial.scale.as_pair()[0], rigorous.scale.as_pair()[0]);
    assert_eq!(partial.palette, PaletteId::Radioactive);
}

#[test]
fn reset_after_anything() {
    let mut session = Session::new(ViewState::default(), Screen::default());
    session.handle(ViewEvent::SetPalette(PaletteId::Matrix));
    session.wheel(10.0, 10.0, 40.0);
    session.handle(ViewEvent::Pan { dx: -37.0, dy: 12.5 });
    session.handle(ViewEvent::Reset);
    assert_eq!(
        *session.view(),
        ViewState {
            palette: PaletteId::Matrix,
            ..ViewState::default()
        }
    );
}
