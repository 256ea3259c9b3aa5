use criterion::{criterion_group, criterion_main, Criterion};

use mandelzoom_core::{Coordinator, HostComplex, PaletteId, PrecisionTier, Screen, ViewState};
use mandelzoom_render::{render_export, render_frame, ExportFormat, ExportRequest};

fn bench_full_frame_render(c: &mut Criterion) {
    let screen = Screen::new(640, 480, 1.0);
    let coordinator = Coordinator::default();
    for tier in [PrecisionTier::Partial, PrecisionTier::Rigorous] {
        let params = coordinator
            .frame_params(&ViewState::default(), &screen, tier)
            .unwrap();
        c.bench_function(&format!("full_frame_640x480_{}", tier.label()), |b| {
            b.iter(|| render_frame(&params));
        });
    }
}

fn bench_deep_view(c: &mut Criterion) {
    let view = ViewState::new(
        HostComplex::from_f64(-0.743643887037151, 0.131825904205330),
        1e10,
        PaletteId::default(),
    )
    .unwrap();
    let params = Coordinator::default()
        .frame_params(&view, &Screen::new(256, 256, 1.0), PrecisionTier::Rigorous)
        .unwrap();

    c.bench_function("deep_256x256_rigorous", |b| {
        b.iter(|| render_frame(&params));
    });
}

fn bench_export(c: &mut Criterion) {
    let request = ExportRequest {
        view: ViewState::default(),
        screen: Screen::new(160, 100, 1.0),
        tier: PrecisionTier::Partial,
        scale: 4,
        format: ExportFormat::default(),
    };

    c.bench_function("export_render_640x400", |b| {
        b.iter(|| render_export(&request));
    });
}

criterion_group!(benches, bench_full_frame_render, bench_deep_view, bench_export);
criterion_main!(benches);
