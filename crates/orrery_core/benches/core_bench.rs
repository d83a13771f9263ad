use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use orrery_core::SpaceTimeCore;
use orrery_ephemeris::AnalyticProvider;
use orrery_frames::{HELIOCENTRIC_ECLIPTIC_J2000, ReferenceFrameInfo};
use orrery_time::{J2000_JD, TimeAuthority};

fn core() -> SpaceTimeCore {
    let time = Rc::new(TimeAuthority::new(J2000_JD).expect("valid epoch"));
    let mut core = SpaceTimeCore::new(HELIOCENTRIC_ECLIPTIC_J2000);
    core.initialize(time, ReferenceFrameInfo::heliocentric_ecliptic_j2000())
        .expect("initialize core");
    core.register_ephemeris_provider(Box::new(AnalyticProvider::new()))
        .expect("register provider");
    core
}

fn core_query_bench(c: &mut Criterion) {
    let core = core();
    let bodies = [
        "sun", "mercury", "venus", "earth", "moon", "mars", "jupiter", "saturn", "uranus",
        "neptune", "pluto",
    ];
    let jd = 2_460_000.5;

    let mut group = c.benchmark_group("core");
    group.bench_function("get_body_state_moon", |b| {
        b.iter(|| core.get_body_state(black_box("moon"), black_box(jd)))
    });
    group.bench_function("get_bodies_state_all", |b| {
        b.iter(|| core.get_bodies_state(black_box(&bodies), black_box(jd)))
    });
    group.finish();
}

criterion_group!(benches, core_query_bench);
criterion_main!(benches);
