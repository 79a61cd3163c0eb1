//! # Controller Benchmark
//!
//! The controller runs inside a fixed period cycle, so one tick has to stay
//! far below the cycle period.

use std::convert::TryFrom;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bot_lib::pid::{ClosedLoopController, ControllerParams, ControllerSettings, ErrorKind};

fn controller_benchmark(c: &mut Criterion) {
    let settings = ControllerSettings::try_from(ControllerParams {
        k_p: 10.0,
        k_i: 0.1,
        k_d: 3.0,
        integral_band: 3.0,
        small_error: 1.0,
        small_error_timeout_ms: 100.0,
        large_error: 3.0,
        large_error_timeout_ms: 500.0,
        max_slew: 5.0,
    })
    .unwrap();

    let mut linear = ClosedLoopController::new(settings, ErrorKind::Linear);
    linear.set_target(24.0);

    c.bench_function("linear tick", |b| {
        let mut current = 0.0;
        b.iter(|| {
            let out = linear.compute(black_box(current), black_box(20.0));
            current = (current + 0.01) % 30.0;
            out
        })
    });

    let mut angular = ClosedLoopController::new(settings, ErrorKind::Angular);
    angular.set_target(179.0);

    c.bench_function("angular tick", |b| {
        let mut heading = -180.0;
        b.iter(|| {
            let out = angular.compute(black_box(heading), black_box(20.0));
            heading = util::maths::wrap_deg(heading + 0.5);
            out
        })
    });
}

criterion_group!(benches, controller_benchmark);
criterion_main!(benches);
