//! # AV Control Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use av_lib::{
    av_ctrl::{AvCtrl, InputData, Params},
    exec::AvExec,
    sim::{SimParams, SimPlatform},
    startup_seq::StartupParams,
};
use comms_if::eqpt::LineSensData;
use util::module::State;

fn av_ctrl_benchmark(c: &mut Criterion) {
    // ---- Single controller tick ----

    let mut ctrl = AvCtrl::new(Params::default()).unwrap();

    // Cycle through every position and the headway bands
    let lines = [
        LineSensData::new(true, true),
        LineSensData::new(true, false),
        LineSensData::new(false, true),
        LineSensData::new(false, false),
    ];
    let headways = [100.0, 20.0, 10.0, 5.0];
    let mut i = 0usize;

    c.bench_function("av_ctrl_proc", |b| {
        b.iter(|| {
            let input = InputData {
                line: lines[i % lines.len()],
                headway_cm: headways[(i / lines.len()) % headways.len()],
                dt_s: 0.02,
            };
            i = i.wrapping_add(1);
            black_box(ctrl.proc(black_box(&input)))
        })
    });

    // ---- Full exec step against the simulation ----

    let mut exec = AvExec::new(
        SimPlatform::new(SimParams::default()),
        AvCtrl::new(Params::default()).unwrap(),
        StartupParams { enabled: false, ..StartupParams::default() }
    );

    c.bench_function("av_exec_step_sim", |b| {
        b.iter(|| {
            let r = exec.step();
            exec.platform_mut().advance(0.02);
            black_box(r)
        })
    });
}

criterion_group!(benches, av_ctrl_benchmark);
criterion_main!(benches);
