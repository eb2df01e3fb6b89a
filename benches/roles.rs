use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};

use rolegate::{privilege, ClusterConfig, PrivilegeSpec, RoleSpec, RoleStore};

fn gen_specs(n: usize, seed: u64) -> Vec<PrivilegeSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            if rng.gen_bool(0.3) { PrivilegeSpec::new(rng.gen_range(0..5)) } else { PrivilegeSpec::scoped(rng.gen_range(10..15), "test", "demo") }
        })
        .collect()
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("privilege_validate");
    for &n in &[8usize, 64, 512] {
        let specs = gen_specs(n, 0xBEEF_CAFE);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("validate_all", n), &specs, |b, specs| {
            b.iter(|| criterion::black_box(privilege::validate_all(specs).is_ok()));
        });
    }
    group.finish();
}

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("role_store");
    let n = 10_000usize;
    let specs = gen_specs(4, 0xDEAD_BEEF);
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function(BenchmarkId::new("create", n), |b| {
        b.iter(|| {
            let store = RoleStore::new(ClusterConfig { propagation_delay_ms: 0, ..Default::default() });
            for i in 0..n {
                let _ = store.create(&RoleSpec::new(&format!("role-{i}"), specs.clone()));
            }
            criterion::black_box(store.pending());
        });
    });

    let store = RoleStore::new(ClusterConfig { propagation_delay_ms: 0, ..Default::default() });
    for i in 0..n {
        let _ = store.create(&RoleSpec::new(&format!("role-{i}"), specs.clone()));
    }
    group.bench_function(BenchmarkId::new("get", n), |b| {
        b.iter(|| {
            for i in (0..n).step_by(7) {
                criterion::black_box(store.get(&format!("role-{i}")).is_ok());
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_validate, bench_store);
criterion_main!(benches);
