use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pkgpref_config::PackagesConfig;
use pkgpref_core::{Category, PreferenceContext};
use pkgpref_spec::{Spec, VersionList};

const CONFIG: &str = r#"
packages:
  all:
    compiler: [clang, "gcc@5:"]
  zlib:
    version: ["1.2.8", "1.2.9:1.2.11", "1.3:"]
"#;

fn context() -> PreferenceContext {
    PreferenceContext::new(PackagesConfig::from_yaml_str(CONFIG, "bench").unwrap())
}

fn candidates() -> Vec<Spec> {
    let mut specs = Vec::new();
    for patch in 0..12 {
        for compiler in ["gcc@4.9", "gcc@5.4", "clang@3.8"] {
            let input = format!("zlib@1.2.{patch} %{compiler} arch=linux-rhel7-x86_64");
            specs.push(Spec::parse(&input).unwrap());
        }
    }
    specs
}

fn rank_benchmark(c: &mut Criterion) {
    let context = context();
    let index = context.index("zlib", Category::Version, None).unwrap();
    let version = VersionList::parse("1.2.10").unwrap();

    c.bench_function("PreferenceIndex::rank", |b| {
        b.iter(|| index.rank(black_box(&version)))
    });
}

fn sort_benchmark(c: &mut Criterion) {
    let context = context();
    let cmp = context.comparator();
    let specs = candidates();

    // Warm the cache so the benchmark measures comparisons only.
    let mut warm = specs.clone();
    cmp.sort_specs(&mut warm).unwrap();

    c.bench_function("Comparator::sort_specs (36 specs)", |b| {
        b.iter(|| {
            let mut specs = specs.clone();
            cmp.sort_specs(black_box(&mut specs)).unwrap();
        })
    });

    c.bench_function("Comparator::compare_specs", |b| {
        b.iter(|| cmp.compare_specs(black_box(&specs[0]), black_box(&specs[35])).unwrap())
    });
}

criterion_group!(benches, rank_benchmark, sort_benchmark);
criterion_main!(benches);
