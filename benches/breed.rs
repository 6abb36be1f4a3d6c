use criterion::Criterion;
use skiff::random::{ProbBinding, ProbStatic, WyRng};
use skiff::{Agent, FitnessRecord, Population};

fn bench_breed(bench: &mut Criterion) {
    let mut rng = ProbBinding::new(ProbStatic::default(), WyRng::seeded(3));
    let mut population = Population::new(10, 3);
    let records: Vec<FitnessRecord> = (0..10)
        .map(|idx| FitnessRecord {
            agent: Agent::random(&mut rng),
            score: idx * 10,
            movements: idx,
        })
        .collect();

    bench.bench_function("next-generation", |b| {
        b.iter(|| population.next_generation(records.clone(), &mut rng).unwrap())
    });
}

pub fn benches() {
    let mut criterion: criterion::Criterion<_> = Criterion::default()
        .sample_size(1000)
        .significance_level(0.1);
    bench_breed(&mut criterion);
}

fn main() {
    benches();
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();
}
