use skiff::random::{seed_urandom, ProbBinding, ProbStatic, WyRng};
use skiff::{Population, Trainer};
use tracing::info;

const WIDTH: usize = 12;
const HEIGHT: usize = 10;
const POPULATION: usize = 10;
const WINNERS: usize = 3;
const GENERATIONS: u64 = 500;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut rng = ProbBinding::new(ProbStatic::default(), WyRng::seeded(seed_urandom().unwrap()));
    let trainer = Trainer::new(WIDTH, HEIGHT);
    let mut population = Population::new(POPULATION, WINNERS);
    let mut agents = population.first_generation(&mut rng);
    let mut best = 0;

    for _ in 0..GENERATIONS {
        let records = trainer.run_generation(&agents, &mut rng);
        let round_best = records.iter().map(|r| r.score).max().unwrap_or(0);
        best = best.max(round_best);
        info!(
            generation = population.generation(),
            round_best, best, "generation complete"
        );
        agents = population
            .next_generation(records, &mut rng)
            .expect("trainer returns one record per pilot");
    }

    info!(best, "training finished");
}
