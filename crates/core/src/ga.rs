//! Genetic algorithm framework.
//!
//! Domain-agnostic evolutionary loop: tournament selection, pairwise
//! crossover, mutation, elitism and best-ever tracking. The domain supplies
//! an [`Individual`] (chromosome with its own crossover/mutation operators)
//! and a [`GaProblem`] (fitness evaluation and population seeding).
//!
//! All stochastic choices are drawn from the RNG passed to
//! [`GaRunner::run_with_rng`], so a seeded run is fully reproducible.
//! Fitness evaluation is data-parallel (rayon) but deterministic: the
//! evaluator never touches the RNG and results keep their indices.

use crate::error::{Error, Result};
use crate::solver::CancelFlag;
use rand::prelude::*;
use rayon::prelude::*;
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the genetic algorithm.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaConfig {
    /// Population size.
    pub population_size: usize,
    /// Number of generations to run.
    pub generations: u32,
    /// Probability of applying crossover to a parent pair (0.0 - 1.0).
    pub crossover_rate: f64,
    /// Per-operator mutation probability (0.0 - 1.0).
    pub mutation_rate: f64,
    /// Number of elite individuals copied unchanged each generation.
    pub elite_count: usize,
    /// Tournament size for parent selection.
    pub tournament_size: usize,
    /// Allowed rotation angles in degrees.
    pub rotation_angles: Vec<f64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            generations: 50,
            crossover_rate: 0.80,
            mutation_rate: 0.10,
            elite_count: 2,
            tournament_size: 3,
            rotation_angles: vec![0.0, 90.0, 180.0, 270.0],
        }
    }
}

impl GaConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(2);
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: u32) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, count: usize) -> Self {
        self.elite_count = count;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size.max(1);
        self
    }

    /// Sets the allowed rotation angles in degrees.
    pub fn with_rotation_angles(mut self, angles: Vec<f64>) -> Self {
        self.rotation_angles = angles;
        self
    }
}

/// Trait for individuals in the genetic algorithm.
///
/// Crossover and mutation live on the individual itself; the runner only
/// decides when to apply them.
pub trait Individual: Clone + Send + Sync {
    /// Returns the cached fitness of this individual (higher is better).
    fn fitness(&self) -> f64;

    /// Performs crossover with another individual, producing two children.
    fn crossover_pair<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self);

    /// Mutates this individual in place. `rate` is the per-operator
    /// probability; the individual applies it to each of its operators.
    fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R);
}

/// Trait for problem-specific GA operations.
pub trait GaProblem: Send + Sync {
    /// The individual type for this problem.
    type Individual: Individual;

    /// Evaluates the fitness of an individual, caching it on the individual.
    fn evaluate(&self, individual: &mut Self::Individual);

    /// Evaluates multiple individuals in parallel.
    fn evaluate_parallel(&self, individuals: &mut [Self::Individual]) {
        individuals.par_iter_mut().for_each(|ind| {
            self.evaluate(ind);
        });
    }

    /// Creates the initial population.
    fn initialize_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Self::Individual>;

    /// Called after each generation (for logging/diagnostics).
    fn on_generation(&self, _generation: u32, _best: &Self::Individual) {}
}

/// Progress information during GA execution.
#[derive(Debug, Clone)]
pub struct GaProgress {
    /// Current generation number.
    pub generation: u32,
    /// Configured number of generations.
    pub generations: u32,
    /// Best fitness found so far.
    pub best_fitness: f64,
    /// Average fitness of the current population.
    pub avg_fitness: f64,
    /// Elapsed time since start.
    pub elapsed: Duration,
    /// Whether the algorithm is still running.
    pub running: bool,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found across all generations.
    pub best: I,
    /// Final generation reached.
    pub generations: u32,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Best fitness per generation.
    pub history: Vec<f64>,
}

/// Genetic algorithm runner.
pub struct GaRunner<P: GaProblem> {
    config: GaConfig,
    problem: P,
    cancelled: CancelFlag,
}

impl<P: GaProblem> GaRunner<P> {
    /// Creates a new GA runner.
    pub fn new(config: GaConfig, problem: P) -> Self {
        Self {
            config,
            problem,
            cancelled: CancelFlag::new(),
        }
    }

    /// Creates a runner observing an external cancellation flag.
    pub fn with_cancel_flag(config: GaConfig, problem: P, cancelled: CancelFlag) -> Self {
        Self {
            config,
            problem,
            cancelled,
        }
    }

    /// Returns a handle that cancels the run.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancelled.clone()
    }

    /// Returns the problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs the genetic algorithm with the given RNG.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<GaResult<P::Individual>> {
        self.run_with_rng_and_progress::<R, fn(GaProgress)>(rng, None)
    }

    /// Runs the genetic algorithm with the given RNG and an optional
    /// per-generation progress callback.
    ///
    /// The gap between generations (before offspring re-evaluation) is the
    /// suspension point: cancellation is observed there and raises
    /// [`Error::Cancelled`] without returning a partial result.
    pub fn run_with_rng_and_progress<R: Rng, F>(
        &self,
        rng: &mut R,
        progress: Option<F>,
    ) -> Result<GaResult<P::Individual>>
    where
        F: Fn(GaProgress),
    {
        let start = Instant::now();
        let mut history = Vec::new();

        let mut population = self
            .problem
            .initialize_population(self.config.population_size, rng);
        if population.is_empty() {
            return Err(Error::Internal("empty initial population".into()));
        }

        self.problem.evaluate_parallel(&mut population);
        sort_by_fitness(&mut population);

        let mut best = population[0].clone();

        for generation in 0..self.config.generations {
            self.cancelled.check()?;

            history.push(best.fitness());

            if let Some(ref callback) = progress {
                let avg = population.iter().map(|i| i.fitness()).sum::<f64>()
                    / population.len() as f64;
                callback(GaProgress {
                    generation,
                    generations: self.config.generations,
                    best_fitness: best.fitness(),
                    avg_fitness: avg,
                    elapsed: start.elapsed(),
                    running: true,
                });
            }

            // Elites carry their cached fitness unchanged.
            let elite_count = self.config.elite_count.min(population.len());
            let mut next: Vec<P::Individual> = population[..elite_count].to_vec();

            let mut offspring: Vec<P::Individual> =
                Vec::with_capacity(self.config.population_size - next.len());
            while next.len() + offspring.len() < self.config.population_size {
                let parent1 = self.tournament_select(&population, rng);
                let parent2 = self.tournament_select(&population, rng);

                let (mut child1, mut child2) = if rng.gen::<f64>() < self.config.crossover_rate {
                    parent1.crossover_pair(parent2, rng)
                } else {
                    (parent1.clone(), parent2.clone())
                };

                child1.mutate(self.config.mutation_rate, rng);
                child2.mutate(self.config.mutation_rate, rng);

                offspring.push(child1);
                if next.len() + offspring.len() < self.config.population_size {
                    offspring.push(child2);
                }
            }

            // Only offspring are re-evaluated.
            self.problem.evaluate_parallel(&mut offspring);
            next.extend(offspring);
            sort_by_fitness(&mut next);

            if next[0].fitness() > best.fitness() {
                best = next[0].clone();
            }

            self.problem.on_generation(generation, &best);
            population = next;
        }

        history.push(best.fitness());

        if let Some(ref callback) = progress {
            let avg =
                population.iter().map(|i| i.fitness()).sum::<f64>() / population.len() as f64;
            callback(GaProgress {
                generation: self.config.generations,
                generations: self.config.generations,
                best_fitness: best.fitness(),
                avg_fitness: avg,
                elapsed: start.elapsed(),
                running: false,
            });
        }

        Ok(GaResult {
            best,
            generations: self.config.generations,
            elapsed: start.elapsed(),
            history,
        })
    }

    /// Tournament selection: best fitness among `tournament_size` draws.
    fn tournament_select<'a, R: Rng>(
        &self,
        population: &'a [P::Individual],
        rng: &mut R,
    ) -> &'a P::Individual {
        let mut best_idx = rng.gen_range(0..population.len());
        for _ in 1..self.config.tournament_size {
            let idx = rng.gen_range(0..population.len());
            if population[idx].fitness() > population[best_idx].fitness() {
                best_idx = idx;
            }
        }
        &population[best_idx]
    }
}

fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| {
        b.fitness()
            .partial_cmp(&a.fitness())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[derive(Clone, Debug)]
    struct ValueIndividual {
        value: f64,
        fitness: f64,
    }

    impl Individual for ValueIndividual {
        fn fitness(&self) -> f64 {
            self.fitness
        }

        fn crossover_pair<R: Rng>(&self, other: &Self, _rng: &mut R) -> (Self, Self) {
            let mid = (self.value + other.value) / 2.0;
            (
                Self {
                    value: mid,
                    fitness: f64::NEG_INFINITY,
                },
                Self {
                    value: mid,
                    fitness: f64::NEG_INFINITY,
                },
            )
        }

        fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) {
            if rng.gen::<f64>() < rate {
                self.value += rng.gen_range(-1.0..1.0);
                self.fitness = f64::NEG_INFINITY;
            }
        }
    }

    struct MaximizeNegSquare;

    impl GaProblem for MaximizeNegSquare {
        type Individual = ValueIndividual;

        fn evaluate(&self, individual: &mut Self::Individual) {
            individual.fitness = -(individual.value * individual.value);
        }

        fn initialize_population<R: Rng>(
            &self,
            size: usize,
            rng: &mut R,
        ) -> Vec<Self::Individual> {
            (0..size)
                .map(|_| ValueIndividual {
                    value: rng.gen_range(-100.0..100.0),
                    fitness: f64::NEG_INFINITY,
                })
                .collect()
        }
    }

    #[test]
    fn test_ga_converges() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_generations(60)
            .with_mutation_rate(0.3);

        let runner = GaRunner::new(config, MaximizeNegSquare);
        let mut rng = StdRng::seed_from_u64(7);
        let result = runner.run_with_rng(&mut rng).unwrap();

        assert!(result.best.value.abs() < 10.0);
        assert_eq!(result.generations, 60);
        assert_eq!(result.history.len(), 61);
    }

    #[test]
    fn test_ga_seed_determinism() {
        let run = |seed: u64| {
            let runner = GaRunner::new(GaConfig::default(), MaximizeNegSquare);
            let mut rng = StdRng::seed_from_u64(seed);
            runner.run_with_rng(&mut rng).unwrap().best.value
        };

        assert_eq!(run(42).to_bits(), run(42).to_bits());
    }

    #[test]
    fn test_ga_cancellation() {
        let runner = GaRunner::new(
            GaConfig::default().with_generations(1000),
            MaximizeNegSquare,
        );
        runner.cancel_flag().cancel();

        let mut rng = StdRng::seed_from_u64(0);
        let err = runner.run_with_rng(&mut rng).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_elites_keep_fitness() {
        // The best individual's fitness can never regress across generations.
        let runner = GaRunner::new(
            GaConfig::default().with_generations(20),
            MaximizeNegSquare,
        );
        let mut rng = StdRng::seed_from_u64(3);
        let result = runner.run_with_rng(&mut rng).unwrap();

        for window in result.history.windows(2) {
            assert!(window[1] >= window[0]);
        }
    }
}
