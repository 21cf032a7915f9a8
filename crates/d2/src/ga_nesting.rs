//! Genetic search over placement order and rotation.
//!
//! A chromosome is a permutation over placement slots plus one rotation
//! gene per slot. Fitness is the number of parts the sequenced
//! bottom-left-fill placer commits when fed the chromosome's rotation
//! sequence; the search therefore optimises the rotation schedule that the
//! deterministic placer executes.

use crate::blf::BlfPlacer;
use crate::design::Design;
use rand::prelude::*;
use rand::rngs::StdRng;
use sheetnest_core::{
    CancelFlag, Config, GaProblem, GaRunner, Individual, Placement, ProgressCallback,
    ProgressInfo, Result,
};

/// Placement order and rotation genes.
///
/// Rotation genes are indices into the configured angle set; they travel
/// with their order value through crossover.
#[derive(Debug, Clone)]
pub struct NestingChromosome {
    /// Permutation over placement slots.
    pub order: Vec<usize>,
    /// Rotation index per slot.
    pub rotations: Vec<usize>,
    rotation_options: usize,
    fitness: f64,
    placed: usize,
}

impl NestingChromosome {
    /// Creates an identity-ordered chromosome.
    pub fn new(len: usize, rotation_options: usize) -> Self {
        Self {
            order: (0..len).collect(),
            rotations: vec![0; len],
            rotation_options: rotation_options.max(1),
            fitness: f64::NEG_INFINITY,
            placed: 0,
        }
    }

    /// Creates a chromosome with a Fisher-Yates shuffled order and uniform
    /// random rotation genes.
    pub fn random_with_options<R: Rng>(
        len: usize,
        rotation_options: usize,
        rng: &mut R,
    ) -> Self {
        let rotation_options = rotation_options.max(1);
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);

        let rotations = (0..len)
            .map(|_| rng.gen_range(0..rotation_options))
            .collect();

        Self {
            order,
            rotations,
            rotation_options,
            fitness: f64::NEG_INFINITY,
            placed: 0,
        }
    }

    /// Stores the evaluated fitness and placement count.
    pub fn set_fitness(&mut self, fitness: f64, placed: usize) {
        self.fitness = fitness;
        self.placed = placed;
    }

    /// Number of parts placed at the last evaluation.
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Order Crossover (OX): the segment `[i1, i2]` is copied from the
    /// first parent together with its rotation genes; the remaining slots
    /// are filled from the second parent starting after the segment,
    /// skipping already-present values, each bringing the rotation gene
    /// from its source position. Membership is tracked with a bit-set
    /// indexed by value.
    fn ox_child(first: &Self, second: &Self, i1: usize, i2: usize) -> Self {
        let n = first.order.len();
        let mut order = vec![usize::MAX; n];
        let mut rotations = vec![0usize; n];
        let mut used = vec![false; n];

        for i in i1..=i2 {
            order[i] = first.order[i];
            rotations[i] = first.rotations[i];
            used[first.order[i]] = true;
        }

        let mut source = (i2 + 1) % n;
        for offset in 0..n {
            let slot = (i2 + 1 + offset) % n;
            if order[slot] != usize::MAX {
                continue;
            }
            while used[second.order[source]] {
                source = (source + 1) % n;
            }
            order[slot] = second.order[source];
            rotations[slot] = second.rotations[source];
            used[second.order[source]] = true;
            source = (source + 1) % n;
        }

        Self {
            order,
            rotations,
            rotation_options: first.rotation_options,
            fitness: f64::NEG_INFINITY,
            placed: 0,
        }
    }
}

impl Individual for NestingChromosome {
    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn crossover_pair<R: Rng>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let n = self.order.len();
        if n < 2 {
            return (self.clone(), other.clone());
        }

        let (mut i1, mut i2) = (rng.gen_range(0..n), rng.gen_range(0..n));
        if i1 > i2 {
            std::mem::swap(&mut i1, &mut i2);
        }

        (
            Self::ox_child(self, other, i1, i2),
            Self::ox_child(other, self, i1, i2),
        )
    }

    fn mutate<R: Rng>(&mut self, rate: f64, rng: &mut R) {
        let n = self.order.len();
        if n >= 2 && rng.gen::<f64>() < rate {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            self.order.swap(i, j);
            self.rotations.swap(i, j);
            self.fitness = f64::NEG_INFINITY;
        }

        // Independent per-gene rotation replacement
        if self.rotation_options > 1 {
            for idx in 0..n {
                if rng.gen::<f64>() < rate {
                    self.rotations[idx] = rng.gen_range(0..self.rotation_options);
                    self.fitness = f64::NEG_INFINITY;
                }
            }
        }
    }
}

/// GA problem: sequenced BLF as the fitness evaluator.
pub struct NestingProblem<'a> {
    design: &'a Design,
    sheet_width: f64,
    sheet_height: f64,
    config: Config,
    angles: Vec<f64>,
    chromosome_len: usize,
    cancelled: CancelFlag,
}

impl<'a> NestingProblem<'a> {
    /// Creates the problem; chromosome length is the placer's cap for this
    /// design/sheet pairing.
    pub fn new(
        design: &'a Design,
        sheet_width: f64,
        sheet_height: f64,
        config: Config,
        cancelled: CancelFlag,
    ) -> Result<Self> {
        let probe = BlfPlacer::new(design, sheet_width, sheet_height, &config)?;
        let chromosome_len = probe.max_placements();

        let angles = if config.ga.rotation_angles.is_empty() {
            config.rotation_angles()
        } else {
            config.ga.rotation_angles.clone()
        };

        Ok(Self {
            design,
            sheet_width,
            sheet_height,
            config,
            angles,
            chromosome_len,
            cancelled,
        })
    }

    /// Chromosome length for this problem.
    pub fn chromosome_len(&self) -> usize {
        self.chromosome_len
    }

    /// Decodes a chromosome into a layout by running the sequenced placer.
    pub fn decode(&self, chromosome: &NestingChromosome) -> Result<(Vec<Placement>, usize)> {
        let mut placer = BlfPlacer::new(
            self.design,
            self.sheet_width,
            self.sheet_height,
            &self.config,
        )?;

        let genes: Vec<f64> = chromosome
            .rotations
            .iter()
            .map(|&idx| self.angles[idx % self.angles.len()])
            .collect();

        let count = placer.run_sequenced(&genes, &self.cancelled)?;
        Ok((placer.placements().to_vec(), count))
    }
}

impl GaProblem for NestingProblem<'_> {
    type Individual = NestingChromosome;

    fn evaluate(&self, individual: &mut Self::Individual) {
        match self.decode(individual) {
            Ok((_, placed)) => individual.set_fitness(placed as f64, placed),
            // Cancellation surfaces at the runner's next suspension point
            Err(_) => individual.set_fitness(0.0, 0),
        }
    }

    fn initialize_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Self::Individual> {
        (0..size)
            .map(|_| {
                NestingChromosome::random_with_options(
                    self.chromosome_len,
                    self.angles.len(),
                    rng,
                )
            })
            .collect()
    }

    fn on_generation(&self, generation: u32, best: &Self::Individual) {
        log::debug!(
            "generation {}: best fitness {:.1}, placed {}",
            generation,
            best.fitness(),
            best.placed()
        );
    }
}

/// Runs the genetic search and decodes the best-ever chromosome into the
/// returned layout.
pub fn run_ga_nesting(
    design: &Design,
    sheet_width: f64,
    sheet_height: f64,
    config: &Config,
    cancelled: &CancelFlag,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<Placement>> {
    let problem = NestingProblem::new(
        design,
        sheet_width,
        sheet_height,
        config.clone(),
        cancelled.clone(),
    )?;

    let runner = GaRunner::with_cancel_flag(config.ga.clone(), problem, cancelled.clone());

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mapped = progress.map(|callback| {
        move |ga_progress: sheetnest_core::GaProgress| {
            let percent = if ga_progress.generations > 0 {
                100.0 * ga_progress.generation as f64 / ga_progress.generations as f64
            } else {
                0.0
            };
            callback(
                ProgressInfo::new(percent, "genetic search")
                    .with_placed(ga_progress.best_fitness.max(0.0) as usize),
            );
        }
    });

    let ga_result = runner.run_with_rng_and_progress(&mut rng, mapped)?;

    let (placements, _) = runner.problem().decode(&ga_result.best)?;
    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ox_preserves_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let p1 = NestingChromosome::random_with_options(10, 4, &mut rng);
        let p2 = NestingChromosome::random_with_options(10, 4, &mut rng);

        let (c1, c2) = p1.crossover_pair(&p2, &mut rng);

        for child in [&c1, &c2] {
            let mut sorted = child.order.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..10).collect::<Vec<_>>());
            assert_eq!(child.rotations.len(), 10);
            assert!(child.rotations.iter().all(|&r| r < 4));
        }
    }

    #[test]
    fn test_ox_segment_keeps_rotation_genes() {
        // With identical cut points, the copied segment's rotations come
        // from the first parent.
        let mut p1 = NestingChromosome::new(6, 4);
        let mut p2 = NestingChromosome::new(6, 4);
        p1.rotations = vec![1, 1, 1, 1, 1, 1];
        p2.order = vec![5, 4, 3, 2, 1, 0];
        p2.rotations = vec![2, 2, 2, 2, 2, 2];

        let child = NestingChromosome::ox_child(&p1, &p2, 1, 3);
        assert_eq!(&child.rotations[1..=3], &[1, 1, 1]);
        assert_eq!(child.rotations[0], 2);
        assert_eq!(&child.order[1..=3], &[1, 2, 3]);
    }

    #[test]
    fn test_swap_mutation_keeps_pairing() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut chromosome = NestingChromosome::random_with_options(8, 4, &mut rng);
        let pairs: std::collections::HashMap<usize, usize> = chromosome
            .order
            .iter()
            .copied()
            .zip(chromosome.rotations.iter().copied())
            .collect();

        // Force the swap branch, suppress rotation replacement
        chromosome.rotation_options = 1;
        chromosome.mutate(1.0, &mut rng);

        let mut sorted = chromosome.order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..8).collect::<Vec<_>>());

        // Swapping order and rotation together keeps each pairing intact
        for (value, rotation) in chromosome
            .order
            .iter()
            .zip(chromosome.rotations.iter())
        {
            assert_eq!(pairs[value], *rotation);
        }
    }

    #[test]
    fn test_ga_nesting_places_parts() {
        let design = Design::rectangle("r", 25.0, 25.0);
        let config = Config::new()
            .with_margin(2.0)
            .with_seed(11)
            .with_ga(
                sheetnest_core::GaConfig::default()
                    .with_population_size(8)
                    .with_generations(4),
            );

        let placements = run_ga_nesting(
            &design,
            100.0,
            100.0,
            &config,
            &CancelFlag::new(),
            None,
        )
        .unwrap();

        assert!(placements.len() >= 4);
    }

    #[test]
    fn test_ga_nesting_seed_determinism() {
        let design = Design::l_shape("l", 20.0, 30.0, 10.0, 10.0);
        let config = Config::new()
            .with_margin(3.0)
            .with_seed(42)
            .with_ga(
                sheetnest_core::GaConfig::default()
                    .with_population_size(6)
                    .with_generations(3),
            );

        let run = || {
            run_ga_nesting(&design, 100.0, 100.0, &config, &CancelFlag::new(), None).unwrap()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_ga_nesting_cancellation() {
        let design = Design::rectangle("r", 25.0, 25.0);
        let config = Config::new().with_seed(1);
        let cancelled = CancelFlag::new();
        cancelled.cancel();

        let err = run_ga_nesting(&design, 100.0, 100.0, &config, &cancelled, None).unwrap_err();
        assert!(err.is_cancelled());
    }
}
