//! Every random draw in the crate flows through here: an explicit, seedable
//! generator bound to a table of event probabilities. Drivers and tests pick
//! the binding; nothing reaches for a global RNG.

use core::cmp::min;
use rand::RngCore;
use std::{
    fs::File,
    io::{self, Read},
};

/// Chance-gated events across the game and the genetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanceEvent {
    /// Outer gate for stamping any block run on a qualifying tick.
    SpawnBlock,
    /// A 3-wide run, tried first.
    SpawnTriple,
    /// A 2-wide run, tried when the triple roll fails.
    SpawnDouble,
    /// During crossover, keep the receiver's bias instead of the donor's.
    InheritBias,
    /// Scale one neuron bias during mutation.
    MutateBias,
    /// Scale one connection weight during mutation.
    MutateWeight,
}

pub const fn percent(x: u64) -> u64 {
    x * (u64::MAX / 100)
}

pub trait Probabilities {
    type Update;
    fn probability(&self, evt: ChanceEvent) -> u64;
    fn update(&mut self, stats: Self::Update);
}

pub trait Happens: RngCore + Probabilities {
    fn happens(&mut self, evt: ChanceEvent) -> bool;
}

impl<T: RngCore + Probabilities> Happens for T {
    fn happens(&mut self, evt: ChanceEvent) -> bool {
        self.probability(evt) > self.next_u64()
    }
}

/// Fixed probability table. Defaults mirror the production tuning; tests
/// override single events to force or forbid them.
pub struct ProbStatic {
    spawn_block: u64,
    spawn_triple: u64,
    spawn_double: u64,
    inherit_bias: u64,
    mutate_bias: u64,
    mutate_weight: u64,
}

impl ProbStatic {
    pub fn with_overrides(mut self, updates: &[(ChanceEvent, u64)]) -> Self {
        for update in updates {
            self.update(*update);
        }
        self
    }
}

impl Default for ProbStatic {
    fn default() -> Self {
        Self {
            spawn_block: percent(90),
            spawn_triple: percent(15),
            spawn_double: percent(35),
            inherit_bias: percent(50),
            mutate_bias: percent(20),
            mutate_weight: percent(20),
        }
    }
}

impl Probabilities for ProbStatic {
    type Update = (ChanceEvent, u64);

    fn probability(&self, evt: ChanceEvent) -> u64 {
        match evt {
            ChanceEvent::SpawnBlock => self.spawn_block,
            ChanceEvent::SpawnTriple => self.spawn_triple,
            ChanceEvent::SpawnDouble => self.spawn_double,
            ChanceEvent::InheritBias => self.inherit_bias,
            ChanceEvent::MutateBias => self.mutate_bias,
            ChanceEvent::MutateWeight => self.mutate_weight,
        }
    }

    fn update(&mut self, (evt, v): Self::Update) {
        match evt {
            ChanceEvent::SpawnBlock => self.spawn_block = v,
            ChanceEvent::SpawnTriple => self.spawn_triple = v,
            ChanceEvent::SpawnDouble => self.spawn_double = v,
            ChanceEvent::InheritBias => self.inherit_bias = v,
            ChanceEvent::MutateBias => self.mutate_bias = v,
            ChanceEvent::MutateWeight => self.mutate_weight = v,
        }
    }
}

pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let mut idx = 0;
        while idx < dst.len() {
            let lim = min(8, dst.len() - idx);
            dst[idx..idx + lim].copy_from_slice(&self.next_u64().to_ne_bytes()[..lim]);
            idx += lim;
        }
    }
}

/// A probability table bound to the generator that rolls against it.
pub struct ProbBinding<P: Probabilities, R: RngCore> {
    p: P,
    r: R,
}

impl<P: Probabilities, R: RngCore> ProbBinding<P, R> {
    pub fn new(p: P, r: R) -> Self {
        Self { p, r }
    }

    #[allow(clippy::should_implement_trait)] // type signature is incompatible with trait Default
    pub fn default() -> ProbBinding<impl Probabilities, impl RngCore> {
        ProbBinding {
            p: ProbStatic::default(),
            r: default_rng(),
        }
    }
}

impl<P: Probabilities, R: RngCore> Probabilities for ProbBinding<P, R> {
    type Update = P::Update;

    fn probability(&self, evt: ChanceEvent) -> u64 {
        self.p.probability(evt)
    }

    fn update(&mut self, stats: Self::Update) {
        self.p.update(stats);
    }
}

impl<P: Probabilities, R: RngCore> RngCore for ProbBinding<P, R> {
    fn next_u32(&mut self) -> u32 {
        self.r.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.r.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.r.fill_bytes(dest)
    }
}

pub fn seed_urandom() -> io::Result<u64> {
    let mut file = File::open("/dev/urandom")?;
    let mut buffer = [0u8; 8];
    file.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

pub fn default_rng() -> impl RngCore {
    WyRng::seeded(seed_urandom().unwrap())
}
