//! Random, valid test cases.

use std::fmt::{self, Display};
use std::str::FromStr;

use log::debug;
use scheduler::ProcessSpec;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("invalid bounds {0:?}, expected `LOWER-UPPER` with non-negative integers")]
    Format(String),
    #[error("lower bound {lower} is greater than upper bound {upper}")]
    Inverted { lower: u32, upper: u32 },
    #[error("burst times must be positive, lower bound is 0")]
    ZeroBurst,
    #[error("the number of processes must be positive")]
    NoProcesses,
}

/// Inclusive bounds for a generated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lower: u32,
    pub upper: u32,
}

impl Bounds {
    pub fn new(lower: u32, upper: u32) -> Result<Bounds, GenerateError> {
        if lower > upper {
            return Err(GenerateError::Inverted { lower, upper });
        }
        Ok(Bounds { lower, upper })
    }
}

impl FromStr for Bounds {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = || GenerateError::Format(s.to_string());
        let (lower, upper) = s.split_once('-').ok_or_else(format)?;
        let lower = lower.trim().parse().map_err(|_| format())?;
        let upper = upper.trim().parse().map_err(|_| format())?;
        Bounds::new(lower, upper)
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

/// Simple xorshift32 PRNG, deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// A value in `bounds`, both ends included.
    pub fn range(&mut self, bounds: Bounds) -> u32 {
        let span = u64::from(bounds.upper - bounds.lower) + 1;
        bounds.lower + (u64::from(self.next_u32()) % span) as u32
    }
}

/// Generates `count` processes with pids `1..=count`.
pub fn generate(
    count: usize,
    arrival: Bounds,
    burst: Bounds,
    seed: u32,
) -> Result<Vec<ProcessSpec>, GenerateError> {
    if count == 0 {
        return Err(GenerateError::NoProcesses);
    }
    if burst.lower == 0 {
        return Err(GenerateError::ZeroBurst);
    }

    debug!(
        "generating {} processes, arrival {}, burst {}, seed {}",
        count, arrival, burst, seed
    );

    let mut rng = Rng::new(seed);
    let arrivals = (0..count).map(|_| rng.range(arrival)).collect::<Vec<_>>();
    let bursts = (0..count).map(|_| rng.range(burst)).collect::<Vec<_>>();

    Ok(arrivals
        .into_iter()
        .zip(bursts)
        .zip(1..)
        .map(|((arrival_time, burst_time), pid)| {
            ProcessSpec::new(pid, i64::from(arrival_time), i64::from(burst_time))
        })
        .collect())
}
