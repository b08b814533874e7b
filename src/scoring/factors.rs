use anyhow::{bail, Context, Result};
use std::fmt;

/// Range expression matched against an integer such as a follower count.
///
/// Accepted forms: `<N`, `<=N`, `>N`, `>=N`, `N` and the inclusive `N-M`.
/// Numbers may use `_` or `,` as digit separators (`10,000-100,000`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeOp {
    LessThan(u64),
    LessEqual(u64),
    GreaterThan(u64),
    GreaterEqual(u64),
    Equal(u64),
    Between(u64, u64),
}

fn parse_count(s: &str) -> Result<u64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != '_' && *c != ',').collect();
    cleaned
        .parse()
        .with_context(|| format!("not a whole number: '{}'", s.trim()))
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            bail!("empty range");
        }
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(parse_count(val)?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(parse_count(val)?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(parse_count(val)?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(parse_count(val)?))
        } else if let Some((low, high)) = s.split_once('-') {
            if low.trim().is_empty() {
                bail!("negative values are not valid ranges: {}", s);
            }
            let low = parse_count(low)?;
            let high = parse_count(high)?;
            if low > high {
                bail!("range lower bound {} exceeds upper bound {}", low, high);
            }
            Ok(RangeOp::Between(low, high))
        } else {
            Ok(RangeOp::Equal(parse_count(s)?))
        }
    }

    pub fn matches(&self, value: u64) -> bool {
        match *self {
            RangeOp::LessThan(n) => value < n,
            RangeOp::LessEqual(n) => value <= n,
            RangeOp::GreaterThan(n) => value > n,
            RangeOp::GreaterEqual(n) => value >= n,
            RangeOp::Equal(n) => value == n,
            RangeOp::Between(low, high) => (low..=high).contains(&value),
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::LessThan(n) => write!(f, "<{}", n),
            RangeOp::LessEqual(n) => write!(f, "<={}", n),
            RangeOp::GreaterThan(n) => write!(f, ">{}", n),
            RangeOp::GreaterEqual(n) => write!(f, ">={}", n),
            RangeOp::Equal(n) => write!(f, "{}", n),
            RangeOp::Between(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

/// Score adjustment: `+N` adds points (negative via `+-N`), `xN` scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Add(f64),
    Multiply(f64),
}

impl Effect {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (ctor, val): (fn(f64) -> Effect, &str) = if let Some(val) = s.strip_prefix('+') {
            (Effect::Add, val)
        } else if let Some(val) = s.strip_prefix('x') {
            (Effect::Multiply, val)
        } else {
            bail!("effect must start with + or x: {}", s)
        };
        let n: f64 = val
            .trim()
            .parse()
            .with_context(|| format!("invalid number in effect '{}'", s))?;
        if !n.is_finite() {
            bail!("effect value must be finite: {}", s);
        }
        Ok(ctor(n))
    }

    pub fn apply(&self, score: f64) -> f64 {
        match *self {
            Effect::Add(n) => score + n,
            Effect::Multiply(n) => score * n,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Add(n) if *n < 0.0 => write!(f, "+{}", n),
            Effect::Add(n) => write!(f, "{:+}", n),
            Effect::Multiply(n) => write!(f, "x{}", n),
        }
    }
}
