//! Operator search for calibration equations.
//!
//! Operators are evaluated strictly left to right. Assignments are enumerated
//! by counting an index in base N (N = number of operators): digit `i` of the
//! index, least significant first, picks the operator for slot `i`.

use std::fmt::Write as _;

use strum::{Display, VariantArray};
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, VariantArray)]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "*")]
    Mul,
}

impl Operator {
    /// `None` on overflow
    pub fn apply(self, lhs: u64, rhs: u64) -> Option<u64> {
        match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Mul => lhs.checked_mul(rhs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    pub target: u64,
    pub operands: Vec<u64>,
}

impl Equation {
    /// Parse `target: a b c`.
    pub fn parse(text: &str, line: usize) -> Result<Self> {
        let (target, rest) = text
            .split_once(':')
            .ok_or_else(|| Error::format(line, "equation is missing ':'"))?;
        let number = |token: &str| {
            token
                .trim()
                .parse::<u64>()
                .map_err(|_| Error::format(line, format!("invalid number {:?}", token)))
        };

        let target = number(target)?;
        let operands = rest
            .split_whitespace()
            .map(number)
            .collect::<Result<Vec<_>>>()?;
        if operands.is_empty() {
            return Err(Error::format(line, "equation has no operands"));
        }

        Ok(Self { target, operands })
    }

    /// Left-to-right value under `operators`, or `None` on overflow or a
    /// length mismatch.
    pub fn evaluate(&self, operators: &[Operator]) -> Option<u64> {
        if operators.len() + 1 != self.operands.len() {
            return None;
        }
        let (&first, rest) = self.operands.split_first()?;
        rest.iter()
            .zip(operators)
            .try_fold(first, |acc, (&rhs, op)| op.apply(acc, rhs))
    }

    /// First assignment (in counting order) that hits the target.
    ///
    /// Fails with [`Error::SearchSpace`] when the number of assignments does
    /// not fit in a `u64`.
    pub fn solve(&self, operators: &[Operator]) -> Result<Option<Vec<Operator>>> {
        let Some(slots) = self.operands.len().checked_sub(1) else {
            return Ok(None);
        };
        if slots > 0 && operators.is_empty() {
            return Ok(None);
        }

        let radix = operators.len().max(1) as u64;
        let combinations = u32::try_from(slots)
            .ok()
            .and_then(|slots| radix.checked_pow(slots))
            .ok_or(Error::SearchSpace {
                target: self.target,
                slots,
            })?;

        let found = (0..combinations)
            .map(|index| {
                (0..slots)
                    .scan(index, |rest, _| {
                        let digit = *rest % radix;
                        *rest /= radix;
                        Some(operators[digit as usize])
                    })
                    .collect::<Vec<_>>()
            })
            .find(|assignment| self.evaluate(assignment) == Some(self.target));
        Ok(found)
    }

    /// `target = a op b op c`
    pub fn render(&self, operators: &[Operator]) -> String {
        let mut out = format!("{} =", self.target);
        let mut ops = operators.iter();
        for (index, operand) in self.operands.iter().enumerate() {
            if index > 0 {
                if let Some(op) = ops.next() {
                    let _ = write!(out, " {}", op);
                }
            }
            let _ = write!(out, " {}", operand);
        }
        out
    }
}

pub fn parse_equations<I, S>(lines: I) -> Result<Vec<Equation>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let equations = lines
        .into_iter()
        .enumerate()
        .filter(|(_, line)| !line.as_ref().trim().is_empty())
        .map(|(index, line)| Equation::parse(line.as_ref(), index + 1))
        .collect::<Result<Vec<_>>>()?;
    if equations.is_empty() {
        return Err(Error::format(1, "no equations"));
    }
    Ok(equations)
}

/// Sum of the targets of all solvable equations.
pub fn total_calibration(equations: &[Equation], operators: &[Operator]) -> Result<u64> {
    let mut total = 0u64;
    for equation in equations {
        match equation.solve(operators)? {
            Some(solution) => {
                debug!("solved {}", equation.render(&solution));
                total = total.saturating_add(equation.target);
            }
            None => debug!("no solution for {:?}", equation),
        }
    }
    info!("total calibration {}", total);
    Ok(total)
}
