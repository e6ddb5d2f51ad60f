//! Arithmetic operation registry.
//!
//! The six supported operations form a closed enum. Each variant maps to a
//! pure decimal function, so looking an operation up by name happens exactly
//! once, at the edge, through [`FromStr`].

use super::error::OperationError;
use rust_decimal::prelude::{MathematicalOps, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rounding applied when checking whether an integer root is exact.
const EXACT_ROOT_DP: u32 = 16;

/// Upper bound on Newton refinement steps for integer roots.
const NEWTON_MAX_STEPS: usize = 64;

/// A binary arithmetic operation over decimals.
///
/// # Example
///
/// ```rust
/// use tally::core::Operation;
/// use rust_decimal::Decimal;
///
/// let op: Operation = "power".parse().unwrap();
/// let result = op.apply(Decimal::from(2), Decimal::from(8)).unwrap();
/// assert_eq!(result, Decimal::from(256));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
}

impl Operation {
    /// Every supported operation, in help-text order.
    pub const ALL: [Operation; 6] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
        Operation::Root,
    ];

    /// Canonical lower-case name, as typed at the prompt and stored on disk.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Power => "power",
            Self::Root => "root",
        }
    }

    /// Infix symbol used when displaying a calculation.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
            Self::Root => "√",
        }
    }

    /// Evaluate the operation.
    ///
    /// Domain errors are returned rather than checked up front: the decimal
    /// arithmetic itself reports overflow, and only the cases it cannot
    /// express (zero divisors, roots without a real value) are tested here.
    pub fn apply(self, a: Decimal, b: Decimal) -> Result<Decimal, OperationError> {
        match self {
            Self::Add => a.checked_add(b).ok_or(self.overflow()),
            Self::Subtract => a.checked_sub(b).ok_or(self.overflow()),
            Self::Multiply => a.checked_mul(b).ok_or(self.overflow()),
            Self::Divide => {
                if b.is_zero() {
                    return Err(OperationError::DivisionByZero);
                }
                a.checked_div(b).ok_or(self.overflow())
            }
            Self::Power => power(a, b),
            Self::Root => root(a, b),
        }
    }

    fn overflow(self) -> OperationError {
        OperationError::Overflow {
            operation: self.name(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == wanted)
            .ok_or_else(|| OperationError::UnknownOperation {
                name: s.trim().to_string(),
                supported: supported_operations().join(", "),
            })
    }
}

/// Names of all supported operations, in help-text order.
pub fn supported_operations() -> Vec<&'static str> {
    Operation::ALL.iter().map(Operation::name).collect()
}

/// Results too small to represent become zero; results too large are
/// reported as overflow.
fn power(base: Decimal, exponent: Decimal) -> Result<Decimal, OperationError> {
    if base.is_zero() && exponent < Decimal::ZERO {
        return Err(OperationError::DivisionByZero);
    }
    let integral = exponent.fract().is_zero();
    if base < Decimal::ZERO && !integral {
        return Err(OperationError::Undefined {
            reason: format!("{base} raised to the non-integer power {exponent}"),
        });
    }
    if base.abs() == Decimal::ONE && integral {
        let odd = !(exponent % Decimal::TWO).is_zero();
        return Ok(if base.is_sign_negative() && odd {
            Decimal::NEGATIVE_ONE
        } else {
            Decimal::ONE
        });
    }

    match base.checked_powd(exponent) {
        Some(result) => Ok(result.normalize()),
        None if shrinks(base, exponent) => Ok(Decimal::ZERO),
        None => Err(Operation::Power.overflow()),
    }
}

/// Whether `|base| ^ exponent` tends towards zero.
fn shrinks(base: Decimal, exponent: Decimal) -> bool {
    let below_one = base.abs() < Decimal::ONE;
    exponent.is_sign_positive() == below_one
}

fn root(radicand: Decimal, degree: Decimal) -> Result<Decimal, OperationError> {
    if degree.is_zero() {
        return Err(OperationError::InvalidRoot {
            reason: "root degree cannot be zero".to_string(),
        });
    }
    if radicand >= Decimal::ZERO {
        return principal_root(radicand, degree);
    }

    if !degree.fract().is_zero() {
        return Err(OperationError::InvalidRoot {
            reason: format!("non-integer root {degree} of negative number {radicand}"),
        });
    }
    let odd = !(degree % Decimal::TWO).is_zero();
    if !odd {
        return Err(OperationError::InvalidRoot {
            reason: format!("even root {degree} of negative number {radicand}"),
        });
    }
    principal_root(-radicand, degree).map(|r| -r)
}

/// Root of a non-negative radicand.
fn principal_root(radicand: Decimal, degree: Decimal) -> Result<Decimal, OperationError> {
    // A negative degree is the reciprocal of the positive one.
    if degree < Decimal::ZERO {
        let root = principal_root(radicand, -degree)?;
        return Decimal::ONE
            .checked_div(root)
            .map(|r| r.normalize())
            .ok_or(OperationError::DivisionByZero);
    }

    let overflow = Operation::Root.overflow();
    let inverse = Decimal::ONE.checked_div(degree).ok_or(overflow.clone())?;
    let estimate = radicand.checked_powd(inverse).ok_or(overflow)?;

    // ln/exp based powers are approximate; integer degrees get refined.
    let Some(n) = degree.to_i64().filter(|_| degree.fract().is_zero()) else {
        return Ok(estimate.normalize());
    };
    let refined = newton_root(radicand, n, estimate).unwrap_or(estimate);

    let candidate = refined.round_dp(EXACT_ROOT_DP).normalize();
    match candidate.checked_powi(n) {
        Some(p) if p == radicand => Ok(candidate),
        _ => Ok(refined.normalize()),
    }
}

fn newton_root(radicand: Decimal, n: i64, seed: Decimal) -> Option<Decimal> {
    let degree = Decimal::from(n);
    let mut x = seed;
    for _ in 0..NEWTON_MAX_STEPS {
        if x.is_zero() {
            return Some(x);
        }
        let next = (degree - Decimal::ONE)
            .checked_mul(x)?
            .checked_add(radicand.checked_div(x.checked_powi(n - 1)?)?)?
            .checked_div(degree)?;
        if next == x {
            break;
        }
        x = next;
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn basic_arithmetic_is_exact() {
        assert_eq!(Operation::Add.apply(d("0.1"), d("0.2")).unwrap(), d("0.3"));
        assert_eq!(Operation::Subtract.apply(d("10"), d("4")).unwrap(), d("6"));
        assert_eq!(Operation::Multiply.apply(d("6"), d("7")).unwrap(), d("42"));
        assert_eq!(Operation::Divide.apply(d("20"), d("4")).unwrap(), d("5"));
        assert_eq!(Operation::Divide.apply(d("1"), d("4")).unwrap(), d("0.25"));
    }

    #[test]
    fn divide_by_zero_fails() {
        assert_eq!(
            Operation::Divide.apply(d("20"), d("0")),
            Err(OperationError::DivisionByZero)
        );
    }

    #[test]
    fn power_handles_integer_and_negative_exponents() {
        assert_eq!(Operation::Power.apply(d("2"), d("8")).unwrap(), d("256"));
        assert_eq!(Operation::Power.apply(d("2"), d("-1")).unwrap(), d("0.5"));
        assert_eq!(Operation::Power.apply(d("-3"), d("3")).unwrap(), d("-27"));
        assert_eq!(Operation::Power.apply(d("5"), d("0")).unwrap(), d("1"));
    }

    #[test]
    fn power_supports_fractional_exponents() {
        let result = Operation::Power.apply(d("4"), d("0.5")).unwrap();
        assert!((result - d("2")).abs() < d("0.000001"));
    }

    #[test]
    fn power_rejects_undefined_results() {
        assert_eq!(
            Operation::Power.apply(d("0"), d("-2")),
            Err(OperationError::DivisionByZero)
        );
        assert!(matches!(
            Operation::Power.apply(d("-8"), d("0.5")),
            Err(OperationError::Undefined { .. })
        ));
    }

    #[test]
    fn power_overflow_is_reported() {
        assert_eq!(
            Operation::Power.apply(d("10"), d("40")),
            Err(OperationError::Overflow { operation: "power" })
        );
    }

    #[test]
    fn vanishing_powers_become_zero() {
        assert_eq!(Operation::Power.apply(d("0.5"), d("100")).unwrap(), Decimal::ZERO);
        assert_eq!(Operation::Power.apply(d("2"), d("-100")).unwrap(), Decimal::ZERO);
        assert_eq!(
            Operation::Power.apply(d("0.9"), d("100000000000000000000")).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            Operation::Power.apply(d("2"), d("100")),
            Err(OperationError::Overflow { operation: "power" })
        );
    }

    #[test]
    fn unit_base_with_huge_exponent() {
        assert_eq!(
            Operation::Power.apply(d("-1"), d("9223372036854775808")).unwrap(),
            d("1")
        );
        assert_eq!(
            Operation::Power.apply(d("-1"), d("9223372036854775807")).unwrap(),
            d("-1")
        );
        assert_eq!(Operation::Power.apply(d("1"), d("-1000000")).unwrap(), d("1"));
    }

    #[test]
    fn approximate_results_have_no_trailing_zeros() {
        let result = Operation::Power.apply(Decimal::new(1, 28), d("0.5")).unwrap();
        assert!(!result.to_string().ends_with('0'), "{result}");

        let result = Operation::Root.apply(d("-32"), d("-5")).unwrap();
        assert_eq!(result.to_string(), "-0.5");
    }

    #[test]
    fn integer_roots_are_exact() {
        assert_eq!(Operation::Root.apply(d("9"), d("2")).unwrap(), d("3"));
        assert_eq!(Operation::Root.apply(d("27"), d("3")).unwrap(), d("3"));
        assert_eq!(Operation::Root.apply(d("-27"), d("3")).unwrap(), d("-3"));
        assert_eq!(Operation::Root.apply(d("0"), d("5")).unwrap(), d("0"));
    }

    #[test]
    fn irrational_root_is_close() {
        let result = Operation::Root.apply(d("2"), d("2")).unwrap();
        assert!((result * result - d("2")).abs() < d("0.0000000001"));
    }

    #[test]
    fn invalid_roots_fail() {
        for (a, b) in [("4", "0"), ("-4", "2"), ("-8", "1.5")] {
            assert!(
                matches!(
                    Operation::Root.apply(d(a), d(b)),
                    Err(OperationError::InvalidRoot { .. })
                ),
                "root {a} {b} should be invalid"
            );
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("add".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!(" ROOT ".parse::<Operation>().unwrap(), Operation::Root);
    }

    #[test]
    fn unknown_name_lists_supported_operations() {
        let err = "modulo".parse::<Operation>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown operation 'modulo'. Supported: add, subtract, multiply, divide, power, root"
        );
    }

    #[test]
    fn names_and_symbols_are_stable() {
        assert_eq!(supported_operations().len(), 6);
        assert_eq!(Operation::Root.symbol(), "√");
        assert_eq!(Operation::Multiply.to_string(), "multiply");
    }
}
