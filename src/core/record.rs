//! Calculation records and the factory that builds them.

use super::error::OperationError;
use super::operation::Operation;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One evaluated arithmetic operation.
///
/// Records are immutable values: every field is fixed at construction and
/// only exposed through getters. A record is only ever built from a
/// successful evaluation, so holding one is proof that `result` is the
/// registry's answer for the operands.
///
/// # Example
///
/// ```rust
/// use tally::core::CalculationRecord;
/// use rust_decimal::Decimal;
///
/// let record = CalculationRecord::create("add", Decimal::from(10), Decimal::from(5)).unwrap();
/// assert_eq!(record.result(), Decimal::from(15));
/// assert_eq!(record.to_string(), "10 + 5 = 15");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    operand_a: Decimal,
    operand_b: Decimal,
    operator: Operation,
    result: Decimal,
    timestamp: DateTime<Utc>,
}

impl CalculationRecord {
    /// Build a record from an operator name.
    ///
    /// Fails with [`OperationError::UnknownOperation`] for names outside the
    /// registry, and with the registry's domain error when evaluation fails.
    /// The record is not added to any history.
    pub fn create(operator: &str, a: Decimal, b: Decimal) -> Result<Self, OperationError> {
        Self::evaluate(operator.parse()?, a, b)
    }

    /// Build a record for an already resolved operation, stamped now.
    pub fn evaluate(operator: Operation, a: Decimal, b: Decimal) -> Result<Self, OperationError> {
        let result = operator.apply(a, b)?;
        Ok(Self {
            operand_a: a,
            operand_b: b,
            operator,
            result,
            timestamp: Utc::now(),
        })
    }

    /// Reassemble a record that was evaluated earlier, e.g. read back from disk.
    pub(crate) fn from_parts(
        operator: Operation,
        operand_a: Decimal,
        operand_b: Decimal,
        result: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operand_a,
            operand_b,
            operator,
            result,
            timestamp,
        }
    }

    pub fn operand_a(&self) -> Decimal {
        self.operand_a
    }

    pub fn operand_b(&self) -> Decimal {
        self.operand_b
    }

    pub fn operator(&self) -> Operation {
        self.operator
    }

    pub fn result(&self) -> Decimal {
        self.result
    }

    /// When the calculation was evaluated
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for CalculationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.operand_a,
            self.operator.symbol(),
            self.operand_b,
            self.result
        )
    }
}
