//! Numeric value helpers
//!
//! Every runtime value is a 96-bit [`Decimal`]. Comparisons and logical
//! operators produce exactly `1` or `0`.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::frontend::ast::BinOp;
use crate::utils::{Error, Result, Span};

pub fn is_truthy(value: Decimal) -> bool {
    !value.is_zero()
}

pub fn from_bool(value: bool) -> Decimal {
    if value {
        Decimal::ONE
    } else {
        Decimal::ZERO
    }
}

/// Apply a binary operator to two evaluated operands
pub fn apply_binary(op: BinOp, left: Decimal, right: Decimal, span: Span) -> Result<Decimal> {
    let overflow = |operation: &'static str| Error::ArithmeticOverflow { operation, span };
    match op {
        BinOp::Add => left.checked_add(right).ok_or_else(|| overflow("melomo")),
        BinOp::Sub => left.checked_sub(right).ok_or_else(|| overflow("flavuk")),
        BinOp::Mul => left.checked_mul(right).ok_or_else(|| overflow("dibotada")),
        BinOp::Div => {
            if right.is_zero() {
                return Err(Error::DivisionByZero { span });
            }
            left.checked_div(right).ok_or_else(|| overflow("poopaye"))
        }
        BinOp::Mod => {
            if right.is_zero() {
                return Err(Error::DivisionByZero { span });
            }
            left.checked_rem(right).ok_or_else(|| overflow("pado"))
        }
        BinOp::Pow => power(left, right, span),
        BinOp::Eq => Ok(from_bool(left == right)),
        BinOp::Ne => Ok(from_bool(left != right)),
        BinOp::Lt => Ok(from_bool(left < right)),
        BinOp::Le => Ok(from_bool(left <= right)),
        BinOp::Gt => Ok(from_bool(left > right)),
        BinOp::Ge => Ok(from_bool(left >= right)),
        BinOp::And => Ok(from_bool(is_truthy(left) && is_truthy(right))),
        BinOp::Or => Ok(from_bool(is_truthy(left) || is_truthy(right))),
    }
}

/// `base beedo exponent`
///
/// Integer exponents that fit in `u32` are computed exactly by repeated
/// squaring. Anything else goes through `f64`.
pub fn power(base: Decimal, exponent: Decimal, span: Span) -> Result<Decimal> {
    if exponent.fract().is_zero() {
        if let Some(magnitude) = exponent.abs().to_u32() {
            if exponent.is_sign_negative() && !exponent.is_zero() {
                if base.is_zero() {
                    return Err(Error::DivisionByZero { span });
                }
                // A reciprocal of an overflowing power still fits; fall back to f64
                if let Some(value) = checked_powu(base, magnitude) {
                    return Decimal::ONE.checked_div(value).ok_or(Error::ArithmeticOverflow {
                        operation: "beedo",
                        span,
                    });
                }
            } else {
                return checked_powu(base, magnitude).ok_or(Error::ArithmeticOverflow {
                    operation: "beedo",
                    span,
                });
            }
        }
    }

    float_power(base, exponent, span)
}

fn checked_powu(base: Decimal, mut exponent: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.checked_mul(square)?;
        }
        exponent >>= 1;
        if exponent > 0 {
            square = square.checked_mul(square)?;
        }
    }
    Some(result)
}

fn float_power(base: Decimal, exponent: Decimal, span: Span) -> Result<Decimal> {
    let undefined = || Error::UndefinedPower {
        base: base.normalize().to_string(),
        exponent: exponent.normalize().to_string(),
        span,
    };
    let overflow = Error::ArithmeticOverflow {
        operation: "beedo",
        span,
    };

    let b = base.to_f64().ok_or_else(undefined)?;
    let e = exponent.to_f64().ok_or_else(undefined)?;
    let result = b.powf(e);

    if result.is_nan() {
        return Err(undefined());
    }
    if result.is_infinite() {
        return Err(overflow);
    }
    Decimal::from_f64(result).ok_or(overflow)
}

/// Render a value with at most `precision` fractional digits, rounding half
/// away from zero and trimming trailing zeros
pub fn format_number(value: Decimal, precision: u32) -> String {
    let rounded = value
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        // no "-0"
        return "0".to_string();
    }
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn pow(base: i64, exponent: i64) -> Result<Decimal> {
        power(d(base), d(exponent), Span::dummy())
    }

    #[test]
    fn test_integer_power_is_exact() {
        assert_eq!(pow(2, 10).unwrap(), d(1024));
        assert_eq!(pow(-2, 3).unwrap(), d(-8));
        assert_eq!(pow(10, 0).unwrap(), d(1));
        assert_eq!(pow(0, 0).unwrap(), d(1));
        assert_eq!(pow(3, 40).unwrap(), Decimal::from(12_157_665_459_056_928_801_u64));
    }

    #[test]
    fn test_negative_exponent() {
        assert_eq!(pow(2, -2).unwrap(), Decimal::new(25, 2));
        assert!(matches!(pow(0, -1), Err(Error::DivisionByZero { .. })));
    }

    #[test]
    fn test_power_overflow() {
        assert!(matches!(pow(10, 40), Err(Error::ArithmeticOverflow { .. })));
    }

    #[test]
    fn test_fractional_power() {
        let root = power(d(9), Decimal::new(5, 1), Span::dummy()).unwrap();
        assert_eq!(root, d(3));
        let err = power(d(-8), Decimal::new(5, 1), Span::dummy()).unwrap_err();
        assert!(matches!(err, Error::UndefinedPower { .. }));
    }

    #[test]
    fn test_division_and_modulo_by_zero() {
        for op in [BinOp::Div, BinOp::Mod] {
            let err = apply_binary(op, d(10), Decimal::ZERO, Span::new(0, 12)).unwrap_err();
            assert_eq!(err, Error::DivisionByZero { span: Span::new(0, 12) });
        }
    }

    #[test]
    fn test_modulo_sign_follows_dividend() {
        let result = apply_binary(BinOp::Mod, d(-7), d(3), Span::dummy()).unwrap();
        assert_eq!(result, d(-1));
    }

    #[test]
    fn test_comparisons_yield_one_or_zero() {
        let cases = [
            (BinOp::Eq, 5, 5, 1),
            (BinOp::Ne, 5, 10, 1),
            (BinOp::Lt, 5, 10, 1),
            (BinOp::Le, 5, 5, 1),
            (BinOp::Gt, 10, 5, 1),
            (BinOp::Ge, 9, 10, 0),
            (BinOp::And, 3, 0, 0),
            (BinOp::Or, 0, -2, 1),
        ];
        for (op, left, right, expected) in cases {
            let result = apply_binary(op, d(left), d(right), Span::dummy()).unwrap();
            assert_eq!(result, d(expected), "{} {} {}", left, op, right);
        }
    }

    #[test]
    fn test_add_overflow() {
        let err = apply_binary(BinOp::Add, Decimal::MAX, Decimal::ONE, Span::dummy()).unwrap_err();
        assert!(matches!(err, Error::ArithmeticOverflow { operation: "melomo", .. }));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Decimal::new(314, 2), 5), "3.14");
        assert_eq!(format_number(Decimal::new(12000, 3), 5), "12");
        assert_eq!(format_number(Decimal::new(1234565, 6), 5), "1.23457");
        assert_eq!(format_number(Decimal::new(-1234565, 6), 5), "-1.23457");
        assert_eq!(format_number(Decimal::new(-1, 7), 5), "0");
        assert_eq!(format_number(d(120), 0), "120");
    }
}
