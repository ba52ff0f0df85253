// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::error::AppError;

/// Maior valor que cabe em `NUMERIC(10, 2)`.
/// `9_999_999_999 * 10^-2` (`Decimal::new` não é `const`).
pub const MAX_PRICE: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2);

/// Arredonda para centavos e confere a faixa aceita pelas colunas de preço.
pub fn checked_price(price: Decimal) -> Result<Decimal, AppError> {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if (rounded.is_sign_negative() && !rounded.is_zero()) || rounded > MAX_PRICE {
        return Err(AppError::InvalidPrice(price));
    }
    Ok(rounded)
}

/// Formata no padrão pt-BR: `R$ 1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}
