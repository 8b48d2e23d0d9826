//! 噸數換算與比例正規化

use epr_core::Uom;
use rust_decimal::{Decimal, RoundingStrategy};

/// 衍生金額／數量的小數位數
pub const DISPLAY_SCALE: u32 = 3;

/// 數量換算結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tonnage {
    /// 換算後的公噸數
    pub mt: Decimal,
    /// 單位為「不適用」時，數量與單重必須歸零
    pub reset_inputs: bool,
}

/// 依計量單位換算成公噸
///
/// - `Not Applicable`：0，並要求把數量與單重歸零
/// - `Units` / `Nos` / `Roll`：數量 × 單重（公斤）÷ 1000
/// - `KG`：數量 ÷ 1000
/// - `MT`：數量
/// - 其他或未設定：沿用 `previous_mt`
///
/// 乘積超出 `Decimal` 範圍時回傳 `None`。
pub fn to_metric_tons(
    qty: Decimal,
    uom: Option<&Uom>,
    per_piece_weight_kg: Decimal,
    previous_mt: Decimal,
) -> Option<Tonnage> {
    let mt = match uom {
        Some(Uom::NotApplicable) => {
            return Some(Tonnage {
                mt: Decimal::ZERO,
                reset_inputs: true,
            });
        }
        Some(uom) if uom.is_countable() => {
            qty.checked_mul(per_piece_weight_kg)? / Decimal::ONE_THOUSAND
        }
        Some(Uom::Kg) => qty / Decimal::ONE_THOUSAND,
        Some(Uom::Mt) => qty,
        _ => previous_mt,
    };

    Some(Tonnage {
        mt,
        reset_inputs: false,
    })
}

/// 比例正規化：大於 1 視為百分比（÷ 100），否則已是分數
///
/// 沒有上限；輸入 250 會得到 2.5。
pub fn normalize_percent(raw: Decimal) -> Decimal {
    if raw > Decimal::ONE {
        raw / Decimal::ONE_HUNDRED
    } else {
        raw
    }
}

/// 四捨五入（遠離零）到三位小數，並固定顯示三位
pub fn fixed3(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_SCALE);
    rounded
}

/// 公噸 × 1000 × 每公斤單價；溢位時回傳 `None`
pub fn amount_for(qty_mt: Decimal, rate_per_kg: Decimal) -> Option<Decimal> {
    qty_mt
        .checked_mul(Decimal::ONE_THOUSAND)?
        .checked_mul(rate_per_kg)
        .map(fixed3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(Uom::Units, dec!(1000), dec!(0.015), dec!(0.015))]
    #[case(Uom::Nos, dec!(2000), dec!(0.5), dec!(1))]
    #[case(Uom::Roll, dec!(10), dec!(25), dec!(0.25))]
    #[case(Uom::Kg, dec!(2500), dec!(99), dec!(2.5))]
    #[case(Uom::Mt, dec!(3.2), dec!(99), dec!(3.2))]
    fn test_to_metric_tons(
        #[case] uom: Uom,
        #[case] qty: Decimal,
        #[case] per_piece: Decimal,
        #[case] expected: Decimal,
    ) {
        let tonnage = to_metric_tons(qty, Some(&uom), per_piece, dec!(42)).unwrap();
        assert_eq!(tonnage.mt, expected);
        assert!(!tonnage.reset_inputs);
    }

    #[test]
    fn test_not_applicable_resets() {
        let tonnage = to_metric_tons(dec!(1000), Some(&Uom::NotApplicable), dec!(0.2), dec!(5)).unwrap();
        assert_eq!(tonnage.mt, Decimal::ZERO);
        assert!(tonnage.reset_inputs);
    }

    #[test]
    fn test_unknown_uom_keeps_previous() {
        let litre = Uom::Other("Litre".to_string());
        assert_eq!(to_metric_tons(dec!(10), Some(&litre), dec!(1), dec!(7)).unwrap().mt, dec!(7));
        assert_eq!(to_metric_tons(dec!(10), None, dec!(1), dec!(7)).unwrap().mt, dec!(7));
    }

    #[test]
    fn test_countable_overflow_is_none() {
        let huge = Decimal::MAX / dec!(2);
        assert_eq!(to_metric_tons(huge, Some(&Uom::Units), dec!(3), Decimal::ZERO), None);
        // 不需要相乘的單位照常換算
        assert_eq!(to_metric_tons(huge, Some(&Uom::Mt), dec!(3), Decimal::ZERO).unwrap().mt, huge);
    }

    #[rstest]
    #[case(dec!(40), dec!(0.4))]
    #[case(dec!(0.4), dec!(0.4))]
    #[case(dec!(1), dec!(1))]
    #[case(dec!(1.5), dec!(0.015))]
    #[case(dec!(250), dec!(2.5))]
    #[case(dec!(0), dec!(0))]
    fn test_normalize_percent(#[case] raw: Decimal, #[case] expected: Decimal) {
        assert_eq!(normalize_percent(raw), expected);
    }

    #[test]
    fn test_fixed3() {
        assert_eq!(fixed3(dec!(300)).to_string(), "300.000");
        assert_eq!(fixed3(dec!(0.0125)).to_string(), "0.013");
        assert_eq!(fixed3(dec!(-0.0125)).to_string(), "-0.013");
        assert_eq!(fixed3(dec!(0.1234567)).to_string(), "0.123");
    }

    #[test]
    fn test_amount_for() {
        assert_eq!(amount_for(dec!(0.006), dec!(50)), Some(dec!(300)));
        assert_eq!(amount_for(dec!(0.006), dec!(50)).unwrap().to_string(), "300.000");
    }

    #[test]
    fn test_amount_overflow_is_none() {
        let qty = Decimal::from_str_exact("79228162514264337593543950").unwrap();
        assert_eq!(amount_for(qty, dec!(50)), None);
    }
}
