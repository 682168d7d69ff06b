use auto_finance_core::emi::{self, LoanInputs, LoanResult};
use auto_finance_core::presets;
use auto_finance_core::{AutoFinanceError, RoundingPolicy};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Known-answer EMI tests
// ===========================================================================

#[test]
fn test_eight_lakh_at_eight_and_half_percent_over_five_years() {
    let result = emi::compute_emi(dec!(800000), dec!(8.5), 5).unwrap();
    assert!(
        (result.monthly_installment - dec!(16414)).abs() <= Decimal::ONE,
        "Expected EMI ~16,414, got {}",
        result.monthly_installment
    );
    assert_eq!(result.monthly_installment, dec!(16413));
}

#[test]
fn test_zero_interest_twelve_months() {
    let result = emi::compute_emi(dec!(500000), Decimal::ZERO, 1).unwrap();
    assert_eq!(
        result,
        LoanResult {
            principal: dec!(500000),
            tenure_months: 12,
            monthly_rate: Decimal::ZERO,
            monthly_installment: dec!(41667),
            exact_monthly_installment: dec!(500000) / dec!(12),
            total_payable: dec!(500000),
            total_interest: Decimal::ZERO,
        }
    );
}

#[test]
fn test_ten_lakh_at_ten_percent_one_year() {
    let result = emi::compute_emi(dec!(1000000), dec!(10), 1).unwrap();
    // 87915.89 rounds to 87916
    assert_eq!(result.monthly_installment, dec!(87916));
    assert_eq!(result.total_payable, dec!(1054992));
    assert_eq!(result.total_interest, dec!(54992));
}

#[test]
fn test_seven_year_tenure() {
    let result = emi::compute_emi(dec!(1200000), dec!(9), 7).unwrap();
    assert_eq!(result.tenure_months, 84);
    assert_eq!(result.monthly_installment, dec!(19307));
    assert_eq!(result.total_interest, dec!(421788));
}

// ===========================================================================
// Error conditions
// ===========================================================================

#[test]
fn test_zero_principal_is_invalid() {
    let err = emi::compute_emi(Decimal::ZERO, dec!(8.5), 5).unwrap_err();
    assert!(matches!(err, AutoFinanceError::InvalidInput { .. }));
}

#[test]
fn test_negative_principal_is_invalid() {
    let err = emi::compute_emi(dec!(-100000), dec!(8.5), 5).unwrap_err();
    assert!(matches!(err, AutoFinanceError::InvalidInput { .. }));
}

#[test]
fn test_zero_tenure_is_invalid() {
    let err = emi::compute_emi(dec!(800000), dec!(8.5), 0).unwrap_err();
    assert!(matches!(err, AutoFinanceError::InvalidInput { .. }));
}

#[test]
fn test_negative_rate_is_invalid() {
    let err = emi::compute_emi(dec!(800000), dec!(-1), 5).unwrap_err();
    assert!(matches!(err, AutoFinanceError::InvalidInput { .. }));
}

#[test]
fn test_error_message_names_field() {
    let err = emi::compute_emi(dec!(800000), dec!(8.5), 0).unwrap_err();
    assert!(err.to_string().contains("tenure_years"));
}

// ===========================================================================
// Vehicle-level inputs and JSON boundary
// ===========================================================================

#[test]
fn test_calculate_loan_from_json() {
    let input: LoanInputs = serde_json::from_str(
        r#"{
            "vehicle_price": 1411000,
            "down_payment": "282200",
            "annual_rate_percent": 8.5,
            "tenure_years": 5
        }"#,
    )
    .unwrap();
    assert_eq!(input.rounding, RoundingPolicy::RoundThenMultiply);

    let output = emi::calculate_loan(&input).unwrap();
    assert_eq!(output.result.principal, dec!(1128800));
    assert_eq!(output.methodology, "Fixed-rate EMI (reducing balance, monthly compounding)");
    assert!(output.warnings.is_empty());
}

#[test]
fn test_output_envelope_serializes_decimals_as_strings() {
    let output = emi::calculate_loan(&presets::default_inputs(dec!(1000000))).unwrap();
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["result"]["monthly_installment"], "16413");
    assert_eq!(value["result"]["tenure_months"], 60);
    assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
}

#[test]
fn test_rounding_policy_from_json() {
    let input: LoanInputs = serde_json::from_str(
        r#"{
            "vehicle_price": 1000000,
            "down_payment": 200000,
            "annual_rate_percent": 8.5,
            "tenure_years": 5,
            "rounding": "carry_precision"
        }"#,
    )
    .unwrap();
    let output = emi::calculate_loan(&input).unwrap();
    assert_eq!(output.result.total_payable, dec!(984794));
}

#[test]
fn test_down_payment_equal_to_price_is_invalid() {
    let input = LoanInputs {
        vehicle_price: dec!(1000000),
        down_payment: dec!(1000000),
        annual_rate_percent: dec!(8.5),
        tenure_years: 5,
        rounding: RoundingPolicy::default(),
    };
    assert!(emi::calculate_loan(&input).is_err());
}

#[test]
fn test_repeated_calls_identical() {
    let input = presets::default_inputs(dec!(2708000));
    let a = emi::calculate_loan(&input).unwrap().result;
    let b = emi::calculate_loan(&input).unwrap().result;
    assert_eq!(a, b);
}
