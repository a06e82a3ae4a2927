pub mod auth;
pub mod catalog;
pub mod costs;
pub mod ledger;
pub mod stats;

use rust_decimal::Decimal;
use validator::ValidationError;

// Validação compartilhada pelos payloads monetários.
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}
