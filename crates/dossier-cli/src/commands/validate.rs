//! Validate command implementation.

use super::read_input;
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use dossier_domain::ClientProfile;
use dossier_gatekeeper::{Gatekeeper, ValidationResult};

/// Execute the validate command.
pub async fn execute_validate(
    args: ValidateArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let profile: ClientProfile = serde_json::from_slice(&read_input(&args.file)?)?;
    let validation = validate_profile(&profile, &args, config)?;
    println!("{}", formatter.format_validation(&validation)?);
    Ok(())
}

/// Run the configured gatekeeper over a profile.
pub fn validate_profile(
    profile: &ClientProfile,
    args: &ValidateArgs,
    config: &Config,
) -> Result<ValidationResult> {
    let gatekeeper = Gatekeeper::new(config.validation.clone())?;
    Ok(gatekeeper.validate(
        profile,
        args.document_type.into(),
        args.client_type.as_deref(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DocumentTypeArg;

    fn args(client_type: Option<&str>) -> ValidateArgs {
        ValidateArgs {
            file: "-".to_string(),
            client_type: client_type.map(str::to_string),
            document_type: DocumentTypeArg::Structured,
        }
    }

    #[test]
    fn test_profile_from_json() {
        let profile: ClientProfile =
            serde_json::from_str(r#"{"clientName": "Acme Corp", "industry": "Software"}"#).unwrap();
        let validation = validate_profile(&profile, &args(None), &Config::default()).unwrap();
        assert!(validation.is_valid);
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let validation =
            validate_profile(&ClientProfile::new(), &args(None), &Config::default()).unwrap();
        assert!(!validation.is_valid);
        assert!(validation.score < 1.0);
    }

    #[test]
    fn test_client_type_rules_apply() {
        let profile: ClientProfile = serde_json::from_str(r#"{"clientName": "Nebula Games"}"#).unwrap();
        let plain = validate_profile(&profile, &args(None), &Config::default()).unwrap();
        let gaming = validate_profile(&profile, &args(Some("gaming")), &Config::default()).unwrap();
        assert!(gaming.issues.len() > plain.issues.len());
    }
}
