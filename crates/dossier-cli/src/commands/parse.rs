//! Parse command implementation.

use super::read_input;
use crate::cli::ParseArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use dossier_extractor::{DocumentMetadata, ParseResult, Parser};
use dossier_gatekeeper::Gatekeeper;
use std::path::Path;
use std::time::{Duration, UNIX_EPOCH};
use tracing::info;

/// Execute the parse command.
pub async fn execute_parse(args: ParseArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let result = parse_document(&args, config).await?;
    println!("{}", formatter.format_result(&result)?);
    Ok(())
}

/// Parse the document named by `args` under the configured settings.
pub async fn parse_document(args: &ParseArgs, config: &Config) -> Result<ParseResult> {
    if args.timeout_secs == Some(0) {
        return Err(CliError::InvalidInput("--timeout-secs must be greater than 0".to_string()));
    }

    let mut parser_config = config.parser.clone();
    if let Some(client_type) = &args.client_type {
        parser_config.client_type = Some(client_type.clone());
    }
    if args.no_fallback {
        parser_config.enable_fallback = false;
    }
    let limit = args
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| parser_config.parse_timeout());

    let gatekeeper = Gatekeeper::new(config.validation.clone())?;
    let parser = Parser::in_memory(parser_config)?.with_gatekeeper(gatekeeper);

    let bytes = read_input(&args.file)?;
    let metadata = document_metadata(&args.file, bytes.len());
    info!("Parsing {} ({} bytes)", args.file, bytes.len());

    let text = String::from_utf8_lossy(&bytes).into_owned();
    Ok(parser.parse_with_timeout(text, metadata, limit).await)
}

fn document_metadata(path: &str, len: usize) -> DocumentMetadata {
    if path == "-" {
        return DocumentMetadata {
            file_size: Some(len as u64),
            ..DocumentMetadata::default()
        };
    }

    let last_modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs());
    DocumentMetadata {
        file_name: Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
        file_size: Some(len as u64),
        last_modified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(file: &str) -> ParseArgs {
        ParseArgs {
            file: file.to_string(),
            client_type: None,
            timeout_secs: None,
            no_fallback: false,
        }
    }

    #[tokio::test]
    async fn test_parse_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("acme.txt");
        fs::write(&path, "Client: Acme Corp\r\nIndustry: Software\r\nCompetitors: Foo, Bar\r\n").unwrap();

        let result = parse_document(&args(path.to_str().unwrap()), &Config::default())
            .await
            .unwrap();
        assert_eq!(result.data.client_name, "Acme Corp");
        assert_eq!(result.metadata.document.file_name.as_deref(), Some("acme.txt"));
        assert!(result.metadata.document.file_size.is_some());
        assert!(result.metadata.document.last_modified.is_some());
    }

    #[tokio::test]
    async fn test_client_type_override() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Client: Acme Corp\nIndustry: Software").unwrap();

        let mut parse_args = args(path.to_str().unwrap());
        parse_args.client_type = Some("gaming".to_string());
        let result = parse_document(&parse_args, &Config::default()).await.unwrap();
        assert_eq!(result.metadata.client_type.as_deref(), Some("gaming"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_document(&args("/definitely/not/here.txt"), &Config::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[tokio::test]
    async fn test_zero_timeout_rejected() {
        let mut parse_args = args("notes.txt");
        parse_args.timeout_secs = Some(0);
        let err = parse_document(&parse_args, &Config::default()).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }
}
