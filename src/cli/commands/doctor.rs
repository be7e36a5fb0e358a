//! Doctor command - verify configuration and API access.

use crate::cli::Output;
use crate::config::{Settings, API_KEY_ENV_VARS};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Newscaster Doctor");
    println!();
    println!("Checking configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_checks = vec![check_api_key(settings), check_base_url(settings)];
    for check in &api_checks {
        check.print();
    }
    checks.extend(api_checks);
    Output::kv("Script model", &settings.gemini.script_model);
    Output::kv("Speech model", &settings.gemini.tts_model);

    println!();

    println!("{}", style("Directories").bold());
    let dir_checks = check_directories(settings);
    for check in &dir_checks {
        check.print();
    }
    checks.extend(dir_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before producing briefings.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Newscaster is ready to use.");
    }

    Ok(())
}

/// Check that an API key is configured, showing where it came from.
fn check_api_key(settings: &Settings) -> CheckResult {
    let origin = if settings.gemini.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
        "config file".to_string()
    } else {
        API_KEY_ENV_VARS
            .iter()
            .find(|var| std::env::var(var).is_ok_and(|k| !k.trim().is_empty()))
            .map(|var| var.to_string())
            .unwrap_or_default()
    };

    match settings.gemini.resolve_api_key() {
        Ok(key) => CheckResult::ok(
            "API key",
            &format!("configured via {} ({})", origin, mask_key(&key)),
        ),
        Err(_) => CheckResult::error(
            "API key",
            "not set",
            "Set with: export GEMINI_API_KEY='...' (or gemini.api_key in the config file)",
        ),
    }
}

fn check_base_url(settings: &Settings) -> CheckResult {
    match url::Url::parse(&settings.gemini.base_url) {
        Ok(url) if url.scheme() == "https" => CheckResult::ok("Endpoint", url.as_str()),
        Ok(url) => CheckResult::warning(
            "Endpoint",
            url.as_str(),
            "The endpoint is not using https",
        ),
        Err(e) => CheckResult::error(
            "Endpoint",
            &format!("invalid URL: {}", e),
            "Fix gemini.base_url in the config file",
        ),
    }
}

/// Check output and prompt directories.
fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let output_dir = settings.output_dir();
    if output_dir.exists() {
        results.push(CheckResult::ok(
            "Output directory",
            &format!("{}", output_dir.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Output directory",
            &format!("{} (will be created)", output_dir.display()),
            "Directory will be created on first briefing",
        ));
    }

    if let Some(custom_dir) = &settings.prompts.custom_dir {
        let path = Settings::expand_path(custom_dir);
        if path.join("script.toml").exists() {
            results.push(CheckResult::ok("Custom prompts", &format!("{}", path.display())));
        } else {
            results.push(CheckResult::warning(
                "Custom prompts",
                &format!("{} has no script.toml", path.display()),
                "Built-in prompts will be used",
            ));
        }
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: newscaster config edit",
        )
    }
}

/// Show only the ends of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
