use kilo_core::config::{AppConfig, LlmProvider, LoadOptions};
use kilo_db::{connect_with_config, migrations};
use secrecy::ExposeSecret;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

/// Returns the rendered report and whether every check passed.
pub fn run(json_output: bool) -> (String, bool) {
    let report = build_report();
    let passed = report.overall_status == CheckStatus::Pass;

    if json_output {
        let rendered = serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        });
        return (rendered, passed);
    }

    (render_human(&report), passed)
}

fn build_report() -> DoctorReport {
    let checks = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => vec![
            DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            },
            check_llm_readiness(&config),
            check_database(&config),
        ],
        Err(error) => vec![
            DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            },
            skipped("llm_key_readiness"),
            skipped("database_connectivity"),
        ],
    };

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    DoctorReport {
        overall_status: if all_pass { CheckStatus::Pass } else { CheckStatus::Fail },
        summary: if all_pass {
            "doctor: all readiness checks passed".to_string()
        } else {
            "doctor: one or more readiness checks failed".to_string()
        },
        checks,
    }
}

fn skipped(name: &'static str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: "skipped because configuration did not load".to_string(),
    }
}

fn check_llm_readiness(config: &AppConfig) -> DoctorCheck {
    let llm = &config.llm;
    match llm.provider {
        LlmProvider::Ollama => DoctorCheck {
            name: "llm_key_readiness",
            status: CheckStatus::Pass,
            details: format!("ollama at `{}` needs no api key (model `{}`)", llm.base_url, llm.model),
        },
        LlmProvider::OpenAi => {
            let key_len =
                llm.api_key.as_ref().map(|key| key.expose_secret().trim().len()).unwrap_or(0);
            if key_len == 0 {
                DoctorCheck {
                    name: "llm_key_readiness",
                    status: CheckStatus::Fail,
                    details: "openai provider selected but no api key is set".to_string(),
                }
            } else {
                DoctorCheck {
                    name: "llm_key_readiness",
                    status: CheckStatus::Pass,
                    details: format!(
                        "openai key present ({key_len} chars) for model `{}` at `{}`",
                        llm.model, llm.base_url
                    ),
                }
            }
        }
    }
}

fn check_database(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_config(&config.database)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;
        let known = migrations::MIGRATOR.iter().count();
        pool.close().await;
        Ok::<usize, String>(known)
    });

    match result {
        Ok(known_migrations) => DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!(
                "connected using `{}` ({known_migrations} embedded migrations)",
                config.database.url
            ),
        },
        Err(error) => {
            DoctorCheck { name: "database_connectivity", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }
    lines.join("\n")
}
