use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use sela::{cli, config, confirm, corpus, error, ocr, workflow};
use cli::{Cli, Commands, OutputFormat};
use config::Config;
use confirm::{AutoConfirmer, Confirmer, TerminalConfirmer};
use corpus::CorpusStore;
use error::{Result, SelaError};
use ocr::{OcrWorker, RasterImage, TesseractOcr};
use sela_common::{parse_attendee_text, LogRequest};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workflow::{CancelReason, LogWorkflow, WorkflowOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✖ {}", e);
            if matches!(e, SelaError::Ocr(_)) {
                eprintln!("  OCR failed. Please try again or enter names manually.");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sela=debug" } else { "sela=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { image, output } => {
            println!("📷 sela - 参加者抽出\n");

            let names = extract_from_image(&config, &image).await?;
            if names.is_empty() {
                println!("No usernames found in the image.");
                return Ok(());
            }

            let text = names.join("\n");
            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{}\n", text))?;
                    println!("✔ 出力: {}", path.display());
                }
                None => println!("{}", text),
            }
            println!("\nSuccessfully extracted {} names.", names.len());
        }

        Commands::Log {
            host,
            event,
            squad,
            day,
            description,
            attendees,
            image,
            yes,
            format,
        } => {
            let store = CorpusStore::load();
            report_corpus(&store);

            // 1. 参加者一覧
            let attendees = match (attendees, image) {
                (Some(path), _) => read_attendee_file(&path)?,
                (None, Some(image)) => extract_from_image(&config, &image).await?,
                (None, None) => Vec::new(),
            };

            // 2. 補正・検証・確認
            let request = LogRequest {
                host,
                attendees,
                event_type: event,
                squad,
                day: day.unwrap_or_default(),
                description,
            };
            let mut confirmer: Box<dyn Confirmer> = if yes {
                Box::new(AutoConfirmer)
            } else {
                Box::new(TerminalConfirmer)
            };
            let workflow = LogWorkflow::new(store.corpus(), config.similarity_threshold);

            match workflow.run(request, confirmer.as_mut())? {
                WorkflowOutcome::Generated { record, attendees } => {
                    match format {
                        OutputFormat::Text => println!("{}", record.render()),
                        OutputFormat::Json => println!("{}", record.to_json()?),
                    }
                    eprintln!("\n✔ Log generated successfully!");
                    eprintln!(
                        "  参加者: 一覧 {}名 → ログ {}名（ホスト除外後）",
                        attendees.len(),
                        record.attendees.len()
                    );
                }
                WorkflowOutcome::Cancelled(reason) => {
                    let detail = match reason {
                        CancelReason::CorrectionsDeclined => "補正の確認で中止",
                        CancelReason::HostAbsentDeclined => "ホスト不在の確認で中止",
                    };
                    eprintln!("Log generation cancelled. ({})", detail);
                }
            }
        }

        Commands::Corpus { list } => {
            let store = CorpusStore::load();
            report_corpus(&store);
            println!("  件数: {}", store.corpus().len());
            if list {
                for name in store.corpus().iter() {
                    println!("{}", name);
                }
            }
        }

        Commands::Config {
            set_ocr_command,
            set_timeout,
            set_threshold,
            show,
        } => {
            let mut config = config;

            if let Some(command) = set_ocr_command {
                config.set_ocr_command(command)?;
                println!("✔ OCRコマンドを設定しました");
            }
            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました");
            }
            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 類似度閾値を設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  OCRコマンド: {}", config.ocr_command);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  類似度閾値: {}", config.similarity_threshold);
            }
        }
    }

    Ok(())
}

fn report_corpus(store: &CorpusStore) {
    let status = store.status();
    eprintln!("{}", status.message());
    for reason in &status.degraded {
        eprintln!("  ⚠ 読み込めませんでした: {}", reason);
    }
}

fn read_attendee_file(path: &Path) -> Result<Vec<String>> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if !path.exists() {
            return Err(SelaError::FileNotFound(path.display().to_string()));
        }
        std::fs::read_to_string(path)?
    };
    Ok(parse_attendee_text(&content))
}

/// OCRワーカーを起動して1枚処理する
async fn extract_from_image(config: &Config, path: &Path) -> Result<Vec<String>> {
    let image = RasterImage::open(path)?;

    let command = config.ocr_command.clone();
    let worker = OcrWorker::spawn(move || TesseractOcr::initialize(&command), config.timeout());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Initializing OCR engine... This may take a moment.");
    worker.wait_ready().await;

    spinner.set_message("Processing image...");
    let result = match worker.submit(image) {
        Ok(job) => job.wait().await,
        Err(e) => Err(e),
    };
    spinner.finish_and_clear();

    result
}
