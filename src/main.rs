use clap::Parser;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use posture_review::{cli, client, config, error, logging, runner};
use posture_review_common::{present, Event, RequestState, ResultView, SelectedFile};
use cli::{Cli, Commands};
use client::HttpAnalysisService;
use config::Config;
use error::{ReviewError, Result};
use runner::Runner;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { video, json, no_retry } => {
            let base_url = config.effective_base_url(cli.api_url.as_deref());
            let service = HttpAnalysisService::with_base_url(
                &base_url,
                Duration::from_secs(config.timeout_seconds),
            )?;
            run_analyze(service, video, json, no_retry).await?;
        }

        Commands::Config { set_api_url, set_timeout, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(url) = set_api_url {
                config.set_api_base_url(url)?;
                changed = true;
            }
            if let Some(seconds) = set_timeout {
                config.set_timeout_seconds(seconds)?;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let effective = config.effective_base_url(cli.api_url.as_deref());
                println!("設定:");
                println!("  ベースURL: {}", config.api_base_url);
                println!("  送信先: {}{}", effective.trim_end_matches('/'), client::ANALYZE_PATH);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

async fn run_analyze(
    service: HttpAnalysisService,
    video: Option<PathBuf>,
    json: bool,
    no_retry: bool,
) -> Result<()> {
    if !json {
        println!("📹 posture-review - 姿勢解析\n");
    }

    // 1. 動画の選択
    let path = match video {
        Some(path) => path,
        None => {
            let input: String = Input::new()
                .with_prompt("動画ファイルのパス")
                .interact_text()
                .map_err(|e| ReviewError::Prompt(e.to_string()))?;
            PathBuf::from(input.trim())
        }
    };
    if !path.is_file() {
        return Err(ReviewError::FileNotFound(path.display().to_string()));
    }

    if !json {
        println!("[1/2] 動画を読み込み中...");
    }
    let file = SelectedFile::from_path(&path)?;
    if !json {
        println!("✔ {} ({}, {} bytes)\n", file.name(), file.mime(), file.len());
    }

    let mut runner = Runner::new(Arc::new(service));
    runner.dispatch(Event::PickerChanged(file));

    // 2. 送信（失敗したら確認の上で再送信）
    loop {
        let spinner = (!json).then(|| analyzing_spinner("[2/2] 解析サービスへ送信中..."));
        runner.dispatch(Event::SubmitClicked);
        let state = runner.run_until_settled().await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match state {
            RequestState::Succeeded => break,
            RequestState::Failed => {
                let message = runner
                    .session()
                    .notice()
                    .map(|notice| notice.message.clone())
                    .unwrap_or_default();
                eprintln!("✖ {}", message);
                if no_retry || !confirm_retry() {
                    return Err(ReviewError::AnalysisFailed(message));
                }
            }
            other => {
                return Err(ReviewError::AnalysisFailed(format!(
                    "予期しない状態: {}",
                    other.as_str()
                )));
            }
        }
    }

    if json {
        if let Some(result) = runner.session().result() {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        return Ok(());
    }

    println!("✔ 解析完了\n");
    if let ResultView::Ready(view) = present(runner.session()) {
        println!("結果:");
        println!("  動画: {}", view.video_url);
        for line in &view.summary {
            println!("  {}", line);
        }
    }

    Ok(())
}

fn analyzing_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// 端末でなければ確認できないので再送信しない
fn confirm_retry() -> bool {
    Confirm::new()
        .with_prompt("もう一度送信しますか？")
        .default(false)
        .interact()
        .unwrap_or(false)
}
