//! ログ初期化

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` があればそれを使い、なければ verbose に応じて既定レベルを決める
///
/// 標準出力は結果表示（`--json` など）に使うため、ログは標準エラーへ出す。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 二重初期化（テストなど）は無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
