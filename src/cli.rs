use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "manifest-recon")]
#[command(about = "リリース台帳（Excel）とフォルダ内ファイルの照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 台帳とフォルダを照合してレポートを出力
    Compare {
        /// 台帳Excelファイル
        #[arg(short, long, required = true)]
        manifest: PathBuf,

        /// 照合するフォルダ
        #[arg(short, long, required = true)]
        folder: PathBuf,

        /// レポートの出力先（デフォルト: 設定の results_dir）
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// 台帳のシート名
        #[arg(long)]
        sheet: Option<String>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// レポートのエラー行を台帳の隔離シートへ移動
    Relocate {
        /// 台帳Excelファイル（上書きされる）
        #[arg(short, long, required = true)]
        manifest: PathBuf,

        /// 以前に出力したレポート
        #[arg(long, required = true)]
        report: PathBuf,

        /// 台帳のシート名
        #[arg(long)]
        sheet: Option<String>,

        /// 確認せずに実行
        #[arg(short, long)]
        yes: bool,
    },

    /// 照合から隔離まで一括実行
    Run {
        /// 台帳Excelファイル
        #[arg(short, long, required = true)]
        manifest: PathBuf,

        /// 照合するフォルダ
        #[arg(short, long, required = true)]
        folder: PathBuf,

        /// レポートの出力先
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// 台帳のシート名
        #[arg(long)]
        sheet: Option<String>,

        /// エラーがあれば隔離シートへ移動
        #[arg(long)]
        relocate: bool,

        /// 確認せずに実行
        #[arg(short, long)]
        yes: bool,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// アクセストークンを設定
        #[arg(long)]
        set_token: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
