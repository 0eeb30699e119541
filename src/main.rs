use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use workout_planner::cli::Args;
use workout_planner::config::Config;
use workout_planner::generate::MenuGenerator;
use workout_planner::provider;
use workout_planner::session::WorkoutSession;
use workout_planner::store::Store;
use workout_planner::ux;

fn init_logging(debug: bool) {
    let default = if debug { "workout_planner=debug,info" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut cfg = Config::load(args.config.as_deref().map(Path::new))?;
    if let Some(db) = &args.db {
        cfg.database_path = db.clone();
    }
    if let Some(model) = &args.model {
        cfg.model = model.clone();
    }
    if args.transcripts.is_some() {
        cfg.transcript_dir = args.transcripts.clone();
    }
    if cfg.api_key.is_none() {
        log::warn!("no AI API key configured; menus will use the basic fallback");
    }

    let store = Arc::new(
        Store::open(&cfg.database_path).with_context(|| format!("opening database {}", cfg.database_path))?,
    );
    let generator = MenuGenerator::new(provider::make_provider(&cfg)?)
        .with_transcripts(cfg.transcript_dir.as_ref().map(PathBuf::from));
    let mut session = WorkoutSession::new(generator, store, cfg.history_limit);
    session.load_history();

    loop {
        if let Some(err) = session.take_error() {
            println!("{}", err.red());
        }
        let p = session.preferences();
        println!(
            "\n現在の設定: {} / {} / {}分 / {}",
            p.target_muscle,
            p.level.label(),
            p.available_time,
            p.equipment.join(", ")
        );
        println!("1. 設定を変更  2. メニュー生成  3. 履歴から提案  4. 履歴を表示  5. 完了を記録  q. 終了");

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            "1" => {
                let prefs = ux::ask_preferences(session.preferences());
                if let Err(e) = session.set_preferences(prefs) {
                    println!("{}", e.to_string().red());
                }
            }
            "2" => {
                println!("ワークアウトメニューを生成中...");
                if let Some(out) = session.generate_menu().await {
                    ux::show_menu(out);
                }
            }
            "3" => {
                println!("履歴をもとに提案を生成中...");
                if let Some(out) = session.generate_from_history().await {
                    ux::show_menu(out);
                }
            }
            "4" => {
                session.load_history();
                ux::show_history(session.history());
            }
            "5" => {
                let Some(planned) = session.current().map(|c| c.menu.duration) else {
                    println!("先にメニューを生成してください");
                    continue;
                };
                if !ux::confirm("このメニューを完了として記録しますか？") {
                    continue;
                }
                let (minutes, notes, rating) = ux::ask_session_result(planned);
                match session.complete_workout(minutes, notes, rating) {
                    Ok(h) => println!("{}", format!("記録しました ({}分)", h.duration).green()),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            "q" | "quit" => break,
            _ => {}
        }
    }

    Ok(())
}
