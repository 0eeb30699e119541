use colored::{ColoredString, Colorize};
use std::io::{self, Write};

use crate::generate::{GeneratedMenu, Provenance};
use crate::model::{Difficulty, UserPreferences, WorkoutHistory, DURATIONS, EQUIPMENT, LEVELS, TARGET_MUSCLES};

pub fn difficulty_badge(d: &Difficulty) -> ColoredString {
    let label = format!("[{}]", d.label());
    match d {
        Difficulty::Easy => label.green().bold(),
        Difficulty::Medium => label.yellow().bold(),
        Difficulty::Hard => label.red().bold(),
        Difficulty::Other(_) => label.dimmed(),
    }
}

pub fn show_menu(out: &GeneratedMenu) {
    let m = &out.menu;
    println!("\n=== {} ===", m.name.bold());
    println!(
        "部位: {}   レベル: {}   時間: {}分   器具: {}",
        m.target_muscle,
        m.level.label(),
        m.duration,
        if m.equipment.is_empty() { "-".to_string() } else { m.equipment.join(", ") }
    );
    if let Provenance::Fallback { reason } = &out.provenance {
        println!("{}", format!("(基本メニューを表示しています: {reason})").dimmed());
    }
    println!();
    for (i, ex) in m.exercises.iter().enumerate() {
        println!(
            "{}. {} {}  {}セット × {}  休憩{}秒",
            i + 1,
            difficulty_badge(&ex.difficulty),
            ex.name.bold(),
            ex.sets,
            ex.reps,
            ex.rest_time
        );
        println!("   {}", ex.description);
        if !ex.muscle_groups.is_empty() {
            println!("   対象: {}", ex.muscle_groups.join(", "));
        }
    }
    println!("\n合計 {} セット\n", m.total_sets());
}

pub fn show_history(history: &[WorkoutHistory]) {
    if history.is_empty() {
        println!("(履歴なし)");
        return;
    }
    for h in history {
        let rating = h.rating.map(|r| "★".repeat(r as usize)).unwrap_or_default();
        println!(
            "- {}  {}分  {}{}",
            h.executed_at.format("%Y-%m-%d %H:%M"),
            h.duration,
            rating.yellow(),
            h.notes.as_deref().map(|n| format!("  {n}")).unwrap_or_default()
        );
    }
}

pub fn confirm(prompt: &str) -> bool {
    let ans = read_line(&format!("{} [y/N]", prompt)).to_lowercase();
    ans == "y" || ans == "yes"
}

fn read_line(prompt: &str) -> String {
    print!("{}: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        s.trim().to_string()
    } else {
        String::new()
    }
}

/// 1-based index typed by the user; None for blank or out-of-range input.
pub fn parse_choice(input: &str, len: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

/// Comma or space separated 1-based indices. Invalid entries are skipped.
pub fn parse_multi(input: &str, len: usize) -> Vec<usize> {
    let mut picked = Vec::new();
    for tok in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if let Some(i) = parse_choice(tok, len) {
            if !picked.contains(&i) {
                picked.push(i);
            }
        }
    }
    picked
}

/// Equipment selection from the form input: "0" clears the list, blank or
/// unusable input keeps `current`.
pub fn equipment_from_input(input: &str, current: &[String]) -> Vec<String> {
    if input.trim() == "0" {
        return Vec::new();
    }
    let picked = parse_multi(input, EQUIPMENT.len());
    if picked.is_empty() {
        current.to_vec()
    } else {
        picked.into_iter().map(|i| EQUIPMENT[i].to_string()).collect()
    }
}

fn choose(title: &str, options: &[String], current: usize) -> usize {
    println!("\n{}", title.bold());
    for (i, o) in options.iter().enumerate() {
        let marker = if i == current { "*" } else { " " };
        println!(" {marker}{}. {}", i + 1, o);
    }
    parse_choice(&read_line("番号 (Enterで変更なし)"), options.len()).unwrap_or(current)
}

/// Walk the user through the preference form, starting from `current`.
pub fn ask_preferences(current: &UserPreferences) -> UserPreferences {
    let muscles: Vec<String> = TARGET_MUSCLES.iter().map(|s| s.to_string()).collect();
    let at = TARGET_MUSCLES.iter().position(|m| *m == current.target_muscle).unwrap_or(0);
    let target_muscle = muscles[choose("鍛えたい部位", &muscles, at)].clone();

    let levels: Vec<String> = LEVELS.iter().map(|l| l.label().to_string()).collect();
    let at = LEVELS.iter().position(|l| *l == current.level).unwrap_or(0);
    let level = LEVELS[choose("レベル", &levels, at)];

    let durations: Vec<String> = DURATIONS.iter().map(|d| format!("{d}分")).collect();
    let at = DURATIONS.iter().position(|d| *d == current.available_time).unwrap_or(1);
    let available_time = DURATIONS[choose("トレーニング時間", &durations, at)];

    println!("\n{}", "使用器具（複数選択可）".bold());
    for (i, e) in EQUIPMENT.iter().enumerate() {
        let marker = if current.equipment.iter().any(|c| c == e) { "*" } else { " " };
        println!(" {marker}{}. {}", i + 1, e);
    }
    let input = read_line("番号をカンマ区切りで (0で選択解除, Enterで変更なし)");
    let equipment = equipment_from_input(&input, &current.equipment);

    UserPreferences { target_muscle, level, available_time, equipment }
}

/// Ask how the session went. Returns (minutes, notes, rating).
pub fn ask_session_result(planned_minutes: u32) -> (u32, Option<String>, Option<u8>) {
    let minutes = read_line(&format!("実際の時間（分, Enterで{planned_minutes}）"))
        .parse()
        .unwrap_or(planned_minutes);
    let notes = Some(read_line("メモ")).filter(|n| !n.is_empty());
    let rating = read_line("評価 1-5 (Enterでなし)").parse().ok();
    (minutes, notes, rating)
}
