use serde::{Deserialize, Serialize};

/// Upper streak bound of each level, indexed by `level - 1`.
pub const LEVEL_BREAKPOINTS: [u32; 5] = [7, 21, 45, 90, 180];

pub const MAX_LEVEL: u8 = 5;

const LEVEL_NAMES: [&str; 5] = ["Beginner", "Persister", "Advancer", "Expert", "Master"];
const LEVEL_NAMES_ZH: [&str; 5] = ["初学者", "坚持者", "进阶者", "专家", "大师"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u8,
    pub progress: u32,
    pub days_to_next_level: u32,
    pub level_name: String,
}

/// Level in `1..=5`. A streak sitting exactly on a breakpoint stays on the
/// lower level.
pub fn get_user_level(streak: u32) -> u8 {
    match streak {
        0..=7 => 1,
        8..=21 => 2,
        22..=45 => 3,
        46..=90 => 4,
        _ => 5,
    }
}

/// Percentage of the way through the current level. Level 5 is always 100.
pub fn get_level_progress(streak: u32) -> u32 {
    let level = get_user_level(streak);
    if level == MAX_LEVEL {
        return 100;
    }

    let (previous_max, current_max) = level_bounds(level);
    let progress = 100.0 * f64::from(streak - previous_max) / f64::from(current_max - previous_max);

    (progress.round() as u32).min(100)
}

pub fn get_level_info(streak: u32) -> LevelInfo {
    let level = get_user_level(streak);
    let days_to_next_level = if level < MAX_LEVEL {
        level_bounds(level).1.saturating_sub(streak)
    } else {
        0
    };

    LevelInfo {
        level,
        progress: get_level_progress(streak),
        days_to_next_level,
        level_name: level_name(level).to_string(),
    }
}

pub fn level_name(level: u8) -> &'static str {
    LEVEL_NAMES[level_index(level)]
}

pub fn level_name_zh(level: u8) -> &'static str {
    LEVEL_NAMES_ZH[level_index(level)]
}

fn level_index(level: u8) -> usize {
    usize::from(level.clamp(1, MAX_LEVEL)) - 1
}

/// `(previous_max, current_max)` for a level.
fn level_bounds(level: u8) -> (u32, u32) {
    let index = level_index(level);
    let previous_max = if index == 0 { 0 } else { LEVEL_BREAKPOINTS[index - 1] };
    (previous_max, LEVEL_BREAKPOINTS[index])
}
