use std::collections::{BTreeMap, HashMap};

use crate::model::{ClubAggregate, Match, MatchResult, PlayerAggregate};

pub const RECENT_FORM_LEN: usize = 5;

/// Club totals over `matches`, which must be ordered most recent first for
/// `recent_form` to mean the last five games.
pub fn aggregate_club(club_id: &str, matches: &[Match]) -> ClubAggregate {
    let mut agg = ClubAggregate {
        club_id: club_id.to_string(),
        club_name: matches
            .first()
            .map(|m| m.club_name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        total_matches: 0,
        wins: 0,
        draws: 0,
        losses: 0,
        goals_for: 0,
        goals_against: 0,
        clean_sheets: 0,
        win_rate: 0,
        goal_difference: 0,
        avg_goals_for: 0.0,
        avg_goals_against: 0.0,
        recent_form: Vec::with_capacity(RECENT_FORM_LEN.min(matches.len())),
        match_types: BTreeMap::new(),
    };

    for (idx, m) in matches.iter().enumerate() {
        agg.total_matches += 1;
        match m.result {
            MatchResult::Win => agg.wins += 1,
            MatchResult::Draw => agg.draws += 1,
            MatchResult::Loss => agg.losses += 1,
        }
        agg.goals_for = agg.goals_for.saturating_add(m.score.own);
        agg.goals_against = agg.goals_against.saturating_add(m.score.opponent);
        if m.score.opponent == 0 {
            agg.clean_sheets += 1;
        }
        if idx < RECENT_FORM_LEN {
            agg.recent_form.push(m.result.form_letter());
        }
        *agg.match_types
            .entry(m.match_type.code().to_string())
            .or_insert(0) += 1;
    }

    agg.win_rate = percent(agg.wins, agg.total_matches);
    agg.goal_difference = i64::from(agg.goals_for) - i64::from(agg.goals_against);
    agg.avg_goals_for = per_match(agg.goals_for, agg.total_matches, 1);
    agg.avg_goals_against = per_match(agg.goals_against, agg.total_matches, 1);
    agg
}

/// Career lines keyed by player name. Rates come from summed totals, not from
/// averaging per-match rates.
pub fn aggregate_players(matches: &[Match]) -> Vec<PlayerAggregate> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, PlayerAggregate> = HashMap::new();

    for m in matches {
        for p in &m.players {
            let entry = by_name.entry(p.name.clone()).or_insert_with(|| {
                order.push(p.name.clone());
                PlayerAggregate {
                    name: p.name.clone(),
                    ..PlayerAggregate::default()
                }
            });
            entry.matches += 1;
            add(&mut entry.goals, p.goals);
            add(&mut entry.assists, p.assists);
            add(&mut entry.shots, p.shots);
            add(&mut entry.saves, p.saves);
            add(&mut entry.passes_made, p.passes_made);
            add(&mut entry.pass_attempts, p.pass_attempts);
            add(&mut entry.tackles_made, p.tackles_made);
            add(&mut entry.tackle_attempts, p.tackle_attempts);
            add(&mut entry.interceptions, p.interceptions);
            add(&mut entry.dribbles, p.dribbles);
            add(&mut entry.red_cards, p.red_cards);
            add(&mut entry.man_of_the_match, u32::from(p.man_of_the_match));
            add(&mut entry.clean_sheets, p.clean_sheet_gk.saturating_add(p.clean_sheet_def));
            entry.total_rating += p.rating;
            add(&mut entry.minutes_played, p.minutes_played);
            entry.position = p.position.clone();
        }
    }

    let mut players: Vec<PlayerAggregate> = order
        .into_iter()
        .filter_map(|name| by_name.remove(&name))
        .map(finish_player)
        .collect();
    players.sort_by(|a, b| {
        b.matches
            .cmp(&a.matches)
            .then_with(|| b.avg_rating.total_cmp(&a.avg_rating))
    });
    players
}

// Upstream counters are clamped to u32::MAX when parsed, so sums saturate.
fn add(total: &mut u32, value: u32) {
    *total = total.saturating_add(value);
}

/// Fills the derived rates of an accumulated player line.
pub fn finish_player(mut p: PlayerAggregate) -> PlayerAggregate {
    p.avg_rating = if p.matches > 0 {
        round_to(p.total_rating / f64::from(p.matches), 2)
    } else {
        0.0
    };
    p.pass_accuracy = percent(p.passes_made, p.pass_attempts);
    p.tackle_success = percent(p.tackles_made, p.tackle_attempts);
    p
}

/// `round(100 * part / whole)`, 0 when `whole` is 0.
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * f64::from(part) / f64::from(whole)).round() as u32
}

fn per_match(total: u32, matches: u32, decimals: i32) -> f64 {
    if matches == 0 {
        return 0.0;
    }
    round_to(f64::from(total) / f64::from(matches), decimals)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
