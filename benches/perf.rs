use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;

use proclubs_dashboard::aggregate::{aggregate_club, aggregate_players};
use proclubs_dashboard::model::Match;
use proclubs_dashboard::normalize::normalize;

const CLUB_ID: &str = "100";
const HISTORY_LEN: usize = 500;

fn synthetic_history(len: usize) -> Vec<Value> {
    (0..len)
        .map(|i| {
            let own = (i % 4) as u32;
            let opp = (i % 3) as u32;
            let players: serde_json::Map<String, Value> = (0..11)
                .map(|p| {
                    (
                        format!("Player {p}"),
                        json!({
                            "rating": format!("{}.{}", 5 + (i + p) % 4, p),
                            "goals": ((i + p) % 3).to_string(),
                            "assists": (p % 2).to_string(),
                            "passesmade": "20",
                            "passattempts": "25",
                            "tacklesmade": "3",
                            "tackleattempts": "5",
                            "secondsPlayed": "5400",
                            "archetypeid": (p % 8).to_string(),
                        }),
                    )
                })
                .collect();
            json!({
                "id": format!("m{i}"),
                "club_id": CLUB_ID,
                "club_name": "Night Owls",
                "match_type": if i % 5 == 0 { "playoffMatch" } else { "leagueMatch" },
                "match_date": 1_700_000_000 + (len - i) as i64 * 3600,
                "match_data": {
                    "clubs": {
                        CLUB_ID: { "goals": own.to_string() },
                        "200": { "goals": opp.to_string(), "details": { "name": "Day Larks" } },
                    }
                },
                "player_data": players,
            })
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let raw = synthetic_history(HISTORY_LEN);
    c.bench_function("normalize_history", |b| {
        b.iter(|| {
            let matches: Vec<Match> = raw.iter().map(|m| normalize(black_box(m), CLUB_ID)).collect();
            black_box(matches.len());
        })
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let matches: Vec<Match> = synthetic_history(HISTORY_LEN)
        .iter()
        .map(|m| normalize(m, CLUB_ID))
        .collect();
    c.bench_function("aggregate_club", |b| {
        b.iter(|| black_box(aggregate_club(CLUB_ID, black_box(&matches))))
    });
    c.bench_function("aggregate_players", |b| {
        b.iter(|| black_box(aggregate_players(black_box(&matches))))
    });
}

criterion_group!(perf, bench_normalize, bench_aggregate);
criterion_main!(perf);
