use std::collections::HashMap;

use crate::Database;
use crate::dto::leaderboard::{CategoryPodium, LeaderboardEntry, LeaderboardResponse};
use crate::error::Result;
use crate::models::{Category, Racer};
use crate::repository::racer::RacerRepository;

pub const PODIUM_SIZE: usize = 3;

/// Rank finishers by elapsed time: an overall podium plus a podium per
/// category, categories in publication order. Racers without a valid final
/// time are left out.
pub fn build_leaderboard(finishers: Vec<Racer>) -> LeaderboardResponse {
    let mut ranked: Vec<(i64, Racer)> = finishers
        .into_iter()
        .filter_map(|racer| racer.elapsed_seconds().map(|secs| (secs, racer)))
        .collect();
    ranked.sort_by_key(|(secs, racer)| (*secs, racer.id));

    let overall: Vec<LeaderboardEntry> = ranked
        .iter()
        .take(PODIUM_SIZE)
        .zip(1u32..)
        .map(|((secs, racer), rank)| entry(racer, *secs, Some(rank)))
        .collect();

    let mut by_category: HashMap<Category, Vec<LeaderboardEntry>> = HashMap::new();
    for (position, (secs, racer)) in ranked.iter().enumerate() {
        let Some(category) = racer.category() else {
            continue;
        };
        let podium = by_category.entry(category).or_default();
        if podium.len() < PODIUM_SIZE {
            let overall_rank = (position < PODIUM_SIZE).then(|| position as u32 + 1);
            podium.push(entry(racer, *secs, overall_rank));
        }
    }

    let categories = Category::publication_order()
        .filter_map(|category| {
            by_category.remove(&category).map(|entries| CategoryPodium {
                category: category.to_string(),
                entries,
            })
        })
        .collect();

    LeaderboardResponse {
        overall,
        categories,
    }
}

pub async fn leaderboard(db: &Database) -> Result<LeaderboardResponse> {
    let finishers = RacerRepository::new(db).finishers().await?;
    Ok(build_leaderboard(finishers))
}

fn entry(racer: &Racer, elapsed_seconds: i64, overall_rank: Option<u32>) -> LeaderboardEntry {
    LeaderboardEntry {
        racer_id: racer.id,
        racer_no: racer.racer_no,
        first_name: racer.first_name.clone(),
        last_name: racer.last_name.clone(),
        age: racer.age,
        category: racer.category().map(|c| c.to_string()),
        final_time: super::timing::format_elapsed(elapsed_seconds),
        elapsed_seconds,
        overall_rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn finisher(id: i64, age: i32, gender: Gender, seconds: i64) -> Racer {
        Racer {
            id,
            first_name: format!("R{id}"),
            last_name: "Test".to_string(),
            age,
            gender,
            racer_no: id,
            start_time: Some(start()),
            finish_time: Some(start() + Duration::seconds(seconds)),
            email: None,
            created_at: start(),
        }
    }

    #[test]
    fn test_overall_podium_by_elapsed_time() {
        let board = build_leaderboard(vec![
            finisher(1, 20, Gender::Male, 300),
            finisher(2, 20, Gender::Male, 200),
            finisher(3, 35, Gender::Female, 250),
            finisher(4, 8, Gender::Female, 400),
        ]);

        let ids: Vec<i64> = board.overall.iter().map(|e| e.racer_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(board.overall[0].overall_rank, Some(1));
        assert_eq!(board.overall[0].final_time, "03:20");
    }

    #[test]
    fn test_minutes_past_99_sort_numerically() {
        let board = build_leaderboard(vec![
            finisher(1, 20, Gender::Male, 100 * 60),
            finisher(2, 20, Gender::Male, 99 * 60),
        ]);
        assert_eq!(board.overall[0].racer_id, 2);
        assert_eq!(board.overall[1].final_time, "100:00");
    }

    #[test]
    fn test_category_podiums_in_publication_order() {
        let board = build_leaderboard(vec![
            finisher(1, 40, Gender::Female, 500),
            finisher(2, 20, Gender::Male, 100),
            finisher(3, 20, Gender::Male, 110),
            finisher(4, 20, Gender::Male, 120),
            finisher(5, 20, Gender::Male, 130),
            finisher(6, 20, Gender::Female, 140),
        ]);

        let codes: Vec<&str> = board.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(codes, vec!["M18", "F18", "F31"]);

        let m18 = &board.categories[0];
        assert_eq!(m18.entries.len(), 3);
        assert_eq!(m18.entries[2].racer_id, 4);
        assert_eq!(m18.entries[2].overall_rank, Some(3));

        let f18 = &board.categories[1];
        assert_eq!(f18.entries[0].overall_rank, None);
    }

    #[test]
    fn test_ties_break_by_id_and_invalid_times_are_skipped() {
        let mut broken = finisher(9, 20, Gender::Male, 10);
        broken.finish_time = Some(start() - Duration::seconds(5));

        let board = build_leaderboard(vec![
            finisher(7, 20, Gender::Male, 60),
            finisher(5, 20, Gender::Male, 60),
            broken,
        ]);
        let ids: Vec<i64> = board.overall.iter().map(|e| e.racer_id).collect();
        assert_eq!(ids, vec![5, 7]);
    }

    #[test]
    fn test_racer_without_age_ranks_overall_only() {
        let board = build_leaderboard(vec![
            finisher(1, 0, Gender::Male, 90),
            finisher(2, 20, Gender::Male, 100),
        ]);

        assert_eq!(board.overall[0].racer_id, 1);
        assert_eq!(board.overall[0].category, None);
        assert_eq!(board.categories.len(), 1);
        assert_eq!(board.categories[0].category, "M18");
        assert_eq!(board.categories[0].entries[0].racer_id, 2);
    }
}
