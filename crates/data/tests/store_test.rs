mod common;

use chrono::{NaiveDate, NaiveTime};
use common::TestDb;
use nbb_data::{
    ConstraintKind, Game, Player, RosterSeasonLink, Shot, StoreError, Team, WriteOutcome,
};

async fn seed_teams_and_player(db: &TestDb) {
    db.pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                scope.insert_team(&Team::new("FLA").with_name("Flamengo")).await?;
                scope.insert_team(&Team::new("FRA").with_name("Franca")).await?;
                scope.insert_player(&Player::new(5).with_name("Yago")).await?;
                Ok::<_, StoreError>(())
            })
        })
        .await
        .expect("seeding failed");
}

#[tokio::test]
#[ignore = "requires database"]
async fn schema_creation_twice_keeps_data() {
    let db = TestDb::ready().await;

    db.pool
        .run_in_scope(|scope| {
            Box::pin(async move { scope.insert_team(&Team::new("FLA")).await })
        })
        .await
        .expect("insert failed");

    db.pool
        .run_in_scope(|scope| Box::pin(scope.create_schema()))
        .await
        .expect("second schema creation failed");

    assert_eq!(db.count("teams").await, 1);
    for table in ["players", "roster_season_links", "games", "shots"] {
        assert_eq!(db.count(table).await, 0);
    }

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn team_first_write_wins_across_scopes() {
    let db = TestDb::ready().await;

    let first = db
        .pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                scope
                    .insert_team(&Team::new("LAL").with_name("Lakers").with_logo("http://x"))
                    .await
            })
        })
        .await
        .expect("first insert failed");

    let second = db
        .pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                scope
                    .insert_team(&Team::new("LAL").with_name("Renamed").with_logo("http://y"))
                    .await
            })
        })
        .await
        .expect("second insert failed");

    assert_eq!(first, WriteOutcome::Inserted);
    assert_eq!(second, WriteOutcome::Ignored);
    assert_eq!(db.count("teams").await, 1);

    let mut scope = db.pool.begin().await.expect("begin failed");
    let stored = scope.team("LAL").await.expect("lookup failed").expect("team missing");
    scope.commit().await.expect("commit failed");

    assert_eq!(stored.name.as_deref(), Some("Lakers"));
    assert_eq!(stored.logo.as_deref(), Some("http://x"));

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn player_first_write_wins_within_one_scope() {
    let db = TestDb::ready().await;

    let stored = db
        .pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                scope.insert_player(&Player::new(5).with_name("Yago")).await?;
                let again = scope.insert_player(&Player::new(5).with_name("Other")).await?;
                assert_eq!(again, WriteOutcome::Ignored);
                scope.player(5).await
            })
        })
        .await
        .expect("scope failed")
        .expect("player missing");

    assert_eq!(stored.name.as_deref(), Some("Yago"));
    assert_eq!(db.count("players").await, 1);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn roster_link_first_write_wins() {
    let db = TestDb::ready().await;
    seed_teams_and_player(&db).await;

    let stored = db
        .pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                let first = scope
                    .insert_roster_link(
                        &RosterSeasonLink::new(5, "FLA", "2023").with_jersey_number("23"),
                    )
                    .await?;
                let second = scope
                    .insert_roster_link(
                        &RosterSeasonLink::new(5, "FLA", "2023").with_jersey_number("6"),
                    )
                    .await?;
                let other_season = scope
                    .insert_roster_link(&RosterSeasonLink::new(5, "FLA", "2024"))
                    .await?;

                assert_eq!(first, WriteOutcome::Inserted);
                assert_eq!(second, WriteOutcome::Ignored);
                assert_eq!(other_season, WriteOutcome::Inserted);
                scope.roster_link(5, "FLA", "2023").await
            })
        })
        .await
        .expect("scope failed")
        .expect("link missing");

    assert_eq!(stored.jersey_number.as_deref(), Some("23"));
    assert_eq!(db.count("roster_season_links").await, 2);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn game_last_write_wins() {
    let db = TestDb::ready().await;
    seed_teams_and_player(&db).await;

    let date = NaiveDate::from_ymd_opt(2023, 10, 5).unwrap();
    let time = NaiveTime::from_hms_opt(19, 30, 0).unwrap();

    let first = Game::new(1)
        .with_teams("FLA", "FRA")
        .with_score(80, 70)
        .with_season("2023")
        .with_schedule(date, time);
    let corrected = Game {
        arena: Some("Maracanãzinho".to_string()),
        ..first.clone().with_score(90, 70)
    };

    let outcomes = db
        .pool
        .run_in_scope(move |scope| {
            Box::pin(async move {
                let a = scope.insert_game(&first).await?;
                let b = scope.insert_game(&corrected).await?;
                Ok::<_, StoreError>((a, b))
            })
        })
        .await
        .expect("scope failed");

    assert_eq!(outcomes, (WriteOutcome::Inserted, WriteOutcome::Updated));
    assert_eq!(db.count("games").await, 1);

    let mut scope = db.pool.begin().await.expect("begin failed");
    let stored = scope.game(1).await.expect("lookup failed").expect("game missing");
    scope.commit().await.expect("commit failed");

    assert_eq!(stored.home_score, Some(90));
    assert_eq!(stored.away_score, Some(70));
    assert_eq!(stored.arena.as_deref(), Some("Maracanãzinho"));
    assert_eq!(stored.date, Some(date));

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn game_update_replaces_every_non_key_column() {
    let db = TestDb::ready().await;
    seed_teams_and_player(&db).await;

    db.pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                let full = Game {
                    round: Some("12".to_string()),
                    stage: Some("Playoffs".to_string()),
                    link: Some("http://lnb/jogo/1".to_string()),
                    ..Game::new(1).with_teams("FLA", "FRA").with_season("2023")
                };
                scope.insert_game(&full).await?;
                scope.insert_game(&Game::new(1).with_score(50, 48)).await
            })
        })
        .await
        .expect("scope failed");

    let mut scope = db.pool.begin().await.expect("begin failed");
    let stored = scope.game(1).await.expect("lookup failed").expect("game missing");
    scope.commit().await.expect("commit failed");

    assert_eq!(stored.home_score, Some(50));
    assert_eq!(stored.season, None);
    assert_eq!(stored.home_team_id, None);
    assert_eq!(stored.stage, None);
    assert_eq!(stored.link, None);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn identical_shots_are_both_stored() {
    let db = TestDb::ready().await;
    seed_teams_and_player(&db).await;

    let shot = Shot::new(5, 10, "FLA")
        .at("2", NaiveTime::from_hms_opt(0, 4, 10).unwrap())
        .located(10.0, 20.0)
        .with_type("3PT");

    let shots = db
        .pool
        .run_in_scope(move |scope| {
            Box::pin(async move {
                scope
                    .insert_game(&Game::new(10).with_teams("FLA", "FRA").with_season("2023"))
                    .await?;
                assert_eq!(scope.insert_shot(&shot).await?, WriteOutcome::Inserted);
                assert_eq!(scope.insert_shot(&shot).await?, WriteOutcome::Inserted);
                scope.shots_for_game(10).await
            })
        })
        .await
        .expect("scope failed");

    assert_eq!(shots.len(), 2);
    assert_ne!(shots[0].id, shots[1].id);
    assert_eq!(shots[0].x, shots[1].x);
    assert_eq!(shots[0].shot_type.as_deref(), Some("3PT"));

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_key_is_skipped_without_error() {
    let db = TestDb::ready().await;

    let outcomes = db
        .pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                let team = scope.insert_team(&Team::default().with_name("Nameless")).await?;
                let link = scope
                    .insert_roster_link(&RosterSeasonLink {
                        player_id: Some(5),
                        team_id: Some("FLA".to_string()),
                        ..RosterSeasonLink::default()
                    })
                    .await?;
                let mut orphan = Shot::new(5, 10, "FLA");
                orphan.game_id = None;
                let shot = scope.insert_shot(&orphan).await?;
                // The transaction is still usable after the skips.
                let kept = scope.insert_team(&Team::new("FLA")).await?;
                Ok::<_, StoreError>((team, link, shot, kept))
            })
        })
        .await
        .expect("skips must not fail the scope");

    assert_eq!(outcomes.0, WriteOutcome::Skipped { missing: "id" });
    assert_eq!(outcomes.1, WriteOutcome::Skipped { missing: "season" });
    assert_eq!(outcomes.2, WriteOutcome::Skipped { missing: "game_id" });
    assert_eq!(outcomes.3, WriteOutcome::Inserted);
    assert_eq!(db.count("teams").await, 1);
    assert_eq!(db.count("roster_season_links").await, 0);
    assert_eq!(db.count("shots").await, 0);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn foreign_key_violation_rolls_back_whole_scope() {
    let db = TestDb::ready().await;

    let result = db
        .pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                scope.insert_team(&Team::new("FLA")).await?;
                scope.insert_player(&Player::new(5)).await?;
                scope.insert_shot(&Shot::new(5, 999, "FLA")).await
            })
        })
        .await;

    let err = result.expect_err("shot for unknown game must fail");
    assert!(err.is_constraint_violation());
    assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));

    assert_eq!(db.count("teams").await, 0);
    assert_eq!(db.count("players").await, 0);
    assert_eq!(db.count("shots").await, 0);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn roster_link_for_unknown_team_is_constraint_violation() {
    let db = TestDb::ready().await;
    seed_teams_and_player(&db).await;

    let err = db
        .pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                scope
                    .insert_roster_link(&RosterSeasonLink::new(5, "XXX", "2023"))
                    .await
            })
        })
        .await
        .expect_err("unknown team must fail");

    assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
    assert_eq!(db.count("roster_season_links").await, 0);
    // Rows committed by earlier scopes are untouched.
    assert_eq!(db.count("teams").await, 2);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn game_ids_for_season() {
    let db = TestDb::ready().await;
    seed_teams_and_player(&db).await;

    let (ids_2023, ids_2024, blank, unknown) = db
        .pool
        .run_in_scope(|scope| {
            Box::pin(async move {
                for (id, season) in [(11, "2023"), (10, "2023"), (12, "2024")] {
                    scope
                        .insert_game(&Game::new(id).with_teams("FLA", "FRA").with_season(season))
                        .await?;
                }
                Ok::<_, StoreError>((
                    scope.game_ids_for_season("2023").await?,
                    scope.game_ids_for_season("2024").await?,
                    scope.game_ids_for_season("").await?,
                    scope.game_ids_for_season("1999").await?,
                ))
            })
        })
        .await
        .expect("scope failed");

    assert_eq!(ids_2023, vec![10, 11]);
    assert_eq!(ids_2024, vec![12]);
    assert!(blank.is_empty());
    assert!(unknown.is_empty());

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn batch_writes_report_summary() {
    let db = TestDb::ready().await;

    let teams = vec![
        Team::new("FLA"),
        Team::new("FRA"),
        Team::new("FLA").with_name("duplicate"),
        Team::default(),
    ];

    let summary = db
        .pool
        .run_in_scope(move |scope| Box::pin(async move { scope.insert_teams(&teams).await }))
        .await
        .expect("batch failed");

    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.ignored, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.total(), 4);
    assert_eq!(db.count("teams").await, 2);

    db.teardown().await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn failing_batch_keeps_nothing() {
    let db = TestDb::ready().await;
    seed_teams_and_player(&db).await;

    let shots = vec![Shot::new(5, 10, "FLA"), Shot::new(5, 404, "FLA")];

    let result = db
        .pool
        .run_in_scope(move |scope| {
            Box::pin(async move {
                scope
                    .insert_game(&Game::new(10).with_teams("FLA", "FRA"))
                    .await?;
                scope.insert_shots(&shots).await
            })
        })
        .await;

    assert!(result.is_err());
    assert_eq!(db.count("games").await, 0);
    assert_eq!(db.count("shots").await, 0);

    db.teardown().await;
}
