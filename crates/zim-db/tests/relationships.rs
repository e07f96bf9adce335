//! Sponsor-kid relationship behaviour across the repositories.

use std::collections::HashSet;

use zim_core::{KidPatch, NewKid, NewSponsor, SponsorPatch};
use zim_db::{Database, DbConfig, DbError};

async fn setup() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn kid(db: &Database, name: &str) -> String {
    db.kids().create(NewKid::new(name)).await.unwrap().kid.id
}

fn ids<'a>(items: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    items.into_iter().map(str::to_string).collect()
}

#[tokio::test]
async fn create_then_get_returns_exact_kid_set() {
    let db = setup().await;
    let a = kid(&db, "Tatenda").await;
    let b = kid(&db, "Rufaro").await;

    let created = db
        .sponsors()
        .create(
            NewSponsor::new("Alex", "Rivers", "303-555-0101", "alex@example.org")
                .sponsorship_type("family")
                .kid_ids(vec![b.clone(), a.clone(), b.clone()]),
        )
        .await
        .unwrap();

    let loaded = db
        .sponsors()
        .get_by_id(&created.sponsor.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded.sponsor.first_name, "Alex");
    assert_eq!(loaded.sponsor.last_name, "Rivers");
    assert_eq!(loaded.sponsor.phone_number, "303-555-0101");
    assert_eq!(loaded.sponsor.email, "alex@example.org");
    assert_eq!(loaded.sponsor.sponsorship_type, "family");
    assert_eq!(loaded.kids.len(), 2);
    assert_eq!(ids(loaded.kid_ids()), ids([a.as_str(), b.as_str()]));
    assert_eq!(db.links().count().await.unwrap(), 2);
}

#[tokio::test]
async fn update_without_kid_ids_keeps_links() {
    let db = setup().await;
    let a = kid(&db, "Tatenda").await;
    let sponsor = db
        .sponsors()
        .create(NewSponsor::new("Alex", "Rivers", "", "").kid_ids(vec![a.clone()]))
        .await
        .unwrap();

    let patch = SponsorPatch {
        email: Some("new@example.org".to_string()),
        ..Default::default()
    };
    let updated = db
        .sponsors()
        .update(&sponsor.sponsor.id, patch)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.sponsor.email, "new@example.org");
    assert_eq!(updated.kid_ids(), vec![a.as_str()]);
}

#[tokio::test]
async fn update_with_empty_kid_ids_removes_all_links() {
    let db = setup().await;
    let a = kid(&db, "Tatenda").await;
    let b = kid(&db, "Rufaro").await;
    let sponsor = db
        .sponsors()
        .create(NewSponsor::new("Alex", "Rivers", "", "").kid_ids(vec![a, b]))
        .await
        .unwrap();

    let patch = SponsorPatch {
        kid_ids: Some(vec![]),
        ..Default::default()
    };
    let updated = db
        .sponsors()
        .update(&sponsor.sponsor.id, patch)
        .await
        .unwrap()
        .unwrap();

    assert!(updated.kids.is_empty());
    assert_eq!(db.links().count().await.unwrap(), 0);
    assert_eq!(db.kids().count().await.unwrap(), 2);
}

#[tokio::test]
async fn update_kid_replaces_sponsor_set() {
    let db = setup().await;
    let s1 = db
        .sponsors()
        .create(NewSponsor::new("A", "One", "", ""))
        .await
        .unwrap()
        .sponsor
        .id;
    let s2 = db
        .sponsors()
        .create(NewSponsor::new("B", "Two", "", ""))
        .await
        .unwrap()
        .sponsor
        .id;
    let k = db
        .kids()
        .create(NewKid::new("Farai").sponsor_ids(vec![s1.clone()]))
        .await
        .unwrap()
        .kid
        .id;

    let patch = KidPatch {
        sponsor_ids: Some(vec![s2.clone()]),
        ..Default::default()
    };
    let updated = db.kids().update(&k, patch).await.unwrap().unwrap();

    assert_eq!(updated.sponsor_ids(), vec![s2.as_str()]);
    assert!(!db.links().exists(&s1, &k).await.unwrap());
}

#[tokio::test]
async fn delete_sponsor_cascades_links_only() {
    let db = setup().await;
    let k = kid(&db, "Nyasha").await;
    let doomed = db
        .sponsors()
        .create(NewSponsor::new("A", "One", "", "").kid_ids(vec![k.clone()]))
        .await
        .unwrap()
        .sponsor
        .id;
    let keeper = db
        .sponsors()
        .create(NewSponsor::new("B", "Two", "", "").kid_ids(vec![k.clone()]))
        .await
        .unwrap()
        .sponsor
        .id;

    db.sponsors().delete(&doomed).await.unwrap();

    assert!(db.sponsors().get_by_id(&doomed).await.unwrap().is_none());
    let kid = db.kids().get_by_id(&k).await.unwrap().unwrap();
    assert_eq!(kid.sponsor_ids(), vec![keeper.as_str()]);

    // Deleting again is fine
    db.sponsors().delete(&doomed).await.unwrap();
}

#[tokio::test]
async fn delete_kid_cascades_links_only() {
    let db = setup().await;
    let k = kid(&db, "Nyasha").await;
    let s = db
        .sponsors()
        .create(NewSponsor::new("A", "One", "", "").kid_ids(vec![k.clone()]))
        .await
        .unwrap()
        .sponsor
        .id;

    db.kids().delete(&k).await.unwrap();

    let sponsor = db.sponsors().get_by_id(&s).await.unwrap().unwrap();
    assert!(sponsor.kids.is_empty());
    assert_eq!(db.links().count().await.unwrap(), 0);
}

#[tokio::test]
async fn add_link_twice_stores_one_row() {
    let db = setup().await;
    let k = kid(&db, "Tatenda").await;
    let s = db
        .sponsors()
        .create(NewSponsor::new("A", "One", "", ""))
        .await
        .unwrap()
        .sponsor
        .id;

    db.links().add_link(&s, &k).await.unwrap();
    db.links().add_link(&s, &k).await.unwrap();

    assert_eq!(db.links().count().await.unwrap(), 1);
    assert!(db.links().exists(&s, &k).await.unwrap());
}

#[tokio::test]
async fn remove_missing_link_is_noop() {
    let db = setup().await;
    let k = kid(&db, "Tatenda").await;
    let s = db
        .sponsors()
        .create(NewSponsor::new("A", "One", "", "").kid_ids(vec![k.clone()]))
        .await
        .unwrap()
        .sponsor
        .id;

    db.links().remove_link(&s, "no-such-kid").await.unwrap();
    db.links().remove_link("no-such-sponsor", &k).await.unwrap();

    assert_eq!(db.links().count().await.unwrap(), 1);

    db.links().remove_link(&s, &k).await.unwrap();
    assert_eq!(db.links().count().await.unwrap(), 0);
}

#[tokio::test]
async fn add_link_to_unknown_kid_fails() {
    let db = setup().await;
    let s = db
        .sponsors()
        .create(NewSponsor::new("A", "One", "", ""))
        .await
        .unwrap()
        .sponsor
        .id;

    let err = db.links().add_link(&s, "ghost").await.unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
}

#[tokio::test]
async fn create_with_unknown_kid_rolls_back() {
    let db = setup().await;
    let real = kid(&db, "Tatenda").await;

    let err = db
        .sponsors()
        .create(NewSponsor::new("A", "One", "", "").kid_ids(vec![real, "ghost".to_string()]))
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    assert_eq!(db.sponsors().count().await.unwrap(), 0);
    assert_eq!(db.links().count().await.unwrap(), 0);
}

#[tokio::test]
async fn failed_link_replace_keeps_previous_state() {
    let db = setup().await;
    let k = kid(&db, "Tatenda").await;
    let s = db
        .sponsors()
        .create(NewSponsor::new("A", "One", "", "").kid_ids(vec![k.clone()]))
        .await
        .unwrap()
        .sponsor
        .id;

    let patch = SponsorPatch {
        first_name: Some("Changed".to_string()),
        kid_ids: Some(vec!["ghost".to_string()]),
        ..Default::default()
    };
    let err = db.sponsors().update(&s, patch).await.unwrap_err();
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

    let unchanged = db.sponsors().get_by_id(&s).await.unwrap().unwrap();
    assert_eq!(unchanged.sponsor.first_name, "A");
    assert_eq!(unchanged.kid_ids(), vec![k.as_str()]);
}

#[tokio::test]
async fn get_all_matches_per_id_reads() {
    let db = setup().await;
    let a = kid(&db, "Tatenda").await;
    let b = kid(&db, "Rufaro").await;
    for (first, kids) in [("A", vec![a.clone()]), ("B", vec![a.clone(), b.clone()]), ("C", vec![])] {
        db.sponsors()
            .create(NewSponsor::new(first, "X", "", "").kid_ids(kids))
            .await
            .unwrap();
    }

    let all_sponsors = db.sponsors().get_all().await.unwrap();
    assert_eq!(all_sponsors.len(), 3);
    for listed in &all_sponsors {
        let single = db
            .sponsors()
            .get_by_id(&listed.sponsor.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(listed.sponsor, single.sponsor);
        assert_eq!(ids(listed.kid_ids()), ids(single.kid_ids()));
    }

    let all_kids = db.kids().get_all().await.unwrap();
    assert_eq!(all_kids.len(), 2);
    for listed in &all_kids {
        let single = db.kids().get_by_id(&listed.kid.id).await.unwrap().unwrap();
        assert_eq!(listed.kid, single.kid);
        assert_eq!(ids(listed.sponsor_ids()), ids(single.sponsor_ids()));
    }
}

#[tokio::test]
async fn sponsor_and_kid_scenario() {
    let db = setup().await;

    let s1 = db
        .sponsors()
        .create(NewSponsor::new("Mike", "Daugherty", "303-908-5059", "mike@msdweb.pro"))
        .await
        .unwrap();
    assert!(s1.kids.is_empty());

    let k1 = db.kids().create(NewKid::new("Malachi")).await.unwrap();

    let patch = SponsorPatch {
        kid_ids: Some(vec![k1.kid.id.clone()]),
        ..Default::default()
    };
    let s1 = db
        .sponsors()
        .update(&s1.sponsor.id, patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(s1.kid_ids(), vec![k1.kid.id.as_str()]);

    let k1 = db.kids().get_by_id(&k1.kid.id).await.unwrap().unwrap();
    assert_eq!(k1.sponsor_ids(), vec![s1.sponsor.id.as_str()]);
    assert_eq!(k1.sponsors[0].phone_number, "303-908-5059");
}
