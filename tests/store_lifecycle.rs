mod support;

use taskshard::counter::CounterStore;
use taskshard::error::Error;
use taskshard::index::{self, IdRange};
use taskshard::locator::Locator;
use taskshard::shard;
use taskshard::task::DateFilter;

use support::{dec_31_2025, feb_1_2025, jan_1_2026, jan_31_2025, jun_14_2025, TestStore};

#[test]
fn create_read_update_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);

    let created = store.create("buy milk", false)?;
    assert_eq!(created.id, 1);

    let counter = CounterStore::new(fixture.storage().counter_file());
    assert_eq!(counter.read()?, 1);

    let fetched = store.get_by_id(1)?;
    assert_eq!(fetched.description, "buy milk");
    assert!(!fetched.done);

    let updated = store.update(1, true, Some(""))?;
    assert_eq!(updated.description, "buy milk");
    assert!(updated.done);
    assert_eq!(store.get_by_id(1)?, updated);
    Ok(())
}

#[test]
fn ids_are_strictly_increasing_and_contiguous() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);

    let mut ids = Vec::new();
    for n in 0..25 {
        ids.push(store.create(&format!("task {n}"), n % 2 == 0)?.id);
    }

    let expected: Vec<i64> = (1..=25).collect();
    assert_eq!(ids, expected);
    assert_eq!(store.last_id()?, 25);
    Ok(())
}

#[test]
fn counter_continues_from_stored_value() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    CounterStore::new(fixture.storage().counter_file()).write(41)?;

    let task = fixture.store(jun_14_2025).create("answer", false)?;
    assert_eq!(task.id, 42);
    Ok(())
}

#[test]
fn tasks_land_in_their_creation_month() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;

    fixture.store(jan_31_2025).create("january", false)?;
    fixture.store(feb_1_2025).create("february", false)?;
    fixture.store(dec_31_2025).create("december", false)?;
    fixture.store(jan_1_2026).create("new year", false)?;

    let jan = shard::load(&fixture.storage().shard_path(2025, 1))?;
    let feb = shard::load(&fixture.storage().shard_path(2025, 2))?;
    let dec = shard::load(&fixture.storage().shard_path(2025, 12))?;
    let next_jan = shard::load(&fixture.storage().shard_path(2026, 1))?;
    assert_eq!(jan.keys().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(feb.keys().copied().collect::<Vec<_>>(), vec![2]);
    assert_eq!(dec.keys().copied().collect::<Vec<_>>(), vec![3]);
    assert_eq!(next_jan.keys().copied().collect::<Vec<_>>(), vec![4]);

    // Every shard holds only tasks created in its own period.
    for (year, month, tasks) in [(2025, 1, &jan), (2025, 2, &feb), (2025, 12, &dec), (2026, 1, &next_jan)] {
        for task in tasks.values() {
            assert_eq!((task.year(), task.month()), (year, month));
        }
    }

    let index_2025 = index::load(&fixture.storage().index_path(2025))?;
    assert_eq!(index_2025.get(&1), Some(&IdRange::Single(1)));
    assert_eq!(index_2025.get(&2), Some(&IdRange::Single(2)));
    assert_eq!(index_2025.get(&12), Some(&IdRange::Single(3)));
    let index_2026 = index::load(&fixture.storage().index_path(2026))?;
    assert_eq!(index_2026.get(&1), Some(&IdRange::Single(4)));

    let store = fixture.store(jan_1_2026);
    assert_eq!(store.get_by_id(2)?.description, "february");
    assert_eq!(store.get_by_id(4)?.description, "new year");
    Ok(())
}

#[test]
fn second_task_in_month_keeps_first_bound() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);

    store.create("first", false)?;
    let index_path = fixture.storage().index_path(2025);
    assert_eq!(fixture.read_json(&index_path)?["6"], serde_json::json!([1]));

    store.create("second", false)?;
    assert_eq!(fixture.read_json(&index_path)?["6"], serde_json::json!([1, 2]));

    store.create("third", false)?;
    assert_eq!(fixture.read_json(&index_path)?["6"], serde_json::json!([1, 3]));
    Ok(())
}

#[test]
fn delete_then_get_is_not_found_despite_stale_index() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);
    for n in 0..3 {
        store.create(&format!("t{n}"), false)?;
    }

    let removed = store.delete(2)?;
    assert_eq!(removed.map(|task| task.id), Some(2));

    let locator = Locator::new(fixture.storage().index_dir(), fixture.storage().tasks_dir());
    assert_eq!(locator.locate(2)?, fixture.storage().shard_path(2025, 6));
    assert!(matches!(store.get_by_id(2), Err(Error::TaskNotFound(2))));
    assert!(matches!(store.update(2, true, None), Err(Error::TaskNotFound(2))));

    // Index bounds are untouched by the delete.
    let year_index = index::load(&fixture.storage().index_path(2025))?;
    assert_eq!(year_index[&6], IdRange::Span { first: 1, last: 3 });
    Ok(())
}

#[test]
fn deleting_twice_is_not_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);
    store.create("only", false)?;

    assert!(store.delete(1)?.is_some());
    assert!(store.delete(1)?.is_none());
    assert!(shard::load(&fixture.storage().shard_path(2025, 6))?.is_empty());
    Ok(())
}

#[test]
fn operations_on_unknown_ids_are_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);
    store.create("one", false)?;

    assert!(store.get_by_id(77).unwrap_err().is_not_found());
    assert!(store.update(77, false, Some("x")).unwrap_err().is_not_found());
    assert!(store.delete(77).unwrap_err().is_not_found());
    Ok(())
}

#[test]
fn today_collects_descending_from_counter() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    fixture.store(jan_31_2025).create("old", false)?;
    let store = fixture.store(feb_1_2025);
    store.create("a", false)?;
    store.create("b", true)?;

    let ids: Vec<i64> = store.today()?.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![3, 2]);

    // Starting lower walks from there.
    let ids: Vec<i64> = store.get_today(2)?.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![2]);
    Ok(())
}

#[test]
fn get_by_date_lists_whole_month_in_id_order() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);
    for n in 0..12 {
        store.create(&format!("t{n}"), false)?;
    }
    store.delete(5)?;

    let tasks = store.get_by_date(DateFilter::new(2025, 6).with_day(1))?;
    let ids: Vec<i64> = tasks.iter().map(|task| task.id).collect();
    let expected: Vec<i64> = (1..=12).filter(|id| *id != 5).collect();
    assert_eq!(ids, expected);

    assert!(store.get_by_date(DateFilter::new(2025, 7))?.is_empty());
    Ok(())
}

#[test]
fn corrupt_shard_fails_the_operation() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);
    store.create("fine", false)?;
    std::fs::write(fixture.storage().shard_path(2025, 6), "[1, 2, 3]")?;

    assert!(matches!(store.get_by_id(1), Err(Error::Decode { .. })));
    assert!(matches!(store.create("next", false), Err(Error::Decode { .. })));
    Ok(())
}

#[test]
fn truncated_counter_blocks_create_without_reusing_ids() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let store = fixture.store(jun_14_2025);
    for n in 0..5 {
        store.create(&format!("t{n}"), false)?;
    }
    std::fs::write(fixture.storage().counter_file(), "{\"lastID\": 5")?;

    assert!(matches!(store.create("new", false), Err(Error::Decode { .. })));
    assert_eq!(store.get_by_id(1)?.description, "t0");
    assert_eq!(shard::load(&fixture.storage().shard_path(2025, 6))?.len(), 5);
    Ok(())
}
