mod support;

use std::fs;

use taskshard::error::Error;
use taskshard::locator::Locator;

use support::TestStore;

fn locator(fixture: &TestStore) -> Locator {
    Locator::new(fixture.storage().index_dir(), fixture.storage().tasks_dir())
}

#[test]
fn resolves_ids_inside_month_ranges() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    fixture.write_index(2025, r#"{"6": [100, 150], "7": [200]}"#)?;
    let locator = locator(&fixture);

    assert_eq!(locator.locate(100)?, fixture.storage().shard_path(2025, 6));
    assert_eq!(locator.locate(120)?, fixture.storage().shard_path(2025, 6));
    assert_eq!(locator.locate(150)?, fixture.storage().shard_path(2025, 6));
    assert_eq!(locator.locate(200)?, fixture.storage().shard_path(2025, 7));
    Ok(())
}

#[test]
fn ids_between_ranges_are_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    fixture.write_index(2025, r#"{"6": [100, 150], "7": [200]}"#)?;
    let locator = locator(&fixture);

    for id in [99, 151, 199, 201] {
        assert!(matches!(locator.locate(id), Err(Error::TaskNotFound(found)) if found == id));
    }
    Ok(())
}

#[test]
fn malformed_year_file_does_not_block_other_years() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    fixture.write_index(2023, "{\"3\": \"not a range\"}")?;
    fixture.write_index(2024, "{\"5\": []}")?;
    fixture.write_index(2025, r#"{"1": [10, 20]}"#)?;

    assert_eq!(locator(&fixture).locate(15)?, fixture.storage().shard_path(2025, 1));
    Ok(())
}

#[test]
fn truncated_year_file_reads_as_empty() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    fixture.write_index(2024, "{\"5\": [1, ")?;
    fixture.write_index(2025, "")?;

    assert!(locator(&fixture).locate(1).unwrap_err().is_not_found());
    Ok(())
}

#[test]
fn non_index_entries_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let index_dir = fixture.storage().index_dir();
    fs::write(index_dir.join("notes.txt"), "[1, 1000]")?;
    fs::create_dir_all(index_dir.join("archive"))?;
    fixture.write_index(2025, r#"{"9": [500, 600]}"#)?;

    assert_eq!(locator(&fixture).locate(550)?, fixture.storage().shard_path(2025, 9));
    Ok(())
}

#[test]
fn unreadable_index_directory_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    let index_dir = fixture.storage().index_dir().to_path_buf();
    fs::remove_dir_all(&index_dir)?;

    let err = locator(&fixture).locate(1).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    Ok(())
}

#[test]
fn created_tasks_are_locatable() -> Result<(), Box<dyn std::error::Error>> {
    let fixture = TestStore::init()?;
    fixture.store(support::jan_31_2025).create("jan", false)?;
    fixture.store(support::feb_1_2025).create("feb a", false)?;
    fixture.store(support::feb_1_2025).create("feb b", false)?;
    fixture.store(support::jan_1_2026).create("next year", false)?;

    let locator = locator(&fixture);
    assert_eq!(locator.locate(1)?, fixture.storage().shard_path(2025, 1));
    assert_eq!(locator.locate(3)?, fixture.storage().shard_path(2025, 2));
    assert_eq!(locator.locate(4)?, fixture.storage().shard_path(2026, 1));
    assert!(locator.locate(5).unwrap_err().is_not_found());
    Ok(())
}
