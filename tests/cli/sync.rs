use anyhow::Result;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use crate::CliTest;

const DATASET: &str = r#"{
    "strings": [
        { "kind": "Location", "id": 2, "field": "name", "text": "Route 2",
          "translations": { "fr": "Route 2" } },
        { "kind": "Location", "id": 1, "field": "name", "text": "Route 1",
          "translations": { "fr": "Route 1" } },
        { "kind": "Pokemon", "id": 1, "field": "name", "text": "Bulbasaur",
          "translations": { "fr": "Bulbizarre" } },
        { "kind": "Pokemon", "id": 2, "field": "name", "text": "Ivysaur" }
    ]
}"#;

fn project() -> Result<CliTest> {
    let test = CliTest::with_file(".catsyncrc.json", "{}")?;
    test.write_file("strings.json", DATASET)?;
    Ok(test)
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = project()?;

    let output = test.sync_command().output()?;
    assert!(output.status.success());
    assert_snapshot!(stdout(&output).trim_end(), @r"
    template
      location.pot (1 entry)
      pokemon.pot (2 entries)
    fr
      location.po (1 entry)
      pokemon.po (2 entries, 1 untranslated)
    Would write 4 catalog files.
    Run with --apply to write these catalogs.
    ");
    assert!(!test.root().join("catalogs").exists());

    Ok(())
}

#[test]
fn test_apply_writes_template_and_languages() -> Result<()> {
    let test = project()?;

    let output = test.sync_command().arg("--apply").output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Wrote 4 catalog files"));

    let template = test.read_file("catalogs/template/location.pot")?;
    assert!(template.contains("Content-Type: text/plain; charset=UTF-8"));
    assert!(template.contains(
        "#: Location.name:1 Location.name:2\n#, number-placeholder\nmsgctxt \"Location.name\"\nmsgid \"Route {num}\"\nmsgstr \"\"\n"
    ));
    assert!(!template.contains("Language:"));

    let pokemon = test.read_file("catalogs/fr/pokemon.po")?;
    assert!(pokemon.contains("\"Language: fr\\n\""));
    assert!(pokemon.contains(
        "#: Pokemon.name:1\nmsgctxt \"Pokemon.name\"\nmsgid \"Bulbasaur\"\nmsgstr \"Bulbizarre\"\n"
    ));
    assert!(pokemon.contains(
        "#: Pokemon.name:2\nmsgctxt \"Pokemon.name\"\nmsgid \"Ivysaur\"\nmsgstr \"\"\n"
    ));
    assert!(!pokemon.contains("#~"));

    Ok(())
}

#[test]
fn test_second_run_is_stable() -> Result<()> {
    let test = project()?;

    test.sync_command().arg("--apply").output()?;
    let first = test.read_file("catalogs/fr/pokemon.po")?;
    let output = test.sync_command().arg("--apply").output()?;
    assert!(output.status.success());

    assert_eq!(test.read_file("catalogs/fr/pokemon.po")?, first);
    Ok(())
}

#[test]
fn test_catalog_translation_is_kept() -> Result<()> {
    let test = project()?;
    test.write_file(
        "catalogs/fr/pokemon.po",
        "#: Pokemon.name:2\nmsgctxt \"Pokemon.name\"\nmsgid \"Ivysaur\"\nmsgstr \"Herbizarre\"\n",
    )?;

    let output = test
        .sync_command()
        .args(["--lang", "fr", "--apply"])
        .output()?;
    assert!(output.status.success());

    let written = test.read_file("catalogs/fr/pokemon.po")?;
    assert!(written.contains("msgstr \"Herbizarre\""));
    assert!(!test.root().join("catalogs/template").exists());

    Ok(())
}

#[test]
fn test_plural_catalog_entry_does_not_abort() -> Result<()> {
    let test = project()?;
    test.write_file(
        "catalogs/fr/pokemon.po",
        r#"#: Pokemon.name:2
msgctxt "Pokemon.name"
msgid "Ivysaur"
msgstr "Herbizarre"

msgctxt "Item.name"
msgid "Potion"
msgid_plural "Potions"
msgstr[0] "Potion"
msgstr[1] "Potions"
"#,
    )?;

    let output = test
        .sync_command()
        .args(["--lang", "fr", "--apply"])
        .output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let written = test.read_file("catalogs/fr/pokemon.po")?;
    assert!(written.contains("msgstr \"Herbizarre\""));

    Ok(())
}

#[test]
fn test_removed_entity_moves_to_obsolete() -> Result<()> {
    let test = project()?;
    test.write_file(
        "catalogs/fr/pokemon.po",
        "#: Pokemon.name:99\nmsgctxt \"Pokemon.name\"\nmsgid \"Missingno\"\nmsgstr \"Missingno FR\"\n",
    )?;

    let output = test
        .sync_command()
        .args(["--lang", "fr", "--apply"])
        .output()?;
    assert!(output.status.success());
    assert!(stdout(&output).contains("pokemon.po (2 entries, 1 untranslated, 1 obsolete)"));

    let written = test.read_file("catalogs/fr/pokemon.po")?;
    assert!(!written.contains("Pokemon.name:99"));
    assert!(written.contains("#~ msgstr \"Missingno FR\""));

    Ok(())
}

#[test]
fn test_override_and_priority() -> Result<()> {
    let test = project()?;
    test.write_file(
        "overrides/fr.json",
        r#"{ "Pokemon.name": { "1": "Bulbi" } }"#,
    )?;

    // default priority: the official translation wins
    test.sync_command()
        .args(["--lang", "fr", "--apply"])
        .output()?;
    let written = test.read_file("catalogs/fr/pokemon.po")?;
    assert!(written.contains("msgstr \"Bulbizarre\""));
    assert!(written.contains("#~ msgstr \"Bulbi\""));

    let output = test
        .sync_command()
        .args(["--lang", "fr", "--apply"])
        .args(["--priority", "override", "--priority", "official"])
        .output()?;
    assert!(output.status.success());
    let written = test.read_file("catalogs/fr/pokemon.po")?;
    assert!(written.contains("msgstr \"Bulbi\""));
    assert!(written.contains("#~ msgstr \"Bulbizarre\""));

    Ok(())
}

#[test]
fn test_deny_warnings() -> Result<()> {
    let test = project()?;
    test.write_file(
        "catalogs/fr/places.po",
        "#: Place.name:4\nmsgctxt \"Place.name\"\nmsgid \"Lake\"\nmsgstr \"Lac\"\n",
    )?;

    let output = test.sync_command().args(["--lang", "fr"]).output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown entity kind 'Place'"));

    let output = test
        .sync_command()
        .args(["--lang", "fr", "--deny-warnings"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("1 warning raised while merging"));

    Ok(())
}

#[test]
fn test_kind_alias_from_config() -> Result<()> {
    let test = project()?;
    test.write_file(
        ".catsyncrc.json",
        r#"{ "kinds": [ { "name": "Location", "aliases": ["Place"], "topic": "places" } ] }"#,
    )?;
    test.write_file(
        "catalogs/fr/old.po",
        "#: Place.name:1\nmsgctxt \"Place.name\"\nmsgid \"Route 1\"\nmsgstr \"Chemin 1\"\n",
    )?;

    let output = test
        .sync_command()
        .args(["--lang", "fr", "--deny-warnings", "--apply"])
        .output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(test.root().join("catalogs/fr/places.po").exists());
    assert!(!test.root().join("catalogs/fr/location.po").exists());

    Ok(())
}

#[test]
fn test_missing_dataset_is_an_error() -> Result<()> {
    let test = CliTest::with_file(".catsyncrc.json", r#"{ "sourceFile": "missing.json" }"#)?;

    let output = test.sync_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read dataset"));

    Ok(())
}

#[test]
fn test_invalid_priority_is_an_error() -> Result<()> {
    let test = project()?;

    let output = test
        .sync_command()
        .args(["--priority", "source", "--priority", "source"])
        .output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("listed twice"));

    Ok(())
}
