//! End-to-end tests for the build command.
//!
//! These tests run the real binary against temporary project directories
//! and assert on the delivered output tree.

mod common;
use common::prelude::*;

#[test]
fn test_build_copies_css_and_compiles_scss() {
    let fixture = TestFixture::new()
        .with_config(configs::DEV_STRICT)
        .with_css("site", "body { margin: 0 }")
        .with_scss("theme", "$c: teal;\n.brand { color: $c; }");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .arg("--quiet")
        .assert()
        .success();

    assert_eq!(fixture.output("site.css"), "body { margin: 0 }");
    assert!(fixture.output("theme.css").contains("teal"));
    assert!(fixture.has_output("normalize.css"));
}

#[test]
fn test_build_merges_same_named_css_and_scss() {
    let fixture = TestFixture::new()
        .with_config(configs::DEV_AUTORESOLVE)
        .with_css("a", ".x { color: red }")
        .with_scss("a", ".y { color: blue }");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .arg("--quiet")
        .assert()
        .success();

    let merged = fixture.output("a.css");
    let css_at = merged.find(".x").expect("hand-written part present");
    let scss_at = merged.find(".y").expect("compiled part present");
    assert!(css_at < scss_at, "css content precedes compiled scss");
}

#[test]
fn test_build_collision_is_fatal_without_autoresolve() {
    let fixture = TestFixture::new()
        .with_config(configs::DEV_STRICT)
        .with_css("a", ".x {}")
        .with_scss("a", ".y {}");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .arg("--quiet")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Name collision"));

    // Nothing was delivered
    assert!(!fixture.path().join("cssmonster").exists());
}

#[test]
fn test_build_leaves_previous_output_on_failure() {
    let fixture = TestFixture::new()
        .with_config(configs::DEV_STRICT)
        .with_file("cssmonster/previous.css", "kept")
        .with_scss("broken", ".a { color: $missing; }");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Compile error"));

    assert_eq!(fixture.output("previous.css"), "kept");
}

#[test]
fn test_build_env_flag_disables_minify() {
    let fixture = TestFixture::new().with_css("site", ".a {\n  color: red;\n}\n");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .args(["--env", "development", "--quiet"])
        .assert()
        .success();

    // Development default: delivered verbatim, not minified
    assert_eq!(fixture.output("site.css"), ".a {\n  color: red;\n}\n");
}

#[test]
fn test_build_production_minifies() {
    let fixture = TestFixture::new()
        .with_config(r#"{ "purge": false }"#)
        .with_css("site", ".a {\n  color: red;\n}\n");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .arg("--quiet")
        .assert()
        .success();

    let site = fixture.output("site.css");
    assert!(!site.contains('\n'));
    assert!(site.contains(".a"));
}

#[test]
fn test_build_purges_unused_selectors() {
    let fixture = TestFixture::new()
        .with_config(r#"{ "minify": false, "purge": true }"#)
        .with_css("site", ".used{color:blue}\n.unused{color:red}\n")
        .with_file("index.html", "<div class=\"used\">hello</div>");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .arg("--quiet")
        .assert()
        .success();

    let site = fixture.output("site.css");
    assert!(site.contains(".used"));
    assert!(!site.contains(".unused"));
}

#[test]
fn test_build_respects_blacklist() {
    let fixture = TestFixture::new()
        .with_config(r#"{ "env": "development", "blacklist": ["vendor/"] }"#)
        .with_css("keep", ".k {}")
        .with_file("src/vendor/skip.css", ".s {}");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .arg("--quiet")
        .assert()
        .success();

    assert!(fixture.has_output("keep.css"));
    assert!(!fixture.has_output("skip.css"));
}

#[test]
fn test_build_explicit_config_path() {
    let fixture = TestFixture::new()
        .with_file("configs/styles.json", configs::DEV_STRICT)
        .with_css("site", "body {}");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .args(["--config", "configs/styles.json", "--quiet"])
        .assert()
        .success();

    assert!(fixture.has_output("site.css"));
}

#[test]
fn test_build_reruns_are_idempotent() {
    let fixture = TestFixture::new()
        .with_config(configs::DEV_STRICT)
        .with_css("site", "body { margin: 0 }")
        .with_scss("extra", ".e { color: red; }");

    for _ in 0..2 {
        let mut cmd = cargo_bin_cmd!("cssmonster");
        cmd.current_dir(fixture.path())
            .arg("--quiet")
            .assert()
            .success();
    }

    assert_eq!(fixture.output("site.css"), "body { margin: 0 }");
    assert!(fixture.output("extra.css").contains(".e"));
}

#[test]
fn test_build_reports_summary() {
    let fixture = TestFixture::new()
        .with_config(configs::DEV_STRICT)
        .with_css("site", "body {}");

    let mut cmd = cargo_bin_cmd!("cssmonster");
    cmd.current_dir(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("sheet(s) delivered"))
        .stdout(predicate::str::contains("Output written to"));
}
